//! `mt-vehicle` — a single agent's state and per-tick update rule.
//!
//! The update is a small state machine with a deliberate transition order:
//! headway check, turn preparation (with best-effort lane change), signal
//! check, clamped kinematic integration, then arrival handling.  It consults
//! no randomness, so identical inputs always trace identical trajectories.

pub mod profile;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use profile::{DriverProfile, ProfileSet};
pub use vehicle::{
    LeaderView, Vehicle, ACCEL_MPS2, DECEL_MPS2, MIN_GAP_M, SIGNAL_CHECK_DIST_M,
    TURN_PREP_DIST_M,
};
