//! `mt-signal` — signalized-intersection phase machines.
//!
//! A [`SignalController`] belongs to one intersection and governs the set of
//! incoming `(street, lane)` pairs that end there.  All governed pairs
//! observe the controller's single global phase (staged signal groups are an
//! extension point, not implemented).  [`SignalSet`] holds the controllers
//! for a whole network, keyed by node, and is owned by the simulator — the
//! network itself stays immutable.

pub mod controller;
pub mod phase;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use controller::{SignalController, SignalSet};
pub use phase::{PhaseTimings, SignalPhase};
