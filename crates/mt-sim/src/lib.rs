//! `mt-sim` — tick-loop orchestrator for the `microtraffic` simulator.
//!
//! # Tick anatomy
//!
//! ```text
//! step(dt):
//!   ① Signals  — advance every controller by dt.
//!   ② Bucket   — group vehicles by (street, lane); sort each bucket by
//!                (position, vehicle id) ascending.
//!   ③ Update   — per vehicle, with its leader = the next vehicle in the
//!                sorted bucket (the one with larger arc position).
//!   ④ Cleanup  — drop finished vehicles.
//!   ⑤ Respawn  — per dropped vehicle, a biased coin decides whether a
//!                replacement spawns between random boundary nodes.
//! ```
//!
//! A tick is atomic: it either runs in full or not at all, and nothing
//! inside it suspends.  All randomness flows through one seeded RNG in a
//! fixed order, so a run is a pure function of (network, seed, spawn
//! schedule, tick sizes).
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mt_sim::{SimConfig, Simulator};
//!
//! let mut sim = Simulator::from_grid(4, 4, SimConfig::default())?;
//! sim.run(600, 1.0);
//! for v in sim.vehicles {
//!     println!("{} ended on {}", v.id, v.street);
//! }
//! ```

pub mod config;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{SignalPolicy, SimConfig};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{IntersectionView, Simulator};
