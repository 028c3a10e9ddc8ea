//! `mt-core` — foundational types for the `microtraffic` simulator.
//!
//! This crate is a dependency of every other `mt-*` crate.  It intentionally
//! has no `mt-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                            |
//! |-----------|-----------------------------------------------------|
//! | [`ids`]   | `NodeId`, `StreetId`, `VehicleId`, `ProfileId`      |
//! | [`point`] | `Point2`, projected-metres planar geometry          |
//! | [`rng`]   | `SimRng` (seeded, deterministic)                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod ids;
pub mod point;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{NodeId, ProfileId, StreetId, VehicleId};
pub use point::Point2;
pub use rng::SimRng;
