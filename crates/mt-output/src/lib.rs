//! `mt-output` — per-tick trajectory output for the `microtraffic`
//! simulator.
//!
//! The simulator's contract is "position of every vehicle, every tick";
//! this crate records exactly that.  Backends implement [`TrajectoryWriter`]
//! and are driven by [`TrajectoryObserver`], which implements
//! `mt_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mt_output::{CsvTrajectoryWriter, TrajectoryObserver};
//!
//! let writer = CsvTrajectoryWriter::new(Path::new("./out"))?;
//! let mut obs = TrajectoryObserver::new(writer);
//! sim.run_with(600, 1.0, &mut obs);
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use csv::CsvTrajectoryWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TrajectoryObserver;
pub use row::{StepSummaryRow, VehicleSampleRow};
pub use writer::TrajectoryWriter;
