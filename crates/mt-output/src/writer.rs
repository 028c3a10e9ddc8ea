//! Output backend trait.

use crate::row::{StepSummaryRow, VehicleSampleRow};
use crate::OutputResult;

/// A sink for simulation output rows.  Implementations decide the storage
/// format; [`TrajectoryObserver`][crate::TrajectoryObserver] drives them.
pub trait TrajectoryWriter {
    fn write_samples(&mut self, rows: &[VehicleSampleRow]) -> OutputResult<()>;
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;
    /// Flush and close.  Must be idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
