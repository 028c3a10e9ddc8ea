//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `vehicle_samples.csv`
//! - `step_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::row::{StepSummaryRow, VehicleSampleRow};
use crate::writer::TrajectoryWriter;
use crate::OutputResult;

/// Writes simulation output to two CSV files.
pub struct CsvTrajectoryWriter {
    samples: Writer<File>,
    summaries: Writer<File>,
    finished: bool,
}

impl CsvTrajectoryWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut samples = Writer::from_path(dir.join("vehicle_samples.csv"))?;
        samples.write_record([
            "tick",
            "vehicle_id",
            "profile",
            "street_id",
            "lane",
            "position_s",
            "speed_mps",
            "x",
            "y",
        ])?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record(["tick", "live_vehicles"])?;

        Ok(Self {
            samples,
            summaries,
            finished: false,
        })
    }
}

impl TrajectoryWriter for CsvTrajectoryWriter {
    fn write_samples(&mut self, rows: &[VehicleSampleRow]) -> OutputResult<()> {
        for row in rows {
            self.samples.write_record(&[
                row.tick.to_string(),
                row.vehicle_id.to_string(),
                row.profile.clone(),
                row.street_id.to_string(),
                row.lane.to_string(),
                row.position_s.to_string(),
                row.speed_mps.to_string(),
                row.x.to_string(),
                row.y.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries
            .write_record(&[row.tick.to_string(), row.live_vehicles.to_string()])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.samples.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
