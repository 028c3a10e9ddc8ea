//! `TrajectoryObserver<W>` — bridges `SimObserver` to a `TrajectoryWriter`.

use mt_sim::{SimObserver, Simulator};

use crate::row::{StepSummaryRow, VehicleSampleRow};
use crate::writer::TrajectoryWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records every vehicle's position each tick into
/// any [`TrajectoryWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After the run, check with
/// [`take_error`][Self::take_error].
pub struct TrajectoryObserver<W: TrajectoryWriter> {
    writer: W,
    last_error: Option<OutputError>,
}

impl<W: TrajectoryWriter> TrajectoryObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TrajectoryWriter> SimObserver for TrajectoryObserver<W> {
    fn on_step_end(&mut self, tick: u64, sim: &Simulator) {
        let rows: Vec<VehicleSampleRow> = sim
            .vehicles
            .iter()
            .map(|v| {
                let pos = sim.network.street(v.street).position_at(v.position_s);
                VehicleSampleRow {
                    tick,
                    vehicle_id: v.id.0,
                    profile: sim.config.profiles.name(v.profile).to_string(),
                    street_id: v.street.0,
                    lane: v.lane,
                    position_s: v.position_s,
                    speed_mps: v.speed_mps,
                    x: pos.x,
                    y: pos.y,
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_samples(&rows);
            self.store_err(result);
        }
        let summary = StepSummaryRow {
            tick,
            live_vehicles: sim.vehicles.len() as u64,
        };
        let result = self.writer.write_step_summary(&summary);
        self.store_err(result);
    }

    fn on_run_end(&mut self, _final_tick: u64, _sim: &Simulator) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
