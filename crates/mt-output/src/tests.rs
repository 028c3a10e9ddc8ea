//! Unit tests for mt-output.

#[cfg(test)]
mod helpers {
    use mt_core::{NodeId, Point2};
    use mt_network::{Lane, NetworkBuilder};
    use mt_sim::{SignalPolicy, SimConfig, Simulator};

    use crate::row::{StepSummaryRow, VehicleSampleRow};
    use crate::writer::TrajectoryWriter;
    use crate::{OutputError, OutputResult};

    /// A 100 m single-lane street with one spawned vehicle, signals off.
    pub fn one_vehicle_sim() -> Simulator {
        let p = |x, y| Point2::new(x, y);
        let mut b = NetworkBuilder::new();
        let na = b.add_intersection(p(0.0, 0.0));
        let nb = b.add_intersection(p(100.0, 0.0));
        b.add_street(na, nb, vec![p(0.0, 0.0), p(100.0, 0.0)], 20.0, vec![Lane::all_turns()]);
        let net = b.build().unwrap();

        let config = SimConfig {
            initial_vehicles: 0,
            respawn_probability: 0.0,
            signal_policy: SignalPolicy::None,
            ..SimConfig::default()
        };
        let mut sim = Simulator::from_network(net, config);
        sim.spawn_route(NodeId(0), NodeId(1)).unwrap();
        sim
    }

    /// In-memory writer capturing everything it is handed.
    #[derive(Default)]
    pub struct CaptureWriter {
        pub samples: Vec<VehicleSampleRow>,
        pub summaries: Vec<StepSummaryRow>,
        pub finished: usize,
    }

    impl TrajectoryWriter for CaptureWriter {
        fn write_samples(&mut self, rows: &[VehicleSampleRow]) -> OutputResult<()> {
            self.samples.extend_from_slice(rows);
            Ok(())
        }
        fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
            self.summaries.push(row.clone());
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    /// Writer whose sample writes always fail.
    pub struct FailingWriter;

    impl TrajectoryWriter for FailingWriter {
        fn write_samples(&mut self, _rows: &[VehicleSampleRow]) -> OutputResult<()> {
            Err(OutputError::Io(std::io::Error::other("disk full")))
        }
        fn write_step_summary(&mut self, _row: &StepSummaryRow) -> OutputResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod observer {
    use super::helpers::{one_vehicle_sim, CaptureWriter, FailingWriter};
    use crate::observer::TrajectoryObserver;

    #[test]
    fn records_one_sample_per_vehicle_per_tick() {
        let mut sim = one_vehicle_sim();
        let mut obs = TrajectoryObserver::new(CaptureWriter::default());
        sim.run_with(3, 1.0, &mut obs);
        assert!(obs.take_error().is_none());

        let writer = obs.into_writer();
        assert_eq!(writer.samples.len(), 3); // 1 vehicle × 3 ticks
        assert_eq!(writer.summaries.len(), 3);
        assert_eq!(writer.finished, 1);

        assert_eq!(writer.samples[0].tick, 0);
        assert_eq!(writer.samples[0].vehicle_id, 0);
        assert_eq!(writer.samples[0].street_id, 0);
        // After one 1 s tick from standstill: v = 2 m/s, s = 2 m.
        assert_eq!(writer.samples[0].position_s, 2.0);
        assert_eq!(writer.samples[0].speed_mps, 2.0);
        // The street runs along +x from the origin.
        assert_eq!(writer.samples[0].x, 2.0);
        assert_eq!(writer.samples[0].y, 0.0);
        assert_eq!(writer.summaries[0].live_vehicles, 1);
    }

    #[test]
    fn profile_name_is_resolved() {
        let mut sim = one_vehicle_sim();
        let mut obs = TrajectoryObserver::new(CaptureWriter::default());
        sim.run_with(1, 1.0, &mut obs);
        let writer = obs.into_writer();
        let name = &writer.samples[0].profile;
        assert!(["raser", "normal", "slow_driver"].contains(&name.as_str()));
    }

    #[test]
    fn first_error_is_kept() {
        let mut sim = one_vehicle_sim();
        let mut obs = TrajectoryObserver::new(FailingWriter);
        sim.run_with(2, 1.0, &mut obs);
        let err = obs.take_error().expect("write failures must surface");
        assert!(err.to_string().contains("disk full"));
        // Taking clears it.
        assert!(obs.take_error().is_none());
    }
}

#[cfg(test)]
mod csv_backend {
    use crate::csv::CsvTrajectoryWriter;
    use crate::observer::TrajectoryObserver;
    use crate::row::StepSummaryRow;
    use crate::writer::TrajectoryWriter;

    use super::helpers::one_vehicle_sim;

    #[test]
    fn writes_headers_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CsvTrajectoryWriter::new(dir.path()).unwrap();
        let mut obs = TrajectoryObserver::new(writer);

        let mut sim = one_vehicle_sim();
        sim.run_with(2, 1.0, &mut obs);
        assert!(obs.take_error().is_none());
        obs.into_writer().finish().unwrap();

        let samples = std::fs::read_to_string(dir.path().join("vehicle_samples.csv")).unwrap();
        let mut lines = samples.lines();
        assert_eq!(
            lines.next().unwrap(),
            "tick,vehicle_id,profile,street_id,lane,position_s,speed_mps,x,y"
        );
        assert_eq!(lines.count(), 2);

        let summaries = std::fs::read_to_string(dir.path().join("step_summaries.csv")).unwrap();
        let mut lines = summaries.lines();
        assert_eq!(lines.next().unwrap(), "tick,live_vehicles");
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CsvTrajectoryWriter::new(dir.path()).unwrap();
        writer
            .write_step_summary(&StepSummaryRow { tick: 0, live_vehicles: 0 })
            .unwrap();
        writer.finish().unwrap();
        writer.finish().unwrap();
    }
}
