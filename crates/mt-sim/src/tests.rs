//! Integration tests for mt-sim: constructor validation, tick mechanics,
//! and the fixed-seed end-to-end scenarios.

#[cfg(test)]
mod helpers {
    use mt_core::Point2;
    use mt_network::{Lane, Network, NetworkBuilder};
    use mt_vehicle::{DriverProfile, ProfileSet};

    use crate::config::{SignalPolicy, SimConfig};

    /// Two 100 m single-lane streets in a row: a → b → c, limit 20 m/s.
    pub fn corridor() -> Network {
        let p = |x, y| Point2::new(x, y);
        let mut b = NetworkBuilder::new();
        let na = b.add_intersection(p(0.0, 0.0));
        let nb = b.add_intersection(p(100.0, 0.0));
        let nc = b.add_intersection(p(200.0, 0.0));
        b.add_street(na, nb, vec![p(0.0, 0.0), p(100.0, 0.0)], 20.0, vec![Lane::all_turns()]);
        b.add_street(nb, nc, vec![p(100.0, 0.0), p(200.0, 0.0)], 20.0, vec![Lane::all_turns()]);
        b.build().unwrap()
    }

    /// One 100 m single-lane street: a → b, limit 20 m/s.
    pub fn single_street() -> Network {
        let p = |x, y| Point2::new(x, y);
        let mut b = NetworkBuilder::new();
        let na = b.add_intersection(p(0.0, 0.0));
        let nb = b.add_intersection(p(100.0, 0.0));
        b.add_street(na, nb, vec![p(0.0, 0.0), p(100.0, 0.0)], 20.0, vec![Lane::all_turns()]);
        b.build().unwrap()
    }

    /// Config with only the `normal` profile, no signals, no respawning —
    /// the controlled setting for the kinematic scenarios.
    pub fn bare_config() -> SimConfig {
        SimConfig {
            seed: 42,
            initial_vehicles: 0,
            respawn_probability: 0.0,
            signal_policy: SignalPolicy::None,
            profiles: ProfileSet::custom(vec![(
                "normal".into(),
                DriverProfile { speed_factor: 1.0, reaction_time_s: 1.0 },
            )]),
            ..SimConfig::default()
        }
    }
}

// ── Constructors ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod constructors {
    use mt_network::NetworkError;

    use super::helpers::bare_config;
    use crate::config::SimConfig;
    use crate::error::SimError;
    use crate::sim::Simulator;

    #[test]
    fn single_node_network_steps_as_noop() {
        let mut sim = Simulator::from_planar(1, 0, bare_config()).unwrap();
        assert_eq!(sim.network.node_count(), 1);
        assert_eq!(sim.network.street_count(), 0);
        sim.step(1.0);
        sim.step(1.0);
        assert_eq!(sim.vehicle_count(), 0);
        assert_eq!(sim.tick(), 2);
        // Fewer than two boundary nodes: spawning silently skips.
        assert!(sim.spawn_vehicle().is_none());
    }

    #[test]
    fn underconnected_request_is_input_error() {
        // 3 nodes cannot be connected with a single edge.
        let result = Simulator::from_planar(3, 1, bare_config());
        assert!(matches!(
            result,
            Err(SimError::Network(NetworkError::TooFewEdges { min: 2, .. }))
        ));
    }

    #[test]
    fn grid_constructor_installs_signals_everywhere() {
        let sim = Simulator::from_grid(2, 2, SimConfig::default()).unwrap();
        // Every grid node has incoming lanes, so every node is signalled.
        assert_eq!(sim.signals.len(), 4);
        for view in sim.intersections() {
            assert!(view.phase.is_some());
        }
    }

    #[test]
    fn signal_policy_none_leaves_intersections_free() {
        let sim = Simulator::from_grid(2, 2, bare_config()).unwrap();
        assert!(sim.signals.is_empty());
        assert!(sim.intersections().all(|v| v.phase.is_none()));
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spawning {
    use mt_core::NodeId;

    use super::helpers::{bare_config, corridor};
    use crate::sim::Simulator;

    #[test]
    fn boundary_spawns_produce_valid_vehicles() {
        let mut sim = Simulator::from_network(corridor(), bare_config());
        let mut spawned = 0;
        for _ in 0..20 {
            if sim.spawn_vehicle().is_some() {
                spawned += 1;
            }
        }
        // Some draws hit unreachable pairs (e.g. starting at the sink) and
        // skip silently; the reachable pairs must succeed.
        assert!(spawned > 0);
        assert_eq!(sim.vehicle_count(), spawned);
        for v in &sim.vehicles {
            assert_eq!(v.position_s, 0.0);
            assert_eq!(v.speed_mps, 0.0);
            assert_eq!(v.route[v.route_index], v.street);
            assert!(v.lane < sim.network.street(v.street).lane_count());
            assert!((v.profile.index()) < sim.config.profiles.len());
        }
    }

    #[test]
    fn vehicle_ids_are_unique_and_monotonic() {
        let mut sim = Simulator::from_network(corridor(), bare_config());
        let a = sim.spawn_route(NodeId(0), NodeId(2)).unwrap();
        let b = sim.spawn_route(NodeId(0), NodeId(1)).unwrap();
        assert!(b > a);
    }

    #[test]
    fn unreachable_route_skips_silently() {
        let mut sim = Simulator::from_network(corridor(), bare_config());
        // c is the sink; nothing leaves it.
        assert!(sim.spawn_route(NodeId(2), NodeId(0)).is_none());
        assert_eq!(sim.vehicle_count(), 0);
    }

    #[test]
    fn torus_has_no_boundary_spawns() {
        let mut sim = Simulator::from_grid(3, 3, bare_config()).unwrap();
        assert!(sim.spawn_vehicle().is_none());
        // Manual injection still works.
        assert!(sim.spawn_route(NodeId(0), NodeId(4)).is_some());
    }
}

// ── Tick mechanics ────────────────────────────────────────────────────────────

#[cfg(test)]
mod ticking {
    use mt_core::NodeId;
    use mt_signal::SignalPhase;

    use super::helpers::{bare_config, corridor};
    use crate::config::SimConfig;
    use crate::observer::SimObserver;
    use crate::sim::Simulator;

    #[test]
    fn finished_vehicles_are_dropped_without_respawn() {
        let mut sim = Simulator::from_network(corridor(), bare_config());
        sim.spawn_route(NodeId(0), NodeId(1)).unwrap();
        assert_eq!(sim.vehicle_count(), 1);
        // 100 m at ≤ 20 m/s with 2 m/s² takes well under 15 ticks.
        for _ in 0..15 {
            sim.step(1.0);
        }
        assert_eq!(sim.vehicle_count(), 0);
    }

    #[test]
    fn signals_advance_with_ticks_and_cycle() {
        let mut sim = Simulator::from_grid(2, 2, SimConfig::default()).unwrap();
        for view in sim.intersections() {
            assert_eq!(view.phase, Some(SignalPhase::Green));
        }
        for _ in 0..16 {
            sim.step(1.0);
        }
        for view in sim.intersections() {
            assert_eq!(view.phase, Some(SignalPhase::Yellow));
        }
        // One full cycle from the start: back in Green with zero elapsed.
        for _ in 0..(35 - 16) {
            sim.step(1.0);
        }
        for view in sim.intersections() {
            assert_eq!(view.phase, Some(SignalPhase::Green));
            let controller = sim.signals.get(view.id).unwrap();
            assert!(controller.time_in_phase_s().abs() < 1e-9);
        }
    }

    #[test]
    fn observer_hooks_fire_per_step() {
        #[derive(Default)]
        struct Counter {
            starts: usize,
            ends: usize,
            run_ends: usize,
            last_tick: u64,
        }
        impl SimObserver for Counter {
            fn on_step_start(&mut self, _tick: u64) {
                self.starts += 1;
            }
            fn on_step_end(&mut self, tick: u64, _sim: &Simulator) {
                self.ends += 1;
                self.last_tick = tick;
            }
            fn on_run_end(&mut self, final_tick: u64, _sim: &Simulator) {
                self.run_ends += 1;
                self.last_tick = final_tick;
            }
        }

        let mut sim = Simulator::from_network(corridor(), bare_config());
        let mut counter = Counter::default();
        sim.run_with(5, 1.0, &mut counter);
        assert_eq!(counter.starts, 5);
        assert_eq!(counter.ends, 5);
        assert_eq!(counter.run_ends, 1);
        assert_eq!(counter.last_tick, 5);
    }
}

// ── Universal invariants over a mixed run ─────────────────────────────────────

#[cfg(test)]
mod invariants {
    use crate::config::SimConfig;
    use crate::observer::SimObserver;
    use crate::sim::Simulator;

    /// Checks position/speed/lane bounds after every tick.
    #[derive(Default)]
    struct InvariantChecker;

    impl SimObserver for InvariantChecker {
        fn on_step_end(&mut self, tick: u64, sim: &Simulator) {
            for v in &sim.vehicles {
                let street = sim.network.street(v.street);
                assert!(
                    v.position_s >= 0.0 && v.position_s <= street.length_m,
                    "tick {tick}: {} position {} outside [0, {}]",
                    v.id,
                    v.position_s,
                    street.length_m
                );
                let cap = (street.speed_limit_mps * v.speed_factor).min(v.base_limit_mps);
                assert!(
                    v.speed_mps >= 0.0 && v.speed_mps <= cap + 1e-9,
                    "tick {tick}: {} speed {} above cap {cap}",
                    v.id,
                    v.speed_mps
                );
                assert!(v.lane < street.lane_count());
                assert_eq!(v.route[v.route_index], v.street);
            }
        }
    }

    #[test]
    fn bounds_hold_over_a_planar_run() {
        let mut sim = Simulator::from_planar(12, 14, SimConfig::with_seed(7)).unwrap();
        sim.run_with(60, 1.0, &mut InvariantChecker::default());
    }

    #[test]
    fn bounds_hold_without_signals_too() {
        let mut sim = Simulator::from_planar(12, 14, SimConfig {
            signal_policy: crate::config::SignalPolicy::None,
            ..SimConfig::with_seed(7)
        })
        .unwrap();
        sim.run_with(60, 1.0, &mut InvariantChecker::default());
    }

    #[test]
    fn follower_never_passes_its_leader() {
        use mt_core::NodeId;

        use super::helpers::{bare_config, single_street};

        let mut sim = Simulator::from_network(single_street(), bare_config());
        sim.spawn_route(NodeId(0), NodeId(1)).unwrap();
        sim.spawn_route(NodeId(0), NodeId(1)).unwrap();
        sim.vehicles[0].position_s = 3.0; // id 0 leads, id 1 trails

        // Same profile, same caps: the trailing car can never pass before
        // the leader reaches the end of the street.
        for _ in 0..8 {
            sim.step(1.0);
            let leader = sim.vehicles.iter().find(|v| v.id.0 == 0).unwrap();
            let trailer = sim.vehicles.iter().find(|v| v.id.0 == 1).unwrap();
            assert!(trailer.position_s < leader.position_s);
        }
    }
}

// ── Fixed-seed scenarios ──────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use mt_core::NodeId;
    use mt_signal::SignalPhase;

    use super::helpers::{bare_config, corridor, single_street};
    use crate::config::SimConfig;
    use crate::observer::SimObserver;
    use crate::sim::Simulator;

    /// Bit-exact trajectory recorder.
    #[derive(Default, PartialEq, Debug)]
    struct Trace {
        rows: Vec<(u64, u32, u32, u8, u64, u64)>,
    }

    impl SimObserver for Trace {
        fn on_step_end(&mut self, tick: u64, sim: &Simulator) {
            for v in &sim.vehicles {
                self.rows.push((
                    tick,
                    v.id.0,
                    v.street.0,
                    v.lane,
                    v.position_s.to_bits(),
                    v.speed_mps.to_bits(),
                ));
            }
        }
    }

    #[test]
    fn grid_runs_are_bit_identical() {
        let run = || {
            let config = SimConfig {
                initial_vehicles: 0,
                ..SimConfig::with_seed(42)
            };
            let mut sim = Simulator::from_grid(2, 2, config).unwrap();
            sim.spawn_route(NodeId(0), NodeId(3)).unwrap();
            let mut trace = Trace::default();
            sim.run_with(100, 1.0, &mut trace);
            trace
        };
        let first = run();
        let second = run();
        assert!(!first.rows.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn trailing_vehicle_brakes_behind_leader() {
        let mut sim = Simulator::from_network(corridor(), bare_config());
        sim.spawn_route(NodeId(0), NodeId(2)).unwrap();
        sim.spawn_route(NodeId(0), NodeId(2)).unwrap();
        // Leader 3 m ahead of the trailing vehicle on the same lane.
        sim.vehicles[1].position_s = 3.0;

        sim.step(1.0);

        let trailing = sim.vehicles.iter().find(|v| v.id.0 == 0).unwrap();
        let leading = sim.vehicles.iter().find(|v| v.id.0 == 1).unwrap();
        // Gap 3 − 5 < 0 forces deceleration: the trailing car stays put.
        assert!(trailing.speed_mps < 2.0);
        assert_eq!(trailing.position_s, 0.0);
        // The leader was unobstructed and accelerated normally.
        assert_eq!(leading.speed_mps, 2.0);
    }

    #[test]
    fn vehicle_settles_at_red_stop_line() {
        let config = SimConfig {
            signal_policy: crate::config::SignalPolicy::AllIncoming,
            ..bare_config()
        };
        let mut sim = Simulator::from_network(single_street(), config);
        sim.signals
            .get_mut(NodeId(1))
            .unwrap()
            .force_phase(SignalPhase::Red);

        sim.spawn_route(NodeId(0), NodeId(1)).unwrap();
        sim.vehicles[0].position_s = 60.0;
        sim.vehicles[0].speed_mps = 10.0;

        for _ in 0..10 {
            sim.step(1.0);
        }
        // Ten seconds in: still inside the 15 s red window.
        assert_eq!(
            sim.signals.get(NodeId(1)).unwrap().phase(),
            SignalPhase::Red
        );
        // The vehicle held at the stop line instead of crossing.
        assert_eq!(sim.vehicle_count(), 1);
        let v = &sim.vehicles[0];
        assert!(v.position_s <= 100.0);
        assert_eq!(v.speed_mps, 0.0);
        assert!(!v.finished);
    }

    #[test]
    fn held_vehicle_clears_on_green() {
        let config = SimConfig {
            signal_policy: crate::config::SignalPolicy::AllIncoming,
            ..bare_config()
        };
        let mut sim = Simulator::from_network(single_street(), config);
        sim.signals
            .get_mut(NodeId(1))
            .unwrap()
            .force_phase(SignalPhase::Red);
        sim.spawn_route(NodeId(0), NodeId(1)).unwrap();
        sim.vehicles[0].position_s = 99.0;
        sim.vehicles[0].speed_mps = 10.0;

        sim.step(1.0);
        // Overshot the end against a red light: clamped to the stop line.
        assert_eq!(sim.vehicle_count(), 1);
        assert_eq!(sim.vehicles[0].position_s, 100.0);

        sim.signals
            .get_mut(NodeId(1))
            .unwrap()
            .force_phase(SignalPhase::Green);
        sim.step(1.0);
        // Route exhausted on crossing: the vehicle finished and was dropped.
        assert_eq!(sim.vehicle_count(), 0);
    }
}
