//! The `Simulator` struct and its tick loop.

use log::debug;
use rustc_hash::FxHashMap;

use mt_core::{NodeId, Point2, ProfileId, SimRng, StreetId, VehicleId};
use mt_network::{
    grid_network, network_from_imported, planar_network, shortest_route, GraphSource,
    ImportedGraph, Network, Street,
};
use mt_signal::{SignalPhase, SignalSet};
use mt_vehicle::{LeaderView, Vehicle};

use crate::config::{SignalPolicy, SimConfig};
use crate::error::SimResult;
use crate::observer::{NoopObserver, SimObserver};

// ── Views ─────────────────────────────────────────────────────────────────────

/// Read-only per-intersection snapshot for rendering collaborators.
#[derive(Copy, Clone, Debug)]
pub struct IntersectionView {
    pub id: NodeId,
    pub pos: Point2,
    /// Observed signal phase, or `None` for a free intersection.
    pub phase: Option<SignalPhase>,
}

// ── Simulator ─────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// Owns the immutable [`Network`], the [`SignalSet`], and the vehicle
/// collection; vehicles reference both only through ids.  Fields are `pub`
/// for direct read access on hot paths — construction goes through the
/// `from_*` constructors, and only [`step`](Self::step) should mutate state
/// during a run.
pub struct Simulator {
    pub config: SimConfig,
    pub network: Network,
    pub signals: SignalSet,
    pub vehicles: Vec<Vehicle>,

    /// Spawn/sink candidates: nodes with directed out-degree ≤ 1, cached at
    /// construction since the network never changes.
    boundary: Vec<NodeId>,
    rng: SimRng,
    next_vehicle: u32,
    tick: u64,
}

impl Simulator {
    // ── Constructors ──────────────────────────────────────────────────────

    /// Wrap an already-built network, applying the configured signal policy.
    pub fn from_network(network: Network, config: SimConfig) -> Self {
        let signals = match config.signal_policy {
            SignalPolicy::AllIncoming => {
                SignalSet::install_for_network(&network, config.phase_timings)
            }
            SignalPolicy::None => SignalSet::new(),
        };
        let boundary = network.boundary_nodes();
        debug!(
            "simulator ready: {} nodes, {} streets, {} signals, {} boundary nodes",
            network.node_count(),
            network.street_count(),
            signals.len(),
            boundary.len()
        );
        let rng = SimRng::new(config.seed);
        Self {
            config,
            network,
            signals,
            vehicles: Vec::new(),
            boundary,
            rng,
            next_vehicle: 0,
            tick: 0,
        }
    }

    /// Random planar network with `nodes` intersections and `edges` streets,
    /// seeded from `config.seed`.
    pub fn from_planar(nodes: usize, edges: usize, config: SimConfig) -> SimResult<Self> {
        let network = planar_network(nodes, edges, config.seed)?;
        Ok(Self::from_network(network, config))
    }

    /// Toroidal `rows`×`cols` grid, seeded from `config.seed`.
    pub fn from_grid(rows: usize, cols: usize, config: SimConfig) -> SimResult<Self> {
        let network = grid_network(rows, cols, config.seed)?;
        Ok(Self::from_network(network, config))
    }

    /// Network delivered by an external map extractor.
    pub fn from_imported(graph: &ImportedGraph, config: SimConfig) -> SimResult<Self> {
        let network = network_from_imported(graph)?;
        Ok(Self::from_network(network, config))
    }

    /// Extract a graph from `source` out to `radius_m`, then build.
    pub fn from_source<S: GraphSource>(
        source: &S,
        radius_m: f64,
        config: SimConfig,
    ) -> SimResult<Self> {
        let graph = source.extract(radius_m)?;
        Self::from_imported(&graph, config)
    }

    // ── Read-only views ───────────────────────────────────────────────────

    /// Ticks completed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn streets(&self) -> impl Iterator<Item = &Street> {
        self.network.streets()
    }

    /// Intersections with their observed signal phase.
    pub fn intersections(&self) -> impl Iterator<Item = IntersectionView> + '_ {
        self.network.intersections().map(|(id, inter)| IntersectionView {
            id,
            pos: inter.pos,
            phase: self.signals.get(id).map(|c| c.phase()),
        })
    }

    // ── Spawning ──────────────────────────────────────────────────────────

    /// Spawn a vehicle between two random distinct boundary nodes.
    ///
    /// Silently skips (returns `None`) when fewer than two boundary nodes
    /// exist or the drawn pair is unreachable — an unreachable sink is not
    /// an error.
    pub fn spawn_vehicle(&mut self) -> Option<VehicleId> {
        if self.boundary.len() < 2 {
            return None;
        }
        let start = self.boundary[self.rng.gen_range(0..self.boundary.len())];
        let mut goal = self.boundary[self.rng.gen_range(0..self.boundary.len())];
        while goal == start {
            goal = self.boundary[self.rng.gen_range(0..self.boundary.len())];
        }
        self.spawn_between(start, goal)
    }

    /// Manually inject a vehicle routed from `start` to `goal`.
    ///
    /// Lane and profile are still drawn from the simulation RNG.  Returns
    /// `None` when no route exists.
    pub fn spawn_route(&mut self, start: NodeId, goal: NodeId) -> Option<VehicleId> {
        self.spawn_between(start, goal)
    }

    fn spawn_between(&mut self, start: NodeId, goal: NodeId) -> Option<VehicleId> {
        let route = shortest_route(&self.network, start, goal);
        if route.is_empty() {
            return None;
        }

        let first = self.network.street(route[0]);
        let lane = self.rng.gen_range(0..first.lane_count());
        let profile_id = ProfileId(self.rng.gen_range(0..self.config.profiles.len() as u16));
        let profile = self.config.profiles.profile(profile_id);

        let id = VehicleId(self.next_vehicle);
        self.next_vehicle += 1;
        self.vehicles
            .push(Vehicle::new(id, profile_id, profile, first, lane, route));
        Some(id)
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run one tick of `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        // ① Signals.
        self.signals.advance_all(dt);

        // ② Bucket vehicle indices by (street, lane).  Bucket keys are
        // sorted before processing so the tick is deterministic by
        // construction, independent of hash iteration order.
        let mut buckets: FxHashMap<(StreetId, u8), Vec<usize>> = FxHashMap::default();
        for (i, v) in self.vehicles.iter().enumerate() {
            buckets.entry((v.street, v.lane)).or_default().push(i);
        }
        let mut keys: Vec<(StreetId, u8)> = buckets.keys().copied().collect();
        keys.sort_unstable();

        // Disjoint field borrows: vehicles mutate, network/signals are read.
        let vehicles = &mut self.vehicles;
        let network = &self.network;
        let signals = &self.signals;

        for key in keys {
            let mut order = buckets.remove(&key).unwrap_or_default();
            // Ascending by position; ties break by vehicle id so the order
            // is stable across ticks.
            order.sort_unstable_by(|&a, &b| {
                vehicles[a]
                    .position_s
                    .total_cmp(&vehicles[b].position_s)
                    .then_with(|| vehicles[a].id.cmp(&vehicles[b].id))
            });

            // ③ Update rear to front.  The leader of order[i] is order[i+1]
            // — the vehicle with the larger arc position — snapshotted
            // before its own update this tick.
            for i in 0..order.len() {
                let leader = order.get(i + 1).map(|&j| LeaderView {
                    position_s: vehicles[j].position_s,
                });
                vehicles[order[i]].update(dt, leader, network, signals);
            }
        }

        // ④ Drop finished vehicles.
        let before = self.vehicles.len();
        self.vehicles.retain(|v| !v.finished);
        let removed = before - self.vehicles.len();

        // ⑤ Replacement spawns.
        for _ in 0..removed {
            if self.rng.gen_bool(self.config.respawn_probability) {
                self.spawn_vehicle();
            }
        }

        self.tick += 1;
    }

    /// Seed-spawn `config.initial_vehicles` and run `steps` ticks.
    pub fn run(&mut self, steps: usize, dt: f64) {
        self.run_with(steps, dt, &mut NoopObserver);
    }

    /// As [`run`](Self::run), driving an observer around every tick.
    pub fn run_with<O: SimObserver>(&mut self, steps: usize, dt: f64, observer: &mut O) {
        for _ in 0..self.config.initial_vehicles {
            self.spawn_vehicle();
        }
        for _ in 0..steps {
            let tick = self.tick;
            observer.on_step_start(tick);
            self.step(dt);
            observer.on_step_end(tick, self);
        }
        observer.on_run_end(self.tick, self);
    }
}
