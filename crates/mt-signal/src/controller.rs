//! Per-intersection controllers and the simulator-owned controller set.

use rustc_hash::{FxHashMap, FxHashSet};

use mt_core::{NodeId, StreetId};
use mt_network::Network;

use crate::phase::{PhaseTimings, SignalPhase};

// ── SignalController ──────────────────────────────────────────────────────────

/// The traffic lights of a single intersection.
///
/// Starts in Green with zero elapsed time, so after any whole number of
/// cycles it is back in Green with `time_in_phase == 0` — the property the
/// cycle invariant tests pin down.
#[derive(Clone, Debug)]
pub struct SignalController {
    /// The incoming `(street, lane)` pairs this controller governs.
    governed: FxHashSet<(StreetId, u8)>,
    timings: PhaseTimings,
    phase: SignalPhase,
    time_in_phase_s: f64,
}

impl SignalController {
    pub fn new(governed: impl IntoIterator<Item = (StreetId, u8)>, timings: PhaseTimings) -> Self {
        Self {
            governed: governed.into_iter().collect(),
            timings,
            phase: SignalPhase::Green,
            time_in_phase_s: 0.0,
        }
    }

    #[inline]
    pub fn phase(&self) -> SignalPhase {
        self.phase
    }

    #[inline]
    pub fn time_in_phase_s(&self) -> f64 {
        self.time_in_phase_s
    }

    pub fn governs(&self, street: StreetId, lane: u8) -> bool {
        self.governed.contains(&(street, lane))
    }

    /// Jump to `phase` with zero elapsed time.  Used by tests and
    /// editor-style tooling; the simulator itself only ever calls
    /// [`advance`](Self::advance).
    pub fn force_phase(&mut self, phase: SignalPhase) {
        self.phase = phase;
        self.time_in_phase_s = 0.0;
    }

    /// Accumulate `dt` seconds, transitioning as many phases as the elapsed
    /// time covers.  The remainder carries over, so the cycle stays exact
    /// for any tick size.
    pub fn advance(&mut self, dt: f64) {
        debug_assert!(self.timings.cycle_s() > 0.0, "phase cycle must have positive length");
        self.time_in_phase_s += dt;
        while self.time_in_phase_s >= self.timings.duration(self.phase) {
            self.time_in_phase_s -= self.timings.duration(self.phase);
            self.phase = self.phase.next();
        }
    }

    /// Whether a vehicle approaching on `(street, lane)` may enter.
    ///
    /// True for ungoverned pairs (a free approach at a signalled node) and
    /// whenever the phase is Green or Yellow.
    pub fn may_enter(&self, street: StreetId, lane: u8) -> bool {
        !self.governs(street, lane) || self.phase.admits_entry()
    }
}

// ── SignalSet ─────────────────────────────────────────────────────────────────

/// All signal controllers of a simulation, keyed by intersection.
///
/// Owned and mutated by the simulator; vehicles query it read-only.  Nodes
/// without a controller are free intersections — entry is always allowed.
#[derive(Default)]
pub struct SignalSet {
    controllers: FxHashMap<NodeId, SignalController>,
}

impl SignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install controllers at every node with at least one incoming lane,
    /// each governing all of that node's incoming `(street, lane)` pairs.
    pub fn install_for_network(network: &Network, timings: PhaseTimings) -> Self {
        let mut incoming: FxHashMap<NodeId, Vec<(StreetId, u8)>> = FxHashMap::default();
        for street in network.streets() {
            let entry = incoming.entry(street.end).or_default();
            for lane in 0..street.lane_count() {
                entry.push((street.id, lane));
            }
        }
        Self {
            controllers: incoming
                .into_iter()
                .map(|(node, pairs)| (node, SignalController::new(pairs, timings)))
                .collect(),
        }
    }

    pub fn install(&mut self, node: NodeId, controller: SignalController) {
        self.controllers.insert(node, controller);
    }

    pub fn get(&self, node: NodeId) -> Option<&SignalController> {
        self.controllers.get(&node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut SignalController> {
        self.controllers.get_mut(&node)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Advance every controller by `dt`.  Controllers are independent, so
    /// map iteration order does not affect the outcome.
    pub fn advance_all(&mut self, dt: f64) {
        for controller in self.controllers.values_mut() {
            controller.advance(dt);
        }
    }

    /// Whether a vehicle arriving at `node` on `(street, lane)` may enter.
    /// Nodes without a controller are free.
    pub fn may_enter(&self, node: NodeId, street: StreetId, lane: u8) -> bool {
        match self.controllers.get(&node) {
            None => true,
            Some(c) => c.may_enter(street, lane),
        }
    }
}
