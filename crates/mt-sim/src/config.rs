//! Simulation configuration.

use mt_signal::PhaseTimings;
use mt_vehicle::ProfileSet;

/// Where signal controllers get installed when a simulator is constructed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignalPolicy {
    /// A controller at every node with incoming lanes, governing all of
    /// them.  The default, and what imported city networks get.
    AllIncoming,
    /// No controllers at all; every intersection is free.
    None,
}

/// Immutable per-run configuration, passed to every `Simulator`
/// constructor.  These knobs are deliberately not module globals: two
/// simulators in one process can carry different cycles and driver mixes.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Master RNG seed.  Also seeds the synthetic network generators in
    /// `from_planar`/`from_grid`.  The same seed always reproduces the run.
    pub seed: u64,

    /// Seed spawns performed by [`run`][crate::Simulator::run] before the
    /// first tick.
    pub initial_vehicles: usize,

    /// Probability that a finished vehicle is replaced by a fresh spawn.
    pub respawn_probability: f64,

    pub signal_policy: SignalPolicy,
    pub phase_timings: PhaseTimings,
    pub profiles: ProfileSet,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_vehicles: 10,
            respawn_probability: 0.7,
            signal_policy: SignalPolicy::AllIncoming,
            phase_timings: PhaseTimings::default(),
            profiles: ProfileSet::standard(),
        }
    }
}

impl SimConfig {
    /// Convenience: the default configuration with a different seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }
}
