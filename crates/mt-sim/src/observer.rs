//! Simulation observer trait for progress reporting and data collection.

use crate::sim::Simulator;

/// Callbacks invoked by [`Simulator::run_with`] around every tick.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  The simulator passes itself read-only;
/// observers pull whatever views they need (vehicles, signals, positions).
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_step_end(&mut self, tick: u64, sim: &Simulator) {
///         if tick % self.interval == 0 {
///             println!("tick {tick}: {} vehicles live", sim.vehicles.len());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before a tick runs.  `tick` is the index the tick will have.
    fn on_step_start(&mut self, _tick: u64) {}

    /// Called after a tick completed, with the simulator's post-tick state.
    fn on_step_end(&mut self, _tick: u64, _sim: &Simulator) {}

    /// Called once after the final tick of a `run_with` call.
    fn on_run_end(&mut self, _final_tick: u64, _sim: &Simulator) {}
}

/// A [`SimObserver`] that does nothing.  Backs [`Simulator::run`].
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
