//! grid-demo — smallest runnable example for the microtraffic simulator.
//!
//! Builds a 4×4 toroidal grid, injects a handful of vehicles, runs ten
//! simulated minutes at 1 s ticks, and writes per-tick trajectories as CSV
//! into `./out/`.

use std::fs;
use std::path::Path;

use anyhow::Result;

use mt_core::NodeId;
use mt_output::{CsvTrajectoryWriter, TrajectoryObserver};
use mt_sim::{SimConfig, SimObserver, Simulator};

const ROWS: usize = 4;
const COLS: usize = 4;
const SEED: u64 = 42;
const STEPS: usize = 600;
const DT_S: f64 = 1.0;

struct Progress;

impl SimObserver for Progress {
    fn on_step_end(&mut self, tick: u64, sim: &Simulator) {
        if tick % 100 == 0 {
            println!("tick {tick:>4}: {} vehicles live", sim.vehicle_count());
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = Path::new("out");
    fs::create_dir_all(out_dir)?;

    let config = SimConfig {
        // The torus has no boundary nodes, so seed spawns are manual below.
        initial_vehicles: 0,
        ..SimConfig::with_seed(SEED)
    };
    let mut sim = Simulator::from_grid(ROWS, COLS, config)?;

    // A spread of node-to-node trips across the grid.
    let nodes = sim.network.node_count() as u32;
    for i in 0..8u32 {
        let from = NodeId(i * 2 % nodes);
        let to = NodeId((i * 5 + 3) % nodes);
        let _ = sim.spawn_route(from, to);
    }
    println!("spawned {} vehicles on a {ROWS}x{COLS} torus", sim.vehicle_count());

    let writer = CsvTrajectoryWriter::new(out_dir)?;
    let mut output = TrajectoryObserver::new(writer);
    let mut progress = Progress;

    for _ in 0..STEPS {
        let tick = sim.tick();
        sim.step(DT_S);
        progress.on_step_end(tick, &sim);
        output.on_step_end(tick, &sim);
    }
    output.on_run_end(sim.tick(), &sim);
    if let Some(e) = output.take_error() {
        anyhow::bail!("output error: {e}");
    }

    println!("done; trajectories in {}", out_dir.display());
    Ok(())
}
