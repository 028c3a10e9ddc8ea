//! Synthetic network generators.
//!
//! Two families:
//!
//! - [`planar_network`]: a random spanning tree plus non-crossing extra
//!   edges, node positions uniform in a 100×100 m box.  Vertex degree is
//!   capped at 4 and no two non-incident streets cross.
//! - [`grid_network`]: a toroidal R×C grid with wrap-around east and south
//!   streets — uniform in- and out-degree 2, no boundary nodes.
//!
//! Every generated street gets a uniform random length in [50, 300] m, a
//! uniform random speed limit in [30, 120] km/h, a straight two-point
//! polyline, and a single lane permitting all turns.  All randomness comes
//! from one seeded [`SimRng`] consumed in a fixed order, so a (shape, seed)
//! pair always produces the identical network.

use std::collections::HashSet;

use log::{debug, warn};

use mt_core::{NodeId, Point2, SimRng};

use crate::error::{NetworkError, NetworkResult};
use crate::geometry::{kmh_to_mps, segments_intersect};
use crate::network::{Network, NetworkBuilder};
use crate::street::Lane;

/// Candidate examinations allowed while placing extra planar edges before
/// the builder gives up.
const EXTRA_PLACEMENT_BUDGET: usize = 1_000;

const MAX_VERTEX_DEGREE: usize = 4;

const LENGTH_RANGE_M: std::ops::RangeInclusive<f64> = 50.0..=300.0;
const SPEED_RANGE_KMH: std::ops::RangeInclusive<f64> = 30.0..=120.0;

// ── Planar generator ──────────────────────────────────────────────────────────

/// Random planar-ish connected network with `nodes` intersections and
/// `edges` directed streets.
///
/// If the non-crossing placement budget runs out, the network is returned
/// with fewer streets than requested and a warning is logged.  Use
/// [`planar_network_strict`] to turn that shortfall into an error.
pub fn planar_network(nodes: usize, edges: usize, seed: u64) -> NetworkResult<Network> {
    build_planar(nodes, edges, seed, false)
}

/// As [`planar_network`], but a placement shortfall is
/// [`NetworkError::PlanarityExhausted`] instead of a best-effort result.
pub fn planar_network_strict(nodes: usize, edges: usize, seed: u64) -> NetworkResult<Network> {
    build_planar(nodes, edges, seed, true)
}

/// Maximum edge count for `n` nodes under the degree-4 and planarity caps.
fn edge_capacity(n: usize) -> usize {
    match n {
        0 | 1 => 0,
        2 => 1,
        _ => (2 * n).min(3 * n - 6),
    }
}

fn build_planar(nodes: usize, edges: usize, seed: u64, strict: bool) -> NetworkResult<Network> {
    // Eager input validation — no partial network on bad parameters.
    if nodes == 0 {
        return Err(NetworkError::Empty);
    }
    if nodes == 1 && edges > 0 {
        return Err(NetworkError::LoneNodeEdges { requested: edges });
    }
    if nodes > 1 && edges < nodes - 1 {
        return Err(NetworkError::TooFewEdges {
            nodes,
            requested: edges,
            min: nodes - 1,
        });
    }
    let max = edge_capacity(nodes);
    if edges > max {
        return Err(NetworkError::TooManyEdges {
            nodes,
            requested: edges,
            max,
        });
    }

    let mut rng = SimRng::new(seed);

    let positions: Vec<Point2> = (0..nodes)
        .map(|_| {
            let x = rng.gen_range(0.0..100.0);
            let y = rng.gen_range(0.0..100.0);
            Point2::new(x, y)
        })
        .collect();

    let mut degree = vec![0usize; nodes];
    // Accepted directed segments, tree edges first.
    let mut accepted: Vec<(usize, usize)> = Vec::with_capacity(edges);

    // ── Spanning tree: attach each node to a random connected one ─────────
    let mut connected: Vec<usize> = vec![0];
    for node in 1..nodes {
        let candidates: Vec<usize> = connected
            .iter()
            .copied()
            .filter(|&c| degree[c] < MAX_VERTEX_DEGREE)
            .collect();
        // A tree under a degree-4 cap always has a spare slot; guard anyway
        // so a future cap change fails loudly instead of panicking.
        if candidates.is_empty() {
            return Err(NetworkError::CapacityExhausted);
        }
        let attach = candidates[rng.gen_range(0..candidates.len())];
        accepted.push((attach, node));
        degree[attach] += 1;
        degree[node] += 1;
        connected.push(node);
    }

    // ── Extra edges: shuffled pool, non-crossing acceptance ───────────────
    let extras_wanted = edges - accepted.len();
    if extras_wanted > 0 {
        let tree_pairs: HashSet<(usize, usize)> = accepted
            .iter()
            .map(|&(a, b)| (a.min(b), a.max(b)))
            .collect();

        let mut pool: Vec<(usize, usize)> = Vec::new();
        for a in 0..nodes {
            for b in (a + 1)..nodes {
                if !tree_pairs.contains(&(a, b)) {
                    pool.push((a, b));
                }
            }
        }
        rng.shuffle(&mut pool);

        let mut placed = 0;
        let mut attempts = 0;
        for &(a, b) in &pool {
            if placed == extras_wanted || attempts >= EXTRA_PLACEMENT_BUDGET {
                break;
            }
            attempts += 1;

            if degree[a] >= MAX_VERTEX_DEGREE || degree[b] >= MAX_VERTEX_DEGREE {
                continue;
            }
            let crosses = accepted.iter().any(|&(u, v)| {
                // Shared endpoints are allowed to touch.
                if u == a || u == b || v == a || v == b {
                    return false;
                }
                segments_intersect(positions[a], positions[b], positions[u], positions[v])
            });
            if crosses {
                continue;
            }

            accepted.push((a, b));
            degree[a] += 1;
            degree[b] += 1;
            placed += 1;
        }

        if placed < extras_wanted {
            if strict {
                return Err(NetworkError::PlanarityExhausted {
                    placed,
                    requested: extras_wanted,
                });
            }
            warn!(
                "planar generator placed {placed} of {extras_wanted} extra edges \
                 within the crossing budget; returning best-effort network"
            );
        }
    }

    // ── Materialize streets ───────────────────────────────────────────────
    let mut builder = NetworkBuilder::with_capacity(nodes, accepted.len());
    for &pos in &positions {
        builder.add_intersection(pos);
    }
    for &(a, b) in &accepted {
        let length_m = rng.gen_range(LENGTH_RANGE_M);
        let speed_mps = kmh_to_mps(rng.gen_range(SPEED_RANGE_KMH));
        builder.add_street_with_length(
            NodeId(a as u32),
            NodeId(b as u32),
            vec![positions[a], positions[b]],
            length_m,
            speed_mps,
            vec![Lane::all_turns()],
        );
    }

    debug!(
        "planar generator: {} nodes, {} streets (requested {edges})",
        nodes,
        builder.street_count(),
    );
    builder.build()
}

// ── Toroidal grid generator ───────────────────────────────────────────────────

/// Grid spacing between adjacent intersections, metres.
const GRID_SPACING_M: f64 = 100.0;

/// Toroidal `rows`×`cols` grid: every node gets one street east and one
/// south, wrapping at the map edge, for uniform in- and out-degree 2.
///
/// Requires `rows ≥ 2 && cols ≥ 2` — below that the wrap-around edges
/// degenerate to self-loops and uniform degree 4 is impossible.
pub fn grid_network(rows: usize, cols: usize, seed: u64) -> NetworkResult<Network> {
    if rows < 2 || cols < 2 {
        return Err(NetworkError::GridTooSmall { rows, cols });
    }

    let mut rng = SimRng::new(seed);
    let mut builder = NetworkBuilder::with_capacity(rows * cols, 2 * rows * cols);

    let node_at = |row: usize, col: usize| NodeId((row * cols + col) as u32);

    for row in 0..rows {
        for col in 0..cols {
            builder.add_intersection(Point2::new(
                col as f64 * GRID_SPACING_M,
                -(row as f64) * GRID_SPACING_M,
            ));
        }
    }

    for row in 0..rows {
        for col in 0..cols {
            let here = node_at(row, col);
            let here_pos = builder.intersection_pos(here);

            let east = node_at(row, (col + 1) % cols);
            let east_len = rng.gen_range(LENGTH_RANGE_M);
            let east_speed = kmh_to_mps(rng.gen_range(SPEED_RANGE_KMH));
            let east_pos = builder.intersection_pos(east);
            builder.add_street_with_length(
                here,
                east,
                vec![here_pos, east_pos],
                east_len,
                east_speed,
                vec![Lane::all_turns()],
            );

            let south = node_at((row + 1) % rows, col);
            let south_len = rng.gen_range(LENGTH_RANGE_M);
            let south_speed = kmh_to_mps(rng.gen_range(SPEED_RANGE_KMH));
            let south_pos = builder.intersection_pos(south);
            builder.add_street_with_length(
                here,
                south,
                vec![here_pos, south_pos],
                south_len,
                south_speed,
                vec![Lane::all_turns()],
            );
        }
    }

    builder.build()
}
