//! Shortest-path routing over the directed street graph.
//!
//! # Cost model
//!
//! Edge cost is the street's `length_m`.  Traffic is directed: only the
//! CSR out-adjacency is searched, never a mirrored reverse edge.
//!
//! # Determinism
//!
//! Heap entries order by (cost via `total_cmp`, node id), and CSR iteration
//! over a node's streets is id-sorted, so equal-cost ties always resolve the
//! same way for a given network.

use std::collections::BinaryHeap;

use mt_core::{NodeId, StreetId};

use crate::network::Network;

// ── Heap entry ────────────────────────────────────────────────────────────────

/// Min-heap entry.  `Ord` is reversed (and tie-broken by node id) so that
/// `BinaryHeap`, a max-heap, pops the cheapest entry first.
#[derive(Copy, Clone, PartialEq)]
struct HeapEntry {
    cost: f64,
    node: NodeId,
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Least-cost street sequence from `from` to `to`.
///
/// Returns the ordered street ids to traverse.  An unreachable sink — or
/// `from == to` — yields an **empty vector, not an error**; spawners treat
/// that as "skip this pair".
pub fn shortest_route(network: &Network, from: NodeId, to: NodeId) -> Vec<StreetId> {
    if from == to {
        return Vec::new();
    }

    let n = network.node_count();
    let mut dist = vec![f64::INFINITY; n];
    // prev_street[v] = street that reached v; INVALID for unreached nodes.
    let mut prev_street = vec![StreetId::INVALID; n];

    dist[from.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry { cost: 0.0, node: from });

    while let Some(HeapEntry { cost, node }) = heap.pop() {
        if node == to {
            return reconstruct(network, &prev_street, to);
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for (neighbor, edge_cost, street_id) in network.out_edges(node) {
            let new_cost = cost + edge_cost;

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_street[neighbor.index()] = street_id;
                heap.push(HeapEntry { cost: new_cost, node: neighbor });
            }
        }
    }

    Vec::new()
}

fn reconstruct(network: &Network, prev_street: &[StreetId], to: NodeId) -> Vec<StreetId> {
    let mut streets = Vec::new();
    let mut cur = to;
    loop {
        let s = prev_street[cur.index()];
        if s == StreetId::INVALID {
            break;
        }
        streets.push(s);
        cur = network.street(s).start;
    }
    streets.reverse();
    streets
}
