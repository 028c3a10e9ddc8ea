//! Network arena and builder.
//!
//! # Data layout
//!
//! Intersections and streets live in arena `Vec`s indexed by their typed
//! ids.  Outgoing adjacency uses **Compressed Sparse Row (CSR)** form:
//! given a `NodeId n`, the streets leaving it occupy the slice
//!
//! ```text
//! adj_street[ adj_start[n] .. adj_start[n+1] ]
//! ```
//!
//! sorted by (source node, street id), so iteration order is a contiguous
//! scan and deterministic — routing tie-breaks depend on that.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps projected positions to the nearest
//! intersection.  Rendering and editor-style collaborators use it to turn a
//! cursor position into a `NodeId`.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use mt_core::{NodeId, Point2, StreetId};

use crate::error::{NetworkError, NetworkResult};
use crate::geometry;
use crate::street::{Lane, Street};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a projected `[x, y]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Intersection ──────────────────────────────────────────────────────────────

/// A graph vertex.  Signals are not stored here — the network is immutable
/// for the simulation's lifetime, and signal state lives with the simulator.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection {
    /// Projected metric position.
    pub pos: Point2,
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Immutable directed road graph.
///
/// Construct via [`NetworkBuilder`], [`crate::synth`], or
/// [`crate::import::network_from_imported`].
pub struct Network {
    intersections: Vec<Intersection>,
    streets: Vec<Street>,

    /// CSR row pointer.  Streets leaving node `n` are at
    /// `adj_street[adj_start[n] .. adj_start[n+1]]`.  Length = node count + 1.
    adj_start: Vec<u32>,
    /// Street ids sorted by (source node, street id).
    adj_street: Vec<StreetId>,

    spatial_idx: RTree<NodeEntry>,
}

impl Network {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.intersections.len()
    }

    pub fn street_count(&self) -> usize {
        self.streets.len()
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    #[inline]
    pub fn intersection(&self, id: NodeId) -> &Intersection {
        &self.intersections[id.index()]
    }

    #[inline]
    pub fn street(&self, id: StreetId) -> &Street {
        &self.streets[id.index()]
    }

    pub fn intersections(&self) -> impl Iterator<Item = (NodeId, &Intersection)> {
        self.intersections
            .iter()
            .enumerate()
            .map(|(i, inter)| (NodeId(i as u32), inter))
    }

    pub fn streets(&self) -> impl Iterator<Item = &Street> {
        self.streets.iter()
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    /// Streets leaving `node`, sorted by street id.  Contiguous slice — no
    /// allocation.
    #[inline]
    pub fn out_streets(&self, node: NodeId) -> &[StreetId] {
        let start = self.adj_start[node.index()] as usize;
        let end = self.adj_start[node.index() + 1] as usize;
        &self.adj_street[start..end]
    }

    /// Directed out-degree of `node`.
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_streets(node).len()
    }

    /// Outgoing adjacency as `(neighbor, cost, street)` triples — the
    /// routing view of a node.  Cost is the street length in metres.
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64, StreetId)> + '_ {
        self.out_streets(node).iter().map(|&sid| {
            let st = self.street(sid);
            (st.end, st.length_m, sid)
        })
    }

    /// Nodes with directed out-degree ≤ 1, ascending — the spawn/sink
    /// candidates at the edge of the map.
    pub fn boundary_nodes(&self) -> Vec<NodeId> {
        (0..self.node_count() as u32)
            .map(NodeId)
            .filter(|&n| self.out_degree(n) <= 1)
            .collect()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The intersection nearest to `pos`, or `None` for an empty network.
    pub fn nearest_intersection(&self, pos: Point2) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Accumulates intersections and streets in any order, then validates and
/// builds the CSR arrays and spatial index in [`build`](Self::build).
///
/// # Example
///
/// ```
/// use mt_core::Point2;
/// use mt_network::{Lane, NetworkBuilder};
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_intersection(Point2::new(0.0, 0.0));
/// let c = b.add_intersection(Point2::new(120.0, 0.0));
/// b.add_street(a, c, vec![Point2::new(0.0, 0.0), Point2::new(120.0, 0.0)],
///              13.9, vec![Lane::all_turns()]);
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.street_count(), 1);
/// ```
pub struct NetworkBuilder {
    nodes: Vec<Point2>,
    streets: Vec<RawStreet>,
}

struct RawStreet {
    start: NodeId,
    end: NodeId,
    polyline: Vec<Point2>,
    length_m: f64,
    speed_limit_mps: f64,
    lanes: Vec<Lane>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            streets: Vec::new(),
        }
    }

    /// Pre-allocate for the expected sizes to reduce reallocations when
    /// bulk-loading from an importer.
    pub fn with_capacity(nodes: usize, streets: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            streets: Vec::with_capacity(streets),
        }
    }

    /// Add an intersection and return its `NodeId` (sequential from 0).
    pub fn add_intersection(&mut self, pos: Point2) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a directed street whose length is the polyline arc length.
    pub fn add_street(
        &mut self,
        start: NodeId,
        end: NodeId,
        polyline: Vec<Point2>,
        speed_limit_mps: f64,
        lanes: Vec<Lane>,
    ) -> StreetId {
        let length_m = geometry::polyline_arc_length(&polyline);
        self.add_street_with_length(start, end, polyline, length_m, speed_limit_mps, lanes)
    }

    /// Add a directed street with an explicit length attribute (synthetic
    /// generators assign stylized lengths independent of the geometry).
    pub fn add_street_with_length(
        &mut self,
        start: NodeId,
        end: NodeId,
        polyline: Vec<Point2>,
        length_m: f64,
        speed_limit_mps: f64,
        lanes: Vec<Lane>,
    ) -> StreetId {
        let id = StreetId(self.streets.len() as u32);
        self.streets.push(RawStreet {
            start,
            end,
            polyline,
            length_m,
            speed_limit_mps,
            lanes,
        });
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn street_count(&self) -> usize {
        self.streets.len()
    }

    /// Position of an intersection added earlier (generators use this to
    /// assemble polylines between placed nodes).
    pub fn intersection_pos(&self, id: NodeId) -> Point2 {
        self.nodes[id.index()]
    }

    /// Validate everything, build the CSR adjacency and R-tree, and return
    /// the immutable [`Network`].
    ///
    /// # Errors
    ///
    /// Any violated street invariant (missing endpoint, short polyline,
    /// non-positive length, empty lanes or rules) aborts the build; no
    /// partial network is returned.
    pub fn build(self) -> NetworkResult<Network> {
        if self.nodes.is_empty() {
            return Err(NetworkError::Empty);
        }

        let node_count = self.nodes.len();
        for (i, raw) in self.streets.iter().enumerate() {
            let id = StreetId(i as u32);
            for node in [raw.start, raw.end] {
                if node.index() >= node_count {
                    return Err(NetworkError::MissingEndpoint { street: id, node });
                }
            }
            if raw.polyline.len() < 2 {
                return Err(NetworkError::ShortPolyline { street: id });
            }
            if raw.length_m <= 0.0 {
                return Err(NetworkError::ZeroLength { street: id });
            }
            if raw.lanes.is_empty() {
                return Err(NetworkError::NoLanes { street: id });
            }
            for (lane, lane_def) in raw.lanes.iter().enumerate() {
                if lane_def.rules().is_empty() {
                    return Err(NetworkError::EmptyLane {
                        street: id,
                        lane: lane as u8,
                    });
                }
            }
        }

        let streets: Vec<Street> = self
            .streets
            .into_iter()
            .enumerate()
            .map(|(i, raw)| {
                Street::new(
                    StreetId(i as u32),
                    raw.start,
                    raw.end,
                    raw.polyline,
                    raw.length_m,
                    raw.speed_limit_mps,
                    raw.lanes,
                )
            })
            .collect();

        // CSR construction: count, prefix-sum, then place street ids sorted
        // by (source, id).  Street ids are already ascending, so a stable
        // counting pass keeps per-node slices id-sorted.
        let mut adj_start = vec![0u32; node_count + 1];
        for st in &streets {
            adj_start[st.start.index() + 1] += 1;
        }
        for i in 1..=node_count {
            adj_start[i] += adj_start[i - 1];
        }
        let mut cursor = adj_start.clone();
        let mut adj_street = vec![StreetId::INVALID; streets.len()];
        for st in &streets {
            let slot = cursor[st.start.index()] as usize;
            adj_street[slot] = st.id;
            cursor[st.start.index()] += 1;
        }
        debug_assert_eq!(adj_start[node_count] as usize, streets.len());

        // Bulk-load the R-tree (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.x, pos.y],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Ok(Network {
            intersections: self.nodes.into_iter().map(|pos| Intersection { pos }).collect(),
            streets,
            adj_start,
            adj_street,
            spatial_idx,
        })
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
