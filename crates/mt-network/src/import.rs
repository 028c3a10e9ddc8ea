//! Imported-graph contract.
//!
//! The geospatial extraction itself (provider queries, projection, tag
//! scraping) is an external collaborator behind the [`GraphSource`] trait.
//! What it must deliver is an [`ImportedGraph`]: nodes in projected metric
//! coordinates and edges carrying raw-ish tag values.  This module turns
//! that contract into a validated [`Network`]:
//!
//! - `maxspeed` is km/h, defaulting to 50 when absent or unparseable;
//! - `lanes` defaults to 1;
//! - `turn:lanes` uses the `lane1|lane2|…` syntax, each lane a
//!   `;`-separated token set mapped by containment (left/right/through, in
//!   that precedence); unmapped tokens are preserved verbatim;
//! - lanes beyond the `turn:lanes` count are padded with `[through]`;
//! - `oneway == false` emits a mirrored street with reversed polyline and
//!   identical lane/speed metadata.

use mt_core::{NodeId, Point2};

use crate::error::{NetworkError, NetworkResult};
use crate::geometry::kmh_to_mps;
use crate::network::{Network, NetworkBuilder};
use crate::street::{Lane, LaneRule};

/// Speed limit assumed when `maxspeed` is absent or unparseable, km/h.
pub const DEFAULT_MAXSPEED_KMH: f64 = 50.0;

// ── Contract types ────────────────────────────────────────────────────────────

/// A road graph as delivered by an external map extractor.
#[derive(Clone, Debug, Default)]
pub struct ImportedGraph {
    /// Node positions in projected metric coordinates.
    pub nodes: Vec<Point2>,
    pub edges: Vec<ImportedEdge>,
}

/// One directed edge of an [`ImportedGraph`].
#[derive(Clone, Debug)]
pub struct ImportedEdge {
    /// Index into [`ImportedGraph::nodes`].
    pub from: usize,
    /// Index into [`ImportedGraph::nodes`].
    pub to: usize,
    /// Polyline in metres, ≥ 2 points, running start → end.
    pub polyline: Vec<Point2>,
    /// Raw `maxspeed` tag value in km/h, if present.
    pub maxspeed: Option<String>,
    /// Raw `lanes` tag value, if present.
    pub lanes: Option<u32>,
    /// Raw `turn:lanes` tag value, if present.
    pub turn_lanes: Option<String>,
    /// `false` means the road is drivable both ways and gets mirrored.
    pub oneway: bool,
}

/// An external adapter that extracts a road graph around some configured
/// center, out to `radius_m`.
pub trait GraphSource {
    fn extract(&self, radius_m: f64) -> NetworkResult<ImportedGraph>;
}

// ── Conversion ────────────────────────────────────────────────────────────────

/// Build a [`Network`] from an imported graph, applying the tag defaults and
/// the oneway mirroring described in the module docs.
pub fn network_from_imported(graph: &ImportedGraph) -> NetworkResult<Network> {
    if graph.nodes.is_empty() {
        return Err(NetworkError::Empty);
    }

    let mut builder = NetworkBuilder::with_capacity(graph.nodes.len(), graph.edges.len() * 2);
    for &pos in &graph.nodes {
        builder.add_intersection(pos);
    }

    for (i, edge) in graph.edges.iter().enumerate() {
        if edge.from >= graph.nodes.len() || edge.to >= graph.nodes.len() {
            return Err(NetworkError::Import(format!(
                "edge {i} references node {} outside 0..{}",
                edge.from.max(edge.to),
                graph.nodes.len()
            )));
        }

        let speed_mps = kmh_to_mps(parse_maxspeed(edge.maxspeed.as_deref()));
        let lanes = assemble_lanes(edge.turn_lanes.as_deref(), edge.lanes.unwrap_or(1));

        builder.add_street(
            NodeId(edge.from as u32),
            NodeId(edge.to as u32),
            edge.polyline.clone(),
            speed_mps,
            lanes.clone(),
        );

        if !edge.oneway {
            let mut reversed = edge.polyline.clone();
            reversed.reverse();
            builder.add_street(
                NodeId(edge.to as u32),
                NodeId(edge.from as u32),
                reversed,
                speed_mps,
                lanes,
            );
        }
    }

    builder.build()
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// Parse a `maxspeed` tag into km/h, falling back to
/// [`DEFAULT_MAXSPEED_KMH`] when absent or unparseable.
fn parse_maxspeed(tag: Option<&str>) -> f64 {
    tag.and_then(|t| t.trim().parse::<f64>().ok())
        .filter(|v| *v > 0.0)
        .unwrap_or(DEFAULT_MAXSPEED_KMH)
}

/// Parse a `turn:lanes` tag (`lane1|lane2|…`, tokens `;`-separated within a
/// lane) into per-lane rule lists.
///
/// Token mapping is by containment — `slight_left` and `sharp_left` both
/// count as left — checked in left → right → through order; anything else
/// is preserved verbatim as [`LaneRule::Other`].
pub fn parse_turn_lanes(tag: &str) -> Vec<Lane> {
    if tag.is_empty() {
        return Vec::new();
    }
    tag.split('|')
        .map(|lane_entry| {
            let rules = lane_entry
                .split(';')
                .map(|token| {
                    if token.contains("left") {
                        LaneRule::Left
                    } else if token.contains("right") {
                        LaneRule::Right
                    } else if token.contains("through") {
                        LaneRule::Through
                    } else {
                        LaneRule::Other(token.to_string())
                    }
                })
                .collect();
            Lane::new(rules)
        })
        .collect()
}

/// Combine the `turn:lanes` parse with the `lanes` count: the street gets
/// `max(lanes_tag, parsed)` lanes, padding the difference with
/// through-only lanes.
fn assemble_lanes(turn_lanes: Option<&str>, lanes_tag: u32) -> Vec<Lane> {
    let mut lanes = turn_lanes.map(parse_turn_lanes).unwrap_or_default();
    let count = (lanes_tag.max(1) as usize).max(lanes.len());
    while lanes.len() < count {
        lanes.push(Lane::through_only());
    }
    lanes
}
