//! Network-subsystem error type.

use thiserror::Error;

use mt_core::{NodeId, StreetId};

/// Errors produced by `mt-network`.
///
/// Builder-input variants are reported eagerly; no partial network is ever
/// returned.  An unreachable routing sink is *not* an error — the router
/// returns an empty street sequence and callers skip.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("network must contain at least one intersection")]
    Empty,

    #[error("street {street} references missing node {node}")]
    MissingEndpoint { street: StreetId, node: NodeId },

    #[error("street {street} polyline needs at least two points")]
    ShortPolyline { street: StreetId },

    #[error("street {street} has non-positive length")]
    ZeroLength { street: StreetId },

    #[error("street {street} has no lanes")]
    NoLanes { street: StreetId },

    #[error("street {street} lane {lane} permits no directions")]
    EmptyLane { street: StreetId, lane: u8 },

    #[error("a single-node network admits no edges (requested {requested})")]
    LoneNodeEdges { requested: usize },

    #[error("{requested} edges cannot connect {nodes} nodes (minimum {min})")]
    TooFewEdges {
        nodes:     usize,
        requested: usize,
        min:       usize,
    },

    #[error("{requested} edges exceed capacity {max} for {nodes} nodes")]
    TooManyEdges {
        nodes:     usize,
        requested: usize,
        max:       usize,
    },

    #[error("grid must be at least 2x2 (got {rows}x{cols})")]
    GridTooSmall { rows: usize, cols: usize },

    #[error("no attachment point with spare degree while building spanning tree")]
    CapacityExhausted,

    #[error("placed only {placed} of {requested} extra edges without crossings")]
    PlanarityExhausted { placed: usize, requested: usize },

    #[error("import error: {0}")]
    Import(String),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
