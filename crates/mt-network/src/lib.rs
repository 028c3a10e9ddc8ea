//! `mt-network` — road network graph, generators, and routing for the
//! `microtraffic` simulator.
//!
//! # Contents
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`street`]   | `Street`, `Lane`, `TurnDirection`, turn classification    |
//! | [`network`]  | `Network` arena + CSR adjacency, `NetworkBuilder`         |
//! | [`synth`]    | Random planar and toroidal grid generators                |
//! | [`import`]   | `ImportedGraph` contract and `GraphSource` trait          |
//! | [`router`]   | Dijkstra shortest street-sequence                         |
//! | [`geometry`] | Headings, segment intersection, arc-length interpolation  |
//!
//! The network is built once (generator, importer, or [`NetworkBuilder`] by
//! hand) and is immutable afterwards.  Everything downstream — signals,
//! vehicles, the simulator — holds typed ids into its arenas.

pub mod error;
pub mod geometry;
pub mod import;
pub mod network;
pub mod router;
pub mod street;
pub mod synth;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{NetworkError, NetworkResult};
pub use import::{GraphSource, ImportedEdge, ImportedGraph, network_from_imported};
pub use network::{Intersection, Network, NetworkBuilder};
pub use router::shortest_route;
pub use street::{Lane, LaneRule, Street, TurnDirection, classify_turn};
pub use synth::{grid_network, planar_network, planar_network_strict};
