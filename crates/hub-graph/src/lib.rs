//! Hub adjacency graph and shortest-path engine.
//!
//! No I/O happens here: the graph is assembled by the caller, either from
//! stored route records or from cached per-hub edge lists, and searched in
//! memory.

pub mod graph;
pub mod path;

pub use graph::{Adjacency, AdjacencyBuilder};
pub use path::{shortest_path, Dijkstra, PathEngine, PathNotFound, PathResult};
