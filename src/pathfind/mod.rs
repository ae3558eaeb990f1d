//! Path finding over the road network.
//!
//! - [`shortest_path`] / [`fastest_path`] — Dijkstra by distance or
//!   time-of-day travel time, O((V + E) log V)
//! - [`nearest_facility`] — A* emergency search over a facility category
//! - [`minimum_spanning_tree`] — lazy Prim over the neighborhood grid

mod astar;
mod dijkstra;
mod mst;

pub use astar::{nearest_facility, FacilityRoute};
pub use dijkstra::{fastest_path, shortest_path, DijkstraOptions, PathResult, TravelTimeOptions};
pub use mst::{minimum_spanning_tree, SpanningTree};
