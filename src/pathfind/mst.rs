//! Prim minimum spanning tree over the neighborhood road grid.
//!
//! Infrastructure-reduction view: which roads suffice to keep every
//! connected neighborhood reachable at minimum total length. Facilities
//! and their access roads are excluded from the tree. When the road
//! data leaves neighborhoods in several components, each component
//! yields its own tree (a spanning forest).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::network::{RoadEdge, RoadNetwork};

/// A minimum spanning tree (or forest) over the neighborhood subgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanningTree {
    /// Chosen edges as `(from, to)` id pairs.
    pub edges: Vec<(String, String)>,
    /// Road names of the chosen edges, in the same order.
    pub road_names: Vec<String>,
    /// Total length of the chosen edges in kilometers.
    pub total_distance: f64,
    /// Neighborhoods connected by at least one valid road.
    pub node_count: usize,
    /// Number of chosen edges.
    pub edge_count: usize,
}

/// Computes the Prim MST over neighborhoods only.
///
/// Returns `None` when no road connects two neighborhoods — the
/// structured "nothing to span" outcome, reported instead of an error.
///
/// # Examples
///
/// ```
/// use urban_transit::models::{Location, RoadRecord};
/// use urban_transit::network::{GraphOptions, RoadNetwork};
/// use urban_transit::pathfind::minimum_spanning_tree;
///
/// let nodes = vec![
///     Location::neighborhood("1", "A", 0, 0.00, 0.0),
///     Location::neighborhood("2", "B", 0, 0.01, 0.0),
///     Location::neighborhood("3", "C", 0, 0.02, 0.0),
/// ];
/// let roads = vec![
///     RoadRecord::new("1", "2", "R12", 5.0, 3000.0, 8),
///     RoadRecord::new("2", "3", "R23", 3.0, 3000.0, 8),
///     RoadRecord::new("1", "3", "R13", 4.0, 3000.0, 8),
/// ];
/// let net = RoadNetwork::build(&nodes, &[], &roads, &GraphOptions::default());
///
/// let tree = minimum_spanning_tree(&net).unwrap();
/// assert_eq!(tree.edge_count, 2);
/// assert_eq!(tree.total_distance, 7.0);
/// ```
pub fn minimum_spanning_tree(network: &RoadNetwork) -> Option<SpanningTree> {
    let valid = |edge: &RoadEdge| {
        network
            .location(edge.from())
            .zip(network.location(edge.to()))
            .is_some_and(|(a, b)| a.is_neighborhood() && b.is_neighborhood())
    };

    let mut nodes: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();
    for edge in network.edges().iter().filter(|&e| valid(e)) {
        for id in [edge.from(), edge.to()] {
            if seen.insert(id) {
                nodes.push(id);
            }
        }
    }
    if nodes.is_empty() {
        return None;
    }
    nodes.sort_unstable();

    let mut visited: HashSet<&str> = HashSet::new();
    let mut edges = Vec::new();
    let mut road_names = Vec::new();
    let mut total_distance = 0.0;

    // Lazy Prim, restarted per component.
    for &start in &nodes {
        if visited.contains(start) {
            continue;
        }
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, &str, &str, &str)>> =
            BinaryHeap::new();
        visited.insert(start);
        push_frontier(network, start, &valid, &mut heap);

        while let Some(Reverse((OrderedFloat(dist), node, parent, name))) = heap.pop() {
            if !visited.insert(node) {
                continue;
            }
            edges.push((parent.to_string(), node.to_string()));
            road_names.push(name.to_string());
            total_distance += dist;
            push_frontier(network, node, &valid, &mut heap);
        }
    }

    Some(SpanningTree {
        node_count: nodes.len(),
        edge_count: edges.len(),
        edges,
        road_names,
        total_distance,
    })
}

fn push_frontier<'a>(
    network: &'a RoadNetwork,
    node: &'a str,
    valid: &impl Fn(&RoadEdge) -> bool,
    heap: &mut BinaryHeap<Reverse<(OrderedFloat<f64>, &'a str, &'a str, &'a str)>>,
) {
    for edge in network.neighbors(node).filter(|&e| valid(e)) {
        let next = edge.other_end(node);
        heap.push(Reverse((
            OrderedFloat(edge.distance()),
            next,
            node,
            edge.name(),
        )));
    }
}
