//! Dijkstra shortest paths over the road network.
//!
//! Two weightings are provided: raw distance (optionally blended with
//! road condition) and time-of-day travel time (optionally avoiding
//! congested segments). Both share one relaxation loop over a binary
//! heap keyed by [`OrderedFloat`] cost; ties break by insertion order,
//! no secondary key is needed.
//!
//! A disconnected or unknown source/destination is a valid "no route"
//! outcome returned as `None`, never an error.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::network::{congestion_penalty, travel_time_minutes, RoadEdge, RoadNetwork, TimeOfDay};

/// A found path and its total cost under the weight function used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Node ids in travel order, source first.
    pub path: Vec<String>,
    /// Sum of edge weights along the path.
    pub cost: f64,
}

/// Options for distance-weighted search.
#[derive(Debug, Clone, Copy)]
pub struct DijkstraOptions {
    /// Blend road condition into the weight.
    pub consider_condition: bool,
    /// Strength of the condition blend:
    /// `weight = distance * (1 + (11 - condition) * condition_weight)`.
    pub condition_weight: f64,
}

impl Default for DijkstraOptions {
    fn default() -> Self {
        Self {
            consider_condition: false,
            condition_weight: 0.3,
        }
    }
}

/// Options for time-weighted search.
#[derive(Debug, Clone, Copy, Default)]
pub struct TravelTimeOptions {
    /// Penalize congested segments by `(1 + congestion)`.
    pub avoid_congestion: bool,
}

/// Shortest path by distance, optionally penalizing poor road condition.
///
/// Returns `None` when either endpoint is missing from the graph or no
/// path exists.
///
/// # Examples
///
/// ```
/// use urban_transit::models::{Location, RoadRecord};
/// use urban_transit::network::{GraphOptions, RoadNetwork};
/// use urban_transit::pathfind::{shortest_path, DijkstraOptions};
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
/// let found = shortest_path(&net, "1", "3", &DijkstraOptions::default()).unwrap();
/// assert_eq!(found.path, vec!["1", "3"]);
/// assert_eq!(found.cost, 4.0);
/// ```
pub fn shortest_path(
    network: &RoadNetwork,
    source: &str,
    dest: &str,
    options: &DijkstraOptions,
) -> Option<PathResult> {
    let consider = options.consider_condition;
    let cw = options.condition_weight;
    run_dijkstra(network, source, dest, |edge| {
        let mut weight = edge.distance();
        if consider {
            weight *= 1.0 + f64::from(11 - edge.condition()) * cw;
        }
        weight
    })
}

/// Fastest path at a time of day, optionally avoiding congestion.
pub fn fastest_path(
    network: &RoadNetwork,
    source: &str,
    dest: &str,
    time_of_day: TimeOfDay,
    options: &TravelTimeOptions,
) -> Option<PathResult> {
    let avoid = options.avoid_congestion;
    run_dijkstra(network, source, dest, |edge| {
        let mut minutes = travel_time_minutes(edge, time_of_day);
        if avoid {
            minutes *= congestion_penalty(edge);
        }
        minutes
    })
}

fn run_dijkstra(
    network: &RoadNetwork,
    source: &str,
    dest: &str,
    weight: impl Fn(&RoadEdge) -> f64,
) -> Option<PathResult> {
    if !network.contains(source) || !network.contains(dest) {
        return None;
    }
    if source == dest {
        return Some(PathResult {
            path: vec![source.to_string()],
            cost: 0.0,
        });
    }

    let mut dist: HashMap<String, f64> = HashMap::new();
    let mut prev: HashMap<String, String> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(source.to_string(), 0.0);
    heap.push(Reverse((OrderedFloat(0.0), source.to_string())));

    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        if node == dest {
            return Some(PathResult {
                path: reconstruct(&prev, source, dest),
                cost,
            });
        }
        if cost > dist.get(&node).copied().unwrap_or(f64::INFINITY) {
            continue;
        }

        for edge in network.neighbors(&node) {
            let next = edge.other_end(&node);
            let candidate = cost + weight(edge);
            if candidate < dist.get(next).copied().unwrap_or(f64::INFINITY) {
                dist.insert(next.to_string(), candidate);
                prev.insert(next.to_string(), node.clone());
                heap.push(Reverse((OrderedFloat(candidate), next.to_string())));
            }
        }
    }

    None
}

fn reconstruct(prev: &HashMap<String, String>, source: &str, dest: &str) -> Vec<String> {
    let mut path = vec![dest.to_string()];
    let mut current = dest;
    while current != source {
        let p = &prev[current];
        path.push(p.clone());
        current = p;
    }
    path.reverse();
    path
}
