//! A* nearest-facility search.
//!
//! Emergency routing: given a source and a facility category (say,
//! "Medical"), run A* against every facility of that category and keep
//! the cheapest result. The heuristic is the Euclidean coordinate
//! distance scaled by 50 — half the dataset's coordinate-to-kilometer
//! factor — so it never exceeds the true remaining road distance and
//! the search stays admissible.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::PathResult;
use crate::network::RoadNetwork;

/// Heuristic scale over coordinate distance. Kept at half the ×100
/// coordinate-to-km factor so the estimate stays a lower bound.
const HEURISTIC_SCALE: f64 = 50.0;

/// Best route to a facility of the requested category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRoute {
    /// Node ids in travel order, source first.
    pub path: Vec<String>,
    /// Total road distance in kilometers.
    pub cost: f64,
    /// Id of the facility reached.
    pub facility_id: String,
    /// Display name of the facility reached.
    pub facility_name: String,
}

/// Finds the nearest reachable facility of a category (case-insensitive).
///
/// Returns `None` when the source is unknown, no facility of the
/// category exists, or none is reachable by road.
pub fn nearest_facility(
    network: &RoadNetwork,
    source: &str,
    category: &str,
) -> Option<FacilityRoute> {
    if !network.contains(source) {
        return None;
    }

    let mut candidates: Vec<_> = network
        .locations()
        .filter(|loc| {
            loc.facility_category()
                .is_some_and(|c| c.eq_ignore_ascii_case(category))
        })
        .collect();
    candidates.sort_by(|a, b| a.id().cmp(b.id()));

    let mut best: Option<FacilityRoute> = None;
    for facility in candidates {
        if let Some(found) = a_star(network, source, facility.id()) {
            let better = best.as_ref().map_or(true, |b| found.cost < b.cost);
            if better {
                best = Some(FacilityRoute {
                    path: found.path,
                    cost: found.cost,
                    facility_id: facility.id().to_string(),
                    facility_name: facility.name().to_string(),
                });
            }
        }
    }
    best
}

fn heuristic(network: &RoadNetwork, node: &str, goal: &str) -> f64 {
    match (network.position(node), network.position(goal)) {
        (Some((x1, y1)), Some((x2, y2))) => {
            let dx = x1 - x2;
            let dy = y1 - y2;
            (dx * dx + dy * dy).sqrt() * HEURISTIC_SCALE
        }
        _ => 0.0,
    }
}

fn a_star(network: &RoadNetwork, source: &str, goal: &str) -> Option<PathResult> {
    let mut g_score: HashMap<String, f64> = HashMap::new();
    let mut came_from: HashMap<String, String> = HashMap::new();
    let mut open = BinaryHeap::new();

    g_score.insert(source.to_string(), 0.0);
    open.push(Reverse((
        OrderedFloat(heuristic(network, source, goal)),
        source.to_string(),
    )));

    while let Some(Reverse((_, node))) = open.pop() {
        if node == goal {
            let mut path = vec![goal.to_string()];
            let mut current = goal;
            while current != source {
                let p = &came_from[current];
                path.push(p.clone());
                current = p;
            }
            path.reverse();
            return Some(PathResult {
                path,
                cost: g_score[goal],
            });
        }

        let g_node = g_score[&node];
        for edge in network.neighbors(&node) {
            let next = edge.other_end(&node);
            let tentative = g_node + edge.distance();
            if tentative < g_score.get(next).copied().unwrap_or(f64::INFINITY) {
                g_score.insert(next.to_string(), tentative);
                came_from.insert(next.to_string(), node.clone());
                let f = tentative + heuristic(network, next, goal);
                open.push(Reverse((OrderedFloat(f), next.to_string())));
            }
        }
    }

    None
}
