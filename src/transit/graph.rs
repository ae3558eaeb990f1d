//! The multimodal transit graph.
//!
//! A true multigraph: edges live in one list keyed by
//! `(from, to, mode, route)` with per-node incidence indices, so a bus
//! route and a metro line linking the same pair of stops coexist as
//! distinct edges instead of collapsing into one. Directed edge pairs
//! are stored explicitly (one per direction). Interchange nodes carry a
//! synthetic self-edge of mode [`TransitMode::Transfer`] used to price
//! route changes uniformly.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::models::{Location, TransitMode};

/// Scale factor from coordinate distance to kilometers for this dataset.
pub const COORD_SCALE_KM: f64 = 100.0;

/// A typed edge of the multimodal graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitEdge {
    /// Origin stop id.
    pub from: String,
    /// Destination stop id (equals `from` on transfer edges).
    pub to: String,
    /// Travel mode of this edge.
    pub mode: TransitMode,
    /// Owning route or line id; `"interchange"` on transfer edges.
    pub route_id: String,
    /// Headway in minutes between departures on the owning service.
    pub interval_min: f64,
    /// Travel (or interchange) time in minutes.
    pub travel_time_min: f64,
    /// Transfer points reachable on the owning service.
    pub transfer_points: BTreeSet<String>,
}

/// The integrated bus/metro/transfer graph over stop ids.
///
/// Built by [`build_multimodal`](super::build_multimodal); can also be
/// assembled by hand for tests or custom networks.
#[derive(Debug, Clone, Default)]
pub struct MultimodalGraph {
    stops: HashMap<String, Location>,
    edges: Vec<TransitEdge>,
    outgoing: HashMap<String, Vec<usize>>,
}

impl MultimodalGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stop's location data. Later inserts win.
    pub fn add_stop(&mut self, location: Location) {
        self.stops.insert(location.id().to_string(), location);
    }

    /// Appends an edge. Both endpoints should be registered stops.
    pub fn add_edge(&mut self, edge: TransitEdge) {
        let idx = self.edges.len();
        self.outgoing
            .entry(edge.from.clone())
            .or_default()
            .push(idx);
        self.edges.push(edge);
    }

    /// Returns `true` if the id is a stop of this graph.
    pub fn contains(&self, id: &str) -> bool {
        self.stops.contains_key(id)
    }

    /// Looks up a stop's location data.
    pub fn stop(&self, id: &str) -> Option<&Location> {
        self.stops.get(id)
    }

    /// Display name of a stop, falling back to the raw id.
    pub fn stop_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.stops.get(id).map_or(id, Location::name)
    }

    /// Iterates over all stop ids.
    pub fn stop_ids(&self) -> impl Iterator<Item = &str> {
        self.stops.keys().map(String::as_str)
    }

    /// All edges, including transfer self-edges.
    pub fn edges(&self) -> &[TransitEdge] {
        &self.edges
    }

    /// Edges leaving the given stop.
    pub fn edges_from<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a TransitEdge> + 'a {
        self.edge_ids_from(id).map(move |i| &self.edges[i])
    }

    pub(crate) fn edge_ids_from<'a>(&'a self, id: &str) -> impl Iterator<Item = usize> + 'a {
        self.outgoing.get(id).into_iter().flatten().copied()
    }

    /// Number of stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Number of edges, transfer self-edges included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Distinct `(mode, route)` services calling at a stop, transfer
    /// edges excluded.
    pub fn services_at(&self, id: &str) -> BTreeSet<(TransitMode, &str)> {
        self.edges_from(id)
            .filter(|e| e.mode != TransitMode::Transfer)
            .map(|e| (e.mode, e.route_id.as_str()))
            .collect()
    }

    /// The interchange self-edge at a stop, if one exists.
    pub fn transfer_edge(&self, id: &str) -> Option<&TransitEdge> {
        self.transfer_edge_id(id).map(|i| &self.edges[i])
    }

    pub(crate) fn transfer_edge_id(&self, id: &str) -> Option<usize> {
        self.edge_ids_from(id)
            .find(|&i| self.edges[i].mode == TransitMode::Transfer)
    }

    /// Returns `true` when the stop is served by both bus and metro.
    pub fn is_transfer_point(&self, id: &str) -> bool {
        let services = self.services_at(id);
        services.iter().any(|(m, _)| *m == TransitMode::Bus)
            && services.iter().any(|(m, _)| *m == TransitMode::Metro)
    }

    /// Geographic length of a stop-to-stop segment in kilometers.
    ///
    /// Zero when either stop has no registered location.
    pub fn segment_distance(&self, a: &str, b: &str) -> f64 {
        match (self.stops.get(a), self.stops.get(b)) {
            (Some(a), Some(b)) => a.distance_to(b) * COORD_SCALE_KM,
            _ => 0.0,
        }
    }

    /// The set of stops reachable from `id`, itself included.
    pub fn component(&self, id: &str) -> HashSet<&str> {
        let mut seen = HashSet::new();
        let Some((start, _)) = self.stops.get_key_value(id) else {
            return seen;
        };
        let mut queue = VecDeque::new();
        seen.insert(start.as_str());
        queue.push_back(start.as_str());
        while let Some(node) = queue.pop_front() {
            for edge in self.edges_from(node) {
                if seen.insert(edge.to.as_str()) {
                    queue.push_back(edge.to.as_str());
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str, x: f64) -> Location {
        Location::neighborhood(id, format!("Stop {id}"), 0, x, 0.0)
    }

    fn edge(from: &str, to: &str, mode: TransitMode, route: &str) -> TransitEdge {
        TransitEdge {
            from: from.into(),
            to: to.into(),
            mode,
            route_id: route.into(),
            interval_min: 10.0,
            travel_time_min: 5.0,
            transfer_points: BTreeSet::new(),
        }
    }

    fn two_mode_graph() -> MultimodalGraph {
        let mut g = MultimodalGraph::new();
        for (id, x) in [("A", 0.0), ("B", 0.05), ("C", 0.10)] {
            g.add_stop(stop(id, x));
        }
        g.add_edge(edge("A", "B", TransitMode::Bus, "B1"));
        g.add_edge(edge("B", "A", TransitMode::Bus, "B1"));
        g.add_edge(edge("A", "B", TransitMode::Metro, "M1"));
        g.add_edge(edge("B", "A", TransitMode::Metro, "M1"));
        g.add_edge(edge("B", "C", TransitMode::Metro, "M1"));
        g.add_edge(edge("C", "B", TransitMode::Metro, "M1"));
        g
    }

    #[test]
    fn test_parallel_modal_edges_do_not_collapse() {
        let g = two_mode_graph();
        let ab: Vec<_> = g.edges_from("A").filter(|e| e.to == "B").collect();
        assert_eq!(ab.len(), 2);
        assert!(ab.iter().any(|e| e.mode == TransitMode::Bus));
        assert!(ab.iter().any(|e| e.mode == TransitMode::Metro));
    }

    #[test]
    fn test_services_at() {
        let g = two_mode_graph();
        let services = g.services_at("B");
        assert_eq!(services.len(), 2);
        assert!(services.contains(&(TransitMode::Bus, "B1")));
        assert!(services.contains(&(TransitMode::Metro, "M1")));
        assert_eq!(g.services_at("C").len(), 1);
    }

    #[test]
    fn test_transfer_point_needs_both_modes() {
        let g = two_mode_graph();
        assert!(g.is_transfer_point("A"));
        assert!(g.is_transfer_point("B"));
        assert!(!g.is_transfer_point("C"));
    }

    #[test]
    fn test_transfer_edge_lookup() {
        let mut g = two_mode_graph();
        assert!(g.transfer_edge("B").is_none());
        let mut te = edge("B", "B", TransitMode::Transfer, "interchange");
        te.interval_min = 5.0;
        te.travel_time_min = 10.0;
        g.add_edge(te);
        let found = g.transfer_edge("B").expect("transfer edge");
        assert_eq!(found.travel_time_min, 10.0);
    }

    #[test]
    fn test_segment_distance_scales_coordinates() {
        let g = two_mode_graph();
        assert!((g.segment_distance("A", "B") - 5.0).abs() < 1e-10);
        assert_eq!(g.segment_distance("A", "Z"), 0.0);
    }

    #[test]
    fn test_component() {
        let mut g = two_mode_graph();
        g.add_stop(stop("X", 1.0));
        g.add_stop(stop("Y", 1.05));
        g.add_edge(edge("X", "Y", TransitMode::Bus, "B9"));
        g.add_edge(edge("Y", "X", TransitMode::Bus, "B9"));

        let comp = g.component("A");
        assert_eq!(comp.len(), 3);
        assert!(comp.contains("C"));
        assert!(!comp.contains("X"));
        assert!(g.component("unknown").is_empty());
    }

    #[test]
    fn test_stop_name_falls_back_to_id() {
        let g = two_mode_graph();
        assert_eq!(g.stop_name("A"), "Stop A");
        assert_eq!(g.stop_name("Z"), "Z");
    }
}
