//! Multimodal graph construction from transit service records.

use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use tracing::{debug, warn};

use super::{MultimodalGraph, TransitEdge};
use crate::models::{Location, TransitMode, TransitRecord};

/// Default bus headway when no allocation-derived figure is supplied.
pub const BUS_DEFAULT_HEADWAY_MIN: f64 = 15.0;
/// Default metro headway when no allocation-derived figure is supplied.
pub const METRO_DEFAULT_HEADWAY_MIN: f64 = 10.0;
/// Average bus speed used to derive segment times, km/h.
pub const BUS_SPEED_KMH: f64 = 30.0;
/// Average metro speed used to derive segment times, km/h.
pub const METRO_SPEED_KMH: f64 = 60.0;
/// Floor on a bus segment: dwell plus acceleration, minutes.
pub const BUS_MIN_SEGMENT_MIN: f64 = 5.0;
/// Floor on a metro segment: dwell plus acceleration, minutes.
pub const METRO_MIN_SEGMENT_MIN: f64 = 3.0;
/// Headway of the synthetic interchange edge, minutes.
pub const TRANSFER_HEADWAY_MIN: f64 = 5.0;
/// Walking time of the synthetic interchange edge, minutes.
pub const TRANSFER_TIME_MIN: f64 = 10.0;

/// Filters service records down to stops with known locations,
/// discarding services left with fewer than two stops.
///
/// Bad stop ids and too-short services are data-quality issues: they
/// are logged and skipped, never fatal.
pub fn validate_services(
    records: &[TransitRecord],
    locations: &HashMap<String, Location>,
) -> Vec<TransitRecord> {
    let mut valid = Vec::with_capacity(records.len());
    for record in records {
        let stops: Vec<String> = record
            .stops
            .iter()
            .filter(|s| {
                let known = locations.contains_key(*s);
                if !known {
                    debug!(service = %record.id, stop = %s, "dropping unknown stop");
                }
                known
            })
            .cloned()
            .collect();
        if stops.len() < 2 {
            warn!(
                service = %record.id,
                valid_stops = stops.len(),
                "discarding service with fewer than two valid stops"
            );
            continue;
        }
        valid.push(TransitRecord::new(
            record.id.clone(),
            stops,
            record.daily_passengers,
        ));
    }
    valid
}

/// Builds the integrated bus/metro/transfer graph.
///
/// Stop sequences are filtered to known locations and services with
/// fewer than two surviving stops are discarded. Each consecutive stop
/// pair becomes a directed edge pair whose travel time is derived from
/// geographic distance and the mode's average speed, floored at the
/// mode's minimum segment time. `headways` overrides the per-service
/// interval (route id → minutes); absent services fall back to the
/// per-mode default.
///
/// Returns the graph together with the transfer points: the stops
/// served by at least one bus route and one metro line. Every stop
/// where two distinct services call additionally receives a synthetic
/// interchange self-edge (headway 5, walking time 10).
///
/// # Examples
///
/// ```
/// use urban_transit::models::{Location, TransitRecord};
/// use urban_transit::transit::build_multimodal;
///
/// let locations = vec![
///     Location::neighborhood("A", "A", 0, 0.00, 0.0),
///     Location::neighborhood("B", "B", 0, 0.05, 0.0),
///     Location::neighborhood("C", "C", 0, 0.10, 0.0),
///     Location::neighborhood("D", "D", 0, 0.15, 0.0),
/// ];
/// let buses = vec![TransitRecord::from_stop_list("B1", "A,B,C", 5000.0)];
/// let metros = vec![TransitRecord::from_stop_list("M1", "B,C,D", 10000.0)];
///
/// let (graph, transfers) = build_multimodal(&buses, &metros, &locations, None);
/// assert_eq!(transfers.into_iter().collect::<Vec<_>>(), vec!["B", "C"]);
/// assert!(graph.transfer_edge("B").is_some());
/// ```
pub fn build_multimodal(
    bus_routes: &[TransitRecord],
    metro_lines: &[TransitRecord],
    locations: &[Location],
    headways: Option<&HashMap<String, f64>>,
) -> (MultimodalGraph, BTreeSet<String>) {
    let by_id: HashMap<String, Location> = locations
        .iter()
        .map(|l| (l.id().to_string(), l.clone()))
        .collect();

    let buses = validate_services(bus_routes, &by_id);
    let metros = validate_services(metro_lines, &by_id);

    let bus_stops: BTreeSet<&str> = buses
        .iter()
        .flat_map(|r| r.stops.iter().map(String::as_str))
        .collect();
    let metro_stops: BTreeSet<&str> = metros
        .iter()
        .flat_map(|r| r.stops.iter().map(String::as_str))
        .collect();
    let transfer_points: BTreeSet<String> = bus_stops
        .intersection(&metro_stops)
        .map(|s| s.to_string())
        .collect();

    let mut graph = MultimodalGraph::new();
    for record in &buses {
        add_service(
            &mut graph,
            record,
            TransitMode::Bus,
            headway_for(headways, &record.id, BUS_DEFAULT_HEADWAY_MIN),
            &by_id,
            &transfer_points,
        );
    }
    for record in &metros {
        add_service(
            &mut graph,
            record,
            TransitMode::Metro,
            headway_for(headways, &record.id, METRO_DEFAULT_HEADWAY_MIN),
            &by_id,
            &transfer_points,
        );
    }

    let interchange_nodes: Vec<String> = graph
        .stop_ids()
        .filter(|id| graph.services_at(id).len() >= 2)
        .map(String::from)
        .collect();
    for node in interchange_nodes {
        let mut own = BTreeSet::new();
        if transfer_points.contains(&node) {
            own.insert(node.clone());
        }
        graph.add_edge(TransitEdge {
            from: node.clone(),
            to: node,
            mode: TransitMode::Transfer,
            route_id: "interchange".to_string(),
            interval_min: TRANSFER_HEADWAY_MIN,
            travel_time_min: TRANSFER_TIME_MIN,
            transfer_points: own,
        });
    }

    (graph, transfer_points)
}

fn headway_for(headways: Option<&HashMap<String, f64>>, id: &str, default: f64) -> f64 {
    headways
        .and_then(|h| h.get(id))
        .copied()
        .unwrap_or(default)
}

fn add_service(
    graph: &mut MultimodalGraph,
    record: &TransitRecord,
    mode: TransitMode,
    interval_min: f64,
    locations: &HashMap<String, Location>,
    transfer_points: &BTreeSet<String>,
) {
    let (speed, floor) = match mode {
        TransitMode::Bus => (BUS_SPEED_KMH, BUS_MIN_SEGMENT_MIN),
        TransitMode::Metro => (METRO_SPEED_KMH, METRO_MIN_SEGMENT_MIN),
        TransitMode::Transfer => unreachable!("services are bus or metro"),
    };
    let own_transfers: BTreeSet<String> = record
        .stops
        .iter()
        .filter(|s| transfer_points.contains(*s))
        .cloned()
        .collect();

    for stop in &record.stops {
        if let Some(location) = locations.get(stop) {
            graph.add_stop(location.clone());
        }
    }

    for (a, b) in record.stops.iter().tuple_windows() {
        let distance = graph.segment_distance(a, b);
        let travel_time_min = (distance / speed * 60.0).max(floor);
        for (from, to) in [(a, b), (b, a)] {
            graph.add_edge(TransitEdge {
                from: from.clone(),
                to: to.clone(),
                mode,
                route_id: record.id.clone(),
                interval_min,
                travel_time_min,
                transfer_points: own_transfers.clone(),
            });
        }
    }
}
