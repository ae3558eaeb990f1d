//! Multimodal transit route finding.
//!
//! # Weighting
//!
//! The search weight of an edge is `travel_time + interval / 2` — the
//! half-headway term approximates the average wait under uniform
//! headways. Preference flags scale this linearly: bus edges by 1.5
//! when metro is preferred, interchange edges by 2 when transfers are
//! to be minimized. A linear scalarization of competing objectives, by
//! design; not an optimality claim over each objective separately.
//!
//! The search state is the pair (stop, boarded service) so that
//! changing services at a stop traverses that stop's interchange
//! self-edge and picks up its penalty.
//!
//! # Fares
//!
//! Flat 12 per bus boarding. Metro charges 8 on boarding plus +2 at
//! the 10th, +5 at the 17th, and +5 at the 24th consecutive metro
//! stop; the count survives metro-to-metro interchanges and resets
//! when the rider boards a bus.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use ordered_float::OrderedFloat;

use super::{MultimodalGraph, TransitEdge};
use crate::error::TransitError;
use crate::models::{Itinerary, Leg, TransitMode};

/// Flat fare charged on every bus boarding.
pub const BUS_BOARDING_FARE: f64 = 12.0;
/// Fare charged when entering the metro system.
pub const METRO_BASE_FARE: f64 = 8.0;
/// Fare increments at consecutive-metro-stop thresholds.
const METRO_FARE_STEPS: [(usize, f64); 3] = [(10, 2.0), (17, 5.0), (24, 5.0)];

/// Weight multiplier on bus edges when metro is preferred.
const BUS_DISPREFERENCE: f64 = 1.5;
/// Weight multiplier on interchange edges when transfers are minimized.
const TRANSFER_DISPREFERENCE: f64 = 2.0;

/// Rider preferences for route search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePreferences {
    /// Penalize bus segments so metro is chosen where competitive.
    pub prefer_metro: bool,
    /// Penalize interchanges so direct services are chosen where competitive.
    pub minimize_transfers: bool,
}

impl Default for RoutePreferences {
    fn default() -> Self {
        Self {
            prefer_metro: true,
            minimize_transfers: true,
        }
    }
}

type State = (String, Option<String>);

/// Finds the best multimodal route between two stops.
///
/// Fails with [`TransitError::LocationNotFound`] when an endpoint is
/// not a stop of the graph, and with [`TransitError::NoRouteAvailable`]
/// when the endpoints lie in different connected components — the
/// message names the isolated endpoint when one can be determined.
///
/// # Examples
///
/// ```
/// use urban_transit::models::{Location, TransitRecord};
/// use urban_transit::transit::{build_multimodal, find_route, RoutePreferences};
///
/// let locations = vec![
///     Location::neighborhood("A", "A", 0, 0.00, 0.0),
///     Location::neighborhood("B", "B", 0, 0.05, 0.0),
///     Location::neighborhood("C", "C", 0, 0.10, 0.0),
/// ];
/// let buses = vec![TransitRecord::from_stop_list("B1", "A,B,C", 5000.0)];
/// let (graph, _) = build_multimodal(&buses, &[], &locations, None);
///
/// let itinerary = find_route(&graph, "A", "C", &RoutePreferences::default()).unwrap();
/// assert_eq!(itinerary.legs().len(), 2);
/// assert_eq!(itinerary.transfer_count(), 0);
/// ```
pub fn find_route(
    graph: &MultimodalGraph,
    source: &str,
    dest: &str,
    preferences: &RoutePreferences,
) -> Result<Itinerary, TransitError> {
    for id in [source, dest] {
        if !graph.contains(id) {
            return Err(TransitError::LocationNotFound(id.to_string()));
        }
    }

    let component = graph.component(source);
    if !component.contains(dest) {
        let reason = if component.len() <= 1 {
            format!("stop {source} is not connected to any other stop")
        } else if graph.component(dest).len() <= 1 {
            format!("stop {dest} is not connected to any other stop")
        } else {
            "the stops are served by disconnected sub-networks".to_string()
        };
        return Err(TransitError::NoRouteAvailable {
            origin: source.to_string(),
            dest: dest.to_string(),
            reason,
        });
    }

    let steps = search(graph, source, dest, preferences).ok_or_else(|| {
        TransitError::NoRouteAvailable {
            origin: source.to_string(),
            dest: dest.to_string(),
            reason: "no usable service sequence was found".to_string(),
        }
    })?;

    Ok(build_itinerary(graph, &steps))
}

fn edge_weight(edge: &TransitEdge, preferences: &RoutePreferences) -> f64 {
    let mut weight = edge.travel_time_min + edge.interval_min / 2.0;
    if preferences.prefer_metro && edge.mode == TransitMode::Bus {
        weight *= BUS_DISPREFERENCE;
    }
    weight
}

fn interchange_weight(edge: &TransitEdge, preferences: &RoutePreferences) -> f64 {
    let weight = edge.travel_time_min + edge.interval_min / 2.0;
    if preferences.minimize_transfers {
        weight * TRANSFER_DISPREFERENCE
    } else {
        weight
    }
}

/// Runs the (stop, service)-state search and returns the chosen steps
/// as `(interchange edge, ridden edge)` index pairs.
fn search(
    graph: &MultimodalGraph,
    source: &str,
    dest: &str,
    preferences: &RoutePreferences,
) -> Option<Vec<(Option<usize>, usize)>> {
    let start: State = (source.to_string(), None);
    let mut dist: HashMap<State, f64> = HashMap::new();
    let mut prev: HashMap<State, (State, usize, Option<usize>)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(start.clone(), 0.0);
    heap.push(Reverse((OrderedFloat(0.0), start)));

    let mut goal: Option<State> = None;
    while let Some(Reverse((OrderedFloat(cost), state))) = heap.pop() {
        if state.0 == dest {
            goal = Some(state);
            break;
        }
        if cost > dist.get(&state).copied().unwrap_or(f64::INFINITY) {
            continue;
        }

        let (node, riding) = &state;
        for idx in graph.edge_ids_from(node) {
            let edge = &graph.edges()[idx];
            if edge.mode == TransitMode::Transfer {
                // Interchange edges enter the cost only when the boarded
                // service changes, below.
                continue;
            }

            let mut step = edge_weight(edge, preferences);
            let mut interchange = None;
            if let Some(riding_id) = riding {
                if *riding_id != edge.route_id {
                    if let Some(ti) = graph.transfer_edge_id(node) {
                        step += interchange_weight(&graph.edges()[ti], preferences);
                        interchange = Some(ti);
                    }
                }
            }

            let next: State = (edge.to.clone(), Some(edge.route_id.clone()));
            let candidate = cost + step;
            if candidate < dist.get(&next).copied().unwrap_or(f64::INFINITY) {
                dist.insert(next.clone(), candidate);
                prev.insert(next.clone(), (state.clone(), idx, interchange));
                heap.push(Reverse((OrderedFloat(candidate), next)));
            }
        }
    }

    let mut state = goal?;
    let mut steps = Vec::new();
    while let Some((prev_state, ride, interchange)) = prev.get(&state) {
        steps.push((*interchange, *ride));
        state = prev_state.clone();
    }
    steps.reverse();
    Some(steps)
}

fn build_itinerary(graph: &MultimodalGraph, steps: &[(Option<usize>, usize)]) -> Itinerary {
    let mut itinerary = Itinerary::new();
    let mut fare = 0.0;
    let mut metro_stops = 0usize;
    let mut riding: Option<&str> = None;

    for &(interchange_idx, ride_idx) in steps {
        if let Some(ti) = interchange_idx {
            let te = &graph.edges()[ti];
            itinerary.push_leg(Leg {
                mode: TransitMode::Transfer,
                from: te.from.clone(),
                to: te.to.clone(),
                from_name: graph.stop_name(&te.from).to_string(),
                to_name: graph.stop_name(&te.to).to_string(),
                line: None,
                travel_time: te.travel_time_min,
                wait_time: 0.0,
                distance: 0.0,
                at_transfer_point: graph.is_transfer_point(&te.from),
            });
        }

        let edge = &graph.edges()[ride_idx];
        let boarding = riding != Some(edge.route_id.as_str());
        let wait_time = if boarding { edge.interval_min / 2.0 } else { 0.0 };

        if boarding {
            match edge.mode {
                TransitMode::Bus => {
                    fare += BUS_BOARDING_FARE;
                    // Leaving the metro system resets the stop count.
                    metro_stops = 0;
                }
                TransitMode::Metro => {
                    if metro_stops == 0 {
                        fare += METRO_BASE_FARE;
                        metro_stops = 1;
                    }
                }
                TransitMode::Transfer => {}
            }
        }
        if edge.mode == TransitMode::Metro {
            metro_stops += 1;
            for (threshold, increment) in METRO_FARE_STEPS {
                if metro_stops == threshold {
                    fare += increment;
                }
            }
        }

        itinerary.push_leg(Leg {
            mode: edge.mode,
            from: edge.from.clone(),
            to: edge.to.clone(),
            from_name: graph.stop_name(&edge.from).to_string(),
            to_name: graph.stop_name(&edge.to).to_string(),
            line: Some(edge.route_id.clone()),
            travel_time: edge.travel_time_min,
            wait_time,
            distance: graph.segment_distance(&edge.from, &edge.to),
            at_transfer_point: graph.is_transfer_point(&edge.from),
        });
        riding = Some(edge.route_id.as_str());
    }

    itinerary.set_fare(fare);
    itinerary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, TransitRecord};
    use crate::transit::build_multimodal;
    use std::collections::HashMap;

    fn stops(layout: &[(&str, f64)]) -> Vec<Location> {
        layout.iter()
            .map(|(id, x)| Location::neighborhood(*id, format!("Stop {id}"), 0, *x, 0.0))
            .collect()
    }

    fn crossing_network() -> MultimodalGraph {
        let locations = stops(&[("A", 0.00), ("B", 0.05), ("C", 0.10), ("D", 0.15)]);
        let buses = vec![TransitRecord::from_stop_list("B1", "A,B,C", 5000.0)];
        let metros = vec![TransitRecord::from_stop_list("M1", "B,C,D", 10000.0)];
        build_multimodal(&buses, &metros, &locations, None).0
    }

    #[test]
    fn test_bus_then_metro_itinerary() {
        let graph = crossing_network();
        let it = find_route(&graph, "A", "D", &RoutePreferences::default()).expect("route");

        let modes: Vec<TransitMode> = it.legs().iter().map(|l| l.mode).collect();
        assert_eq!(
            modes,
            vec![
                TransitMode::Bus,
                TransitMode::Transfer,
                TransitMode::Metro,
                TransitMode::Metro,
            ]
        );
        assert_eq!(it.legs()[0].line.as_deref(), Some("B1"));
        assert_eq!(it.legs()[2].line.as_deref(), Some("M1"));
        assert!(it.legs()[1].line.is_none());

        // Bus 10 + interchange 10 + metro 5 + 5.
        assert!((it.total_travel_time() - 30.0).abs() < 1e-10);
        // Half-headways: bus 7.5 on first boarding, metro 5 at the change.
        assert!((it.total_wait_time() - 12.5).abs() < 1e-10);
        assert!((it.total_distance() - 15.0).abs() < 1e-10);
        assert_eq!(it.transfer_count(), 1);
        // One bus boarding plus the metro base fare.
        assert!((it.fare() - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_transfer_annotations() {
        let graph = crossing_network();
        let it = find_route(&graph, "A", "D", &RoutePreferences::default()).expect("route");

        // Origin A is bus-only; the interchange happens at B.
        assert!(!it.legs()[0].at_transfer_point);
        assert!(it.legs()[1].at_transfer_point);
        assert_eq!(it.legs()[1].from, it.legs()[1].to);
        assert!(it.legs()[2].at_transfer_point);
        assert_eq!(it.legs()[0].from_name, "Stop A");
        assert_eq!(it.legs()[3].to_name, "Stop D");
    }

    #[test]
    fn test_wait_charged_once_per_service() {
        let graph = crossing_network();
        let it = find_route(&graph, "A", "C", &RoutePreferences::default()).expect("route");
        // Staying on B1 the whole way: one boarding wait, then none.
        assert_eq!(it.legs().len(), 2);
        assert!((it.legs()[0].wait_time - 7.5).abs() < 1e-10);
        assert_eq!(it.legs()[1].wait_time, 0.0);
    }

    #[test]
    fn test_unknown_stop_errors() {
        let graph = crossing_network();
        let err = find_route(&graph, "A", "Z", &RoutePreferences::default()).unwrap_err();
        assert_eq!(err, TransitError::LocationNotFound("Z".to_string()));
    }

    #[test]
    fn test_disconnected_subnetworks_error() {
        let locations = stops(&[("A", 0.00), ("B", 0.05), ("X", 1.00), ("Y", 1.05)]);
        let buses = vec![
            TransitRecord::from_stop_list("B1", "A,B", 5000.0),
            TransitRecord::from_stop_list("B9", "X,Y", 1000.0),
        ];
        let (graph, _) = build_multimodal(&buses, &[], &locations, None);

        let err = find_route(&graph, "A", "X", &RoutePreferences::default()).unwrap_err();
        match err {
            TransitError::NoRouteAvailable { origin, dest, reason } => {
                assert_eq!(origin, "A");
                assert_eq!(dest, "X");
                assert!(reason.contains("disconnected"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_isolated_stop_named_in_error() {
        let mut graph = crossing_network();
        graph.add_stop(Location::neighborhood("L", "Lonely", 0, 0.5, 0.5));
        let err = find_route(&graph, "A", "L", &RoutePreferences::default()).unwrap_err();
        match err {
            TransitError::NoRouteAvailable { reason, .. } => {
                assert!(reason.contains("stop L"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_prefer_metro_flips_mode() {
        let locations = stops(&[("P", 0.00), ("Q", 0.01)]);
        let buses = vec![TransitRecord::from_stop_list("BP", "P,Q", 1000.0)];
        let metros = vec![TransitRecord::from_stop_list("MP", "P,Q", 1000.0)];
        let headways: HashMap<String, f64> =
            [("BP".to_string(), 15.0), ("MP".to_string(), 30.0)]
                .into_iter()
                .collect();
        let (graph, _) = build_multimodal(&buses, &metros, &locations, Some(&headways));

        // Raw weights: bus 5 + 7.5 = 12.5, metro 3 + 15 = 18.
        let indifferent = RoutePreferences {
            prefer_metro: false,
            minimize_transfers: false,
        };
        let it = find_route(&graph, "P", "Q", &indifferent).expect("route");
        assert_eq!(it.legs()[0].mode, TransitMode::Bus);

        let metro_fan = RoutePreferences {
            prefer_metro: true,
            minimize_transfers: false,
        };
        let it = find_route(&graph, "P", "Q", &metro_fan).expect("route");
        assert_eq!(it.legs()[0].mode, TransitMode::Metro);
    }

    #[test]
    fn test_minimize_transfers_flips_route() {
        // Bus B1 covers A-B-C slowly; metro M1 shortcuts A-B. The mixed
        // route wins only while the interchange is cheap.
        let locations = stops(&[("A", 0.00), ("B", 0.20), ("C", 0.25)]);
        let buses = vec![TransitRecord::from_stop_list("B1", "A,B,C", 5000.0)];
        let metros = vec![TransitRecord::from_stop_list("M1", "A,B", 10000.0)];
        let (graph, _) = build_multimodal(&buses, &metros, &locations, None);

        let hasty = RoutePreferences {
            prefer_metro: false,
            minimize_transfers: false,
        };
        let it = find_route(&graph, "A", "C", &hasty).expect("route");
        assert_eq!(it.transfer_count(), 1);
        assert_eq!(it.legs()[0].mode, TransitMode::Metro);

        let settled = RoutePreferences {
            prefer_metro: false,
            minimize_transfers: true,
        };
        let it = find_route(&graph, "A", "C", &settled).expect("route");
        assert_eq!(it.transfer_count(), 0);
        assert!(it.legs().iter().all(|l| l.mode == TransitMode::Bus));
    }

    #[test]
    fn test_metro_fare_steps() {
        // 26 metro stations in a row, 0.1 km apart.
        let stations: Vec<(String, f64)> = (0..26)
            .map(|i| (format!("S{i}"), i as f64 * 0.001))
            .collect();
        let locations: Vec<Location> = stations
            .iter()
            .map(|(id, x)| Location::neighborhood(id.as_str(), id.as_str(), 0, *x, 0.0))
            .collect();
        let stop_list = stations
            .iter()
            .map(|(id, _)| id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let metros = vec![TransitRecord::from_stop_list("M1", &stop_list, 10000.0)];
        let (graph, _) = build_multimodal(&[], &metros, &locations, None);

        let prefs = RoutePreferences::default();
        let short = find_route(&graph, "S0", "S8", &prefs).expect("9-stop ride");
        let long = find_route(&graph, "S0", "S24", &prefs).expect("25-stop ride");

        assert!((short.fare() - METRO_BASE_FARE).abs() < 1e-10);
        // Base plus the 10th, 17th, and 24th stop increments.
        assert!((long.fare() - 20.0).abs() < 1e-10);
        assert!(long.fare() > short.fare());
    }

    #[test]
    fn test_source_equals_dest() {
        let graph = crossing_network();
        let it = find_route(&graph, "B", "B", &RoutePreferences::default()).expect("route");
        assert!(it.is_empty());
        assert_eq!(it.fare(), 0.0);
    }
}
