//! End-to-end network optimization.
//!
//! The full pipeline the presentation layer calls for the "optimize
//! schedules" view: build the multimodal graph, rank the transfer
//! points, allocate the bus and train pools separately, and generate
//! timetables plus summary metrics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{allocate, route_values, Allocation, AllocationLimits};
use crate::error::TransitError;
use crate::models::{DemandMatrix, Location, TransitMode, TransitRecord};
use crate::transit::{
    build_multimodal, score_transfer_points, service_schedules, validate_services,
    ServiceSchedule, TransferScore,
};

/// Summary figures of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationMetrics {
    /// Buses assigned across all routes.
    pub total_buses_allocated: usize,
    /// Trains assigned across all lines.
    pub total_trains_allocated: usize,
    /// Stops served by both modes.
    pub transfer_point_count: usize,
    /// Seats offered per day over every generated timetable.
    pub total_daily_capacity: u64,
}

/// Result of [`optimize_network`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkOptimization {
    /// Transfer points ranked by score.
    pub transfer_scores: Vec<TransferScore>,
    /// Buses per route.
    pub bus_allocation: Allocation,
    /// Trains per line.
    pub metro_allocation: Allocation,
    /// Generated timetables, buses first.
    pub schedules: Vec<ServiceSchedule>,
    /// Summary figures.
    pub metrics: OptimizationMetrics,
}

impl NetworkOptimization {
    /// Headways resulting from this optimization, per service id.
    ///
    /// Feed into
    /// [`build_multimodal`](crate::transit::build_multimodal) to route
    /// passengers over the optimized network instead of the default
    /// headways.
    pub fn headways(&self) -> HashMap<String, f64> {
        self.schedules
            .iter()
            .map(|s| (s.route_id.clone(), s.interval_min))
            .collect()
    }
}

/// Runs the full allocation pipeline over the transit tables.
///
/// Services whose stop sequences do not survive validation are skipped
/// and receive no units. The bus and train pools are optimized
/// independently under their own limits.
///
/// # Errors
///
/// [`TransitError::EmptyTable`] when both service tables are empty, and
/// the errors of [`allocate`] when a pool cannot satisfy its bounds.
pub fn optimize_network(
    bus_routes: &[TransitRecord],
    metro_lines: &[TransitRecord],
    locations: &[Location],
    demand: &DemandMatrix,
    bus_limits: &AllocationLimits,
    metro_limits: &AllocationLimits,
) -> Result<NetworkOptimization, TransitError> {
    if bus_routes.is_empty() && metro_lines.is_empty() {
        return Err(TransitError::EmptyTable("transit services"));
    }

    let by_id: HashMap<String, Location> = locations
        .iter()
        .map(|l| (l.id().to_string(), l.clone()))
        .collect();
    let buses = validate_services(bus_routes, &by_id);
    let metros = validate_services(metro_lines, &by_id);

    let (graph, transfer_points) = build_multimodal(bus_routes, metro_lines, locations, None);
    let transfer_scores = score_transfer_points(&graph, demand);

    let bus_allocation = if buses.is_empty() {
        Allocation::new()
    } else {
        allocate(&route_values(&buses, demand, &transfer_points), bus_limits)?
    };
    let metro_allocation = if metros.is_empty() {
        Allocation::new()
    } else {
        allocate(
            &route_values(&metros, demand, &transfer_points),
            metro_limits,
        )?
    };

    let mut schedules =
        service_schedules(&buses, &bus_allocation, TransitMode::Bus, &transfer_points);
    schedules.extend(service_schedules(
        &metros,
        &metro_allocation,
        TransitMode::Metro,
        &transfer_points,
    ));

    let metrics = OptimizationMetrics {
        total_buses_allocated: bus_allocation.values().sum(),
        total_trains_allocated: metro_allocation.values().sum(),
        transfer_point_count: transfer_points.len(),
        total_daily_capacity: schedules.iter().map(|s| s.daily_capacity).sum(),
    };

    Ok(NetworkOptimization {
        transfer_scores,
        bus_allocation,
        metro_allocation,
        schedules,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_locations() -> Vec<Location> {
        vec![
            Location::neighborhood("1", "Downtown", 250_000, 0.00, 0.0),
            Location::neighborhood("2", "Maadi", 85_000, 0.05, 0.0),
            Location::neighborhood("3", "Zamalek", 40_000, 0.10, 0.0),
            Location::facility("F1", "Central Hospital", "Medical", 0.15, 0.0),
        ]
    }

    fn sample_demand() -> DemandMatrix {
        let mut demand = DemandMatrix::new();
        demand.insert("1", "2", 1000.0);
        demand.insert("2", "3", 800.0);
        demand.insert("1", "3", 600.0);
        demand.insert("2", "F1", 400.0);
        demand
    }

    fn limits(max_units: usize, max_per_route: usize) -> AllocationLimits {
        AllocationLimits {
            max_units,
            min_units: 1,
            max_per_route,
        }
    }

    #[test]
    fn test_full_pipeline() {
        let buses = vec![
            TransitRecord::from_stop_list("B1", "1,2,3", 5000.0),
            TransitRecord::from_stop_list("B2", "2,3,F1", 4000.0),
        ];
        let metros = vec![TransitRecord::from_stop_list("M1", "1,2,3", 10000.0)];

        let result = optimize_network(
            &buses,
            &metros,
            &sample_locations(),
            &sample_demand(),
            &limits(10, 5),
            &limits(4, 4),
        )
        .expect("feasible");

        // Every surviving service is allocated within bounds.
        assert_eq!(
            result.bus_allocation.keys().collect::<Vec<_>>(),
            vec!["B1", "B2"]
        );
        assert_eq!(result.metro_allocation.keys().collect::<Vec<_>>(), vec!["M1"]);
        assert!(result.metrics.total_buses_allocated <= 10);
        assert!(result.metrics.total_trains_allocated <= 4);

        // Stops 1, 2, 3 are served by both modes.
        assert_eq!(result.metrics.transfer_point_count, 3);
        assert_eq!(result.transfer_scores.len(), 3);

        assert_eq!(result.schedules.len(), 3);
        assert_eq!(
            result.metrics.total_daily_capacity,
            result.schedules.iter().map(|s| s.daily_capacity).sum::<u64>()
        );
    }

    #[test]
    fn test_headways_feed_back() {
        let buses = vec![TransitRecord::from_stop_list("B1", "1,2,3", 5000.0)];
        let result = optimize_network(
            &buses,
            &[],
            &sample_locations(),
            &sample_demand(),
            &limits(4, 4),
            &limits(4, 4),
        )
        .expect("feasible");

        let headways = result.headways();
        let interval = headways["B1"];
        assert!((interval - 960.0 / result.bus_allocation["B1"] as f64).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_service_gets_no_units() {
        let buses = vec![
            TransitRecord::from_stop_list("B1", "1,2", 5000.0),
            TransitRecord::from_stop_list("B2", "8,9", 4000.0), // unknown stops
        ];
        let result = optimize_network(
            &buses,
            &[],
            &sample_locations(),
            &DemandMatrix::new(),
            &limits(5, 5),
            &limits(5, 5),
        )
        .expect("feasible");

        assert!(result.bus_allocation.contains_key("B1"));
        assert!(!result.bus_allocation.contains_key("B2"));
    }

    #[test]
    fn test_empty_tables_error() {
        let err = optimize_network(
            &[],
            &[],
            &sample_locations(),
            &DemandMatrix::new(),
            &limits(5, 5),
            &limits(5, 5),
        )
        .unwrap_err();
        assert_eq!(err, TransitError::EmptyTable("transit services"));
    }

    #[test]
    fn test_infeasible_pool_propagates() {
        let buses = vec![
            TransitRecord::from_stop_list("B1", "1,2", 5000.0),
            TransitRecord::from_stop_list("B2", "2,3", 4000.0),
        ];
        let err = optimize_network(
            &buses,
            &[],
            &sample_locations(),
            &DemandMatrix::new(),
            &AllocationLimits {
                max_units: 1,
                min_units: 1,
                max_per_route: 5,
            },
            &limits(5, 5),
        )
        .unwrap_err();
        assert!(matches!(err, TransitError::AllocationInfeasible(_)));
    }
}
