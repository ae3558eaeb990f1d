//! Fleet allocation by bounded dynamic programming.
//!
//! # Algorithm
//!
//! A knapsack-style table over routes and units: `dp[i][u]` is the best
//! cumulative value over the first `i` routes using at most `u` units,
//! where each route takes an integer allocation within its per-route
//! bounds. A route's contribution is `value * min(units, 10)` — the
//! diminishing-returns cap that stops any single route from absorbing
//! the whole pool. Backtracking over the recorded choices reconstructs
//! the per-route allocation.
//!
//! Infeasible requests (the pool cannot cover every route's minimum,
//! or the minimum exceeds the per-route maximum) fail upfront with
//! [`TransitError::AllocationInfeasible`] before the table is built.
//!
//! # Complexity
//!
//! O(n · max_units · max_per_route) time, O(n · max_units) space.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::TransitError;
use crate::models::{DemandMatrix, TransitRecord};

/// Units assigned per route or line id.
pub type Allocation = BTreeMap<String, usize>;

/// Allocations beyond this many units on one route add no value.
pub const EFFECTIVE_UNIT_CAP: usize = 10;

/// Value bonus per transfer-point stop a route serves.
pub const TRANSFER_STOP_BONUS: f64 = 500.0;

/// Demand-derived value of one route, used as the DP objective weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteValue {
    /// Route or line id.
    pub route_id: String,
    /// Demand-weighted score.
    pub value: f64,
}

/// Bounds of an allocation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationLimits {
    /// Total unit pool.
    pub max_units: usize,
    /// Minimum units every route must receive.
    pub min_units: usize,
    /// Maximum units any single route may receive.
    pub max_per_route: usize,
}

/// Scores each service for allocation: the daily passenger figure, plus
/// half the pairwise demand over the service's stop pairs, plus a flat
/// bonus per transfer-point stop served.
pub fn route_values(
    records: &[TransitRecord],
    demand: &DemandMatrix,
    transfer_points: &BTreeSet<String>,
) -> Vec<RouteValue> {
    records
        .iter()
        .map(|record| {
            let stops: Vec<&str> = record.stops.iter().map(String::as_str).unique().collect();
            let pair_demand: f64 = stops
                .iter()
                .tuple_combinations()
                .map(|(a, b)| demand.between(a, b))
                .sum();
            let bonus = stops
                .iter()
                .filter(|s| transfer_points.contains(**s))
                .count() as f64
                * TRANSFER_STOP_BONUS;
            RouteValue {
                route_id: record.id.clone(),
                value: record.daily_passengers + 0.5 * pair_demand + bonus,
            }
        })
        .collect()
}

/// Allocates the unit pool across routes, maximizing total value.
///
/// Every route receives between `min_units` and `max_per_route` units
/// and the allocations sum to at most `max_units`.
///
/// # Errors
///
/// [`TransitError::EmptyTable`] when `values` is empty, and
/// [`TransitError::AllocationInfeasible`] when the bounds cannot be
/// met — the request fails before any units are assigned rather than
/// silently overrunning the pool.
///
/// # Examples
///
/// ```
/// use urban_transit::allocation::{allocate, AllocationLimits, RouteValue};
///
/// let values = vec![
///     RouteValue { route_id: "B1".into(), value: 1000.0 },
///     RouteValue { route_id: "B2".into(), value: 800.0 },
///     RouteValue { route_id: "M1".into(), value: 1500.0 },
/// ];
/// let limits = AllocationLimits { max_units: 10, min_units: 1, max_per_route: 5 };
///
/// let allocation = allocate(&values, &limits).unwrap();
/// assert!(allocation.values().sum::<usize>() <= 10);
/// assert_eq!(allocation["M1"], 5);
/// ```
pub fn allocate(
    values: &[RouteValue],
    limits: &AllocationLimits,
) -> Result<Allocation, TransitError> {
    if values.is_empty() {
        return Err(TransitError::EmptyTable("route_values"));
    }
    let AllocationLimits {
        max_units,
        min_units,
        max_per_route,
    } = *limits;
    let n = values.len();

    if min_units > max_per_route {
        return Err(TransitError::AllocationInfeasible(format!(
            "minimum of {min_units} units per route exceeds the per-route maximum of {max_per_route}"
        )));
    }
    if n * min_units > max_units {
        return Err(TransitError::AllocationInfeasible(format!(
            "{n} routes require at least {} units but only {max_units} are available",
            n * min_units
        )));
    }

    // dp[i][u] = best value over the first i routes using at most u units.
    let cols = max_units + 1;
    let mut dp = vec![f64::NEG_INFINITY; (n + 1) * cols];
    let mut choice = vec![0usize; (n + 1) * cols];
    for cell in dp.iter_mut().take(cols) {
        *cell = 0.0;
    }

    for i in 1..=n {
        let value = values[i - 1].value;
        for u in 0..cols {
            let mut best = f64::NEG_INFINITY;
            let mut best_units = 0;
            for units in min_units..=u.min(max_per_route) {
                let without = dp[(i - 1) * cols + (u - units)];
                if without == f64::NEG_INFINITY {
                    continue;
                }
                let gain = value * units.min(EFFECTIVE_UNIT_CAP) as f64;
                if without + gain > best {
                    best = without + gain;
                    best_units = units;
                }
            }
            dp[i * cols + u] = best;
            choice[i * cols + u] = best_units;
        }
    }

    let mut allocation = Allocation::new();
    let mut remaining = max_units;
    for i in (1..=n).rev() {
        let units = choice[i * cols + remaining];
        allocation.insert(values[i - 1].route_id.clone(), units);
        remaining -= units;
    }
    Ok(allocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn values(pairs: &[(&str, f64)]) -> Vec<RouteValue> {
        pairs
            .iter()
            .map(|(id, v)| RouteValue {
                route_id: id.to_string(),
                value: *v,
            })
            .collect()
    }

    #[test]
    fn test_allocation_respects_bounds() {
        let vals = values(&[("B1", 1000.0), ("B2", 800.0), ("M1", 1500.0)]);
        let limits = AllocationLimits {
            max_units: 10,
            min_units: 1,
            max_per_route: 5,
        };
        let allocation = allocate(&vals, &limits).expect("feasible");

        assert_eq!(allocation.len(), 3);
        assert!(allocation.values().sum::<usize>() <= 10);
        for units in allocation.values() {
            assert!(*units >= 1);
            assert!(*units <= 5);
        }
    }

    #[test]
    fn test_higher_value_routes_get_more_units() {
        let vals = values(&[("B1", 1000.0), ("B2", 800.0), ("M1", 1500.0)]);
        let limits = AllocationLimits {
            max_units: 10,
            min_units: 1,
            max_per_route: 5,
        };
        let allocation = allocate(&vals, &limits).expect("feasible");
        // Best packing: M1 maxed, then B1, B2 at minimum.
        assert_eq!(allocation["M1"], 5);
        assert_eq!(allocation["B1"], 4);
        assert_eq!(allocation["B2"], 1);
    }

    #[test]
    fn test_diminishing_returns_cap() {
        let vals = values(&[("B1", 1000.0), ("B2", 100.0)]);
        let limits = AllocationLimits {
            max_units: 12,
            min_units: 1,
            max_per_route: 12,
        };
        let allocation = allocate(&vals, &limits).expect("feasible");
        // The 11th unit on B1 adds nothing; it goes to B2 instead.
        assert_eq!(allocation["B1"], 10);
        assert_eq!(allocation["B2"], 2);
    }

    #[test]
    fn test_infeasible_pool_errors() {
        let vals = values(&[("B1", 1.0), ("B2", 1.0), ("B3", 1.0)]);
        let limits = AllocationLimits {
            max_units: 10,
            min_units: 5,
            max_per_route: 10,
        };
        let err = allocate(&vals, &limits).unwrap_err();
        assert!(matches!(err, TransitError::AllocationInfeasible(_)));
        assert!(err.to_string().contains("15 units"));
    }

    #[test]
    fn test_min_above_per_route_max_errors() {
        let vals = values(&[("B1", 1.0)]);
        let limits = AllocationLimits {
            max_units: 10,
            min_units: 4,
            max_per_route: 3,
        };
        assert!(matches!(
            allocate(&vals, &limits),
            Err(TransitError::AllocationInfeasible(_))
        ));
    }

    #[test]
    fn test_empty_values_error() {
        let limits = AllocationLimits {
            max_units: 10,
            min_units: 1,
            max_per_route: 5,
        };
        assert_eq!(
            allocate(&[], &limits).unwrap_err(),
            TransitError::EmptyTable("route_values")
        );
    }

    #[test]
    fn test_route_values_scoring() {
        let records = vec![TransitRecord::from_stop_list("B1", "1,2,3", 5000.0)];
        let mut demand = DemandMatrix::new();
        demand.insert("1", "2", 1000.0);
        demand.insert("2", "3", 800.0);
        demand.insert("1", "3", 600.0);
        let transfer_points: BTreeSet<String> = ["2".to_string()].into_iter().collect();

        let scored = route_values(&records, &demand, &transfer_points);
        assert_eq!(scored.len(), 1);
        // 5000 + (1000 + 800 + 600) / 2 + 500.
        assert!((scored[0].value - 6700.0).abs() < 1e-10);
    }

    #[test]
    fn test_route_values_ignore_repeated_stops() {
        let records = vec![TransitRecord::from_stop_list("B1", "1,2,1", 100.0)];
        let mut demand = DemandMatrix::new();
        demand.insert("1", "2", 1000.0);
        let scored = route_values(&records, &demand, &BTreeSet::new());
        assert!((scored[0].value - 600.0).abs() < 1e-10);
    }

    proptest! {
        #[test]
        fn prop_allocation_bounds_hold(
            vals in proptest::collection::vec(0.0f64..10_000.0, 1..6),
            max_units in 0usize..40,
            min_units in 0usize..4,
            max_per_route in 1usize..15,
        ) {
            let values: Vec<RouteValue> = vals
                .iter()
                .enumerate()
                .map(|(i, v)| RouteValue { route_id: format!("R{i}"), value: *v })
                .collect();
            let limits = AllocationLimits { max_units, min_units, max_per_route };

            match allocate(&values, &limits) {
                Ok(allocation) => {
                    prop_assert_eq!(allocation.len(), values.len());
                    prop_assert!(allocation.values().sum::<usize>() <= max_units);
                    for units in allocation.values() {
                        prop_assert!(*units >= min_units);
                        prop_assert!(*units <= max_per_route);
                    }
                }
                Err(TransitError::AllocationInfeasible(_)) => {
                    let infeasible = min_units > max_per_route
                        || values.len() * min_units > max_units;
                    prop_assert!(infeasible);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
    }
}
