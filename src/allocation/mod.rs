//! Fleet allocation over transit services.
//!
//! - [`route_values`] — demand-weighted scoring of services
//! - [`allocate`] — bounded DP allocation of a unit pool
//! - [`optimize_network`] — the full graph → transfers → allocation →
//!   timetable pipeline

mod network;
mod optimizer;

pub use network::{optimize_network, NetworkOptimization, OptimizationMetrics};
pub use optimizer::{
    allocate, route_values, Allocation, AllocationLimits, RouteValue, EFFECTIVE_UNIT_CAP,
    TRANSFER_STOP_BONUS,
};
