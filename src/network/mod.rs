//! Road network graph and travel-time model.
//!
//! - [`RoadNetwork`] — undirected weighted graph over locations, built
//!   from raw road records with per-record validation
//! - [`travel_time_minutes`] — time-of-day travel-time model
//! - [`analyze_path`] — per-segment path analysis with bottleneck flags

mod graph;
mod time_cost;

pub use graph::{GraphOptions, RoadEdge, RoadNetwork};
pub use time_cost::{
    analyze_path, congestion_penalty, travel_time_minutes, Bottleneck, BottleneckReason,
    PathAnalysis, PeriodTimes, SegmentAnalysis, TimeOfDay, BASE_SPEED_KMH, DEFAULT_CONGESTION,
    MIN_CAPACITY_FACTOR,
};
