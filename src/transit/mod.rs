//! The multimodal transit network: graph, schedules, and routing.
//!
//! - [`MultimodalGraph`] — multigraph of typed bus/metro/transfer edges
//! - [`build_multimodal`] — graph construction from service records
//! - [`score_transfer_points`] — interchange ranking for reporting
//! - [`service_schedules`] — timetables from a fleet allocation
//! - [`find_route`] — preference-weighted itinerary search

mod builder;
mod graph;
mod route_finder;
mod schedule;
mod transfers;

pub use builder::{
    build_multimodal, validate_services, BUS_DEFAULT_HEADWAY_MIN, BUS_MIN_SEGMENT_MIN,
    BUS_SPEED_KMH, METRO_DEFAULT_HEADWAY_MIN, METRO_MIN_SEGMENT_MIN, METRO_SPEED_KMH,
    TRANSFER_HEADWAY_MIN, TRANSFER_TIME_MIN,
};
pub use graph::{MultimodalGraph, TransitEdge, COORD_SCALE_KM};
pub use route_finder::{
    find_route, RoutePreferences, BUS_BOARDING_FARE, METRO_BASE_FARE,
};
pub use schedule::{service_schedules, ServiceSchedule, BUS_SEATS, TRAIN_CAPACITY};
pub use transfers::{
    score_transfer_points, TransferScore, SCORE_WEIGHT_CROSS_MODE, SCORE_WEIGHT_DEGREE,
    SCORE_WEIGHT_DEMAND,
};
