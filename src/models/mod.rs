//! Domain model types for the urban transport network.
//!
//! Provides the core reference data and result shapes: locations with
//! coordinates and populations, raw road and transit service records,
//! the origin/destination demand matrix, and the itinerary produced by
//! the transit route finder.

mod itinerary;
mod location;
mod road;
mod transit;

pub use itinerary::{Itinerary, Leg};
pub use location::{Location, LocationKind};
pub use road::RoadRecord;
pub use transit::{DemandMatrix, TransitMode, TransitRecord};
