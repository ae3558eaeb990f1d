//! Itinerary and leg types produced by the transit route finder.

use serde::{Deserialize, Serialize};

use super::TransitMode;

/// A single leg of a transit journey.
///
/// Transfer legs connect a stop to itself and carry the interchange
/// walking time; they contribute no distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Travel mode of this leg.
    pub mode: TransitMode,
    /// Origin stop id.
    pub from: String,
    /// Destination stop id.
    pub to: String,
    /// Resolved origin display name.
    pub from_name: String,
    /// Resolved destination display name.
    pub to_name: String,
    /// Route or line id; `None` for transfer legs.
    pub line: Option<String>,
    /// In-vehicle (or interchange) time in minutes.
    pub travel_time: f64,
    /// Waiting time charged at the start of this leg, in minutes.
    /// Non-zero only on first boarding and after a route change.
    pub wait_time: f64,
    /// Geographic length of this leg in kilometers.
    pub distance: f64,
    /// `true` when the leg's origin is served by both bus and metro.
    pub at_transfer_point: bool,
}

/// A complete transit journey: ordered legs plus aggregate totals.
///
/// Produced fresh by each route-finding call; stateless.
///
/// # Examples
///
/// ```
/// use urban_transit::models::{Itinerary, Leg, TransitMode};
///
/// let mut it = Itinerary::new();
/// it.push_leg(Leg {
///     mode: TransitMode::Bus,
///     from: "1".into(),
///     to: "2".into(),
///     from_name: "Downtown".into(),
///     to_name: "Maadi".into(),
///     line: Some("B1".into()),
///     travel_time: 12.0,
///     wait_time: 7.5,
///     distance: 6.0,
///     at_transfer_point: false,
/// });
/// assert_eq!(it.total_travel_time(), 12.0);
/// assert_eq!(it.total_time(), 19.5);
/// assert_eq!(it.transfer_count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    legs: Vec<Leg>,
    fare: f64,
}

impl Itinerary {
    /// Creates an empty itinerary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a leg.
    pub fn push_leg(&mut self, leg: Leg) {
        self.legs.push(leg);
    }

    /// The ordered legs of the journey.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns `true` if the journey has no legs.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Total in-vehicle and interchange time in minutes.
    pub fn total_travel_time(&self) -> f64 {
        self.legs.iter().map(|l| l.travel_time).sum()
    }

    /// Total waiting time in minutes.
    pub fn total_wait_time(&self) -> f64 {
        self.legs.iter().map(|l| l.wait_time).sum()
    }

    /// Door-to-door time: travel plus waiting, in minutes.
    pub fn total_time(&self) -> f64 {
        self.total_travel_time() + self.total_wait_time()
    }

    /// Total geographic distance in kilometers.
    pub fn total_distance(&self) -> f64 {
        self.legs.iter().map(|l| l.distance).sum()
    }

    /// Number of interchanges in the journey.
    pub fn transfer_count(&self) -> usize {
        self.legs
            .iter()
            .filter(|l| l.mode == TransitMode::Transfer)
            .count()
    }

    /// Total fare in the dataset's currency units.
    pub fn fare(&self) -> f64 {
        self.fare
    }

    /// Sets the total fare (computed by the route finder).
    pub fn set_fare(&mut self, fare: f64) {
        self.fare = fare;
    }
}
