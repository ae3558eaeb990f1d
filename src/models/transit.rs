//! Transit service records, travel modes, and the demand matrix.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Travel mode of a multimodal edge or itinerary leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransitMode {
    /// A bus route segment.
    Bus,
    /// A metro line segment.
    Metro,
    /// An interchange between services at the same stop.
    Transfer,
}

impl std::fmt::Display for TransitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitMode::Bus => write!(f, "Bus"),
            TransitMode::Metro => write!(f, "Metro"),
            TransitMode::Transfer => write!(f, "Transfer"),
        }
    }
}

/// One transit service: a bus route or a metro line.
///
/// The stop sequence is ordered and must contain at least two stops
/// known to the network to produce any edges; shorter sequences are
/// discarded during the multimodal build.
///
/// # Examples
///
/// ```
/// use urban_transit::models::TransitRecord;
///
/// let route = TransitRecord::from_stop_list("B1", " 1, 2 ,3 ", 5000.0);
/// assert_eq!(route.stops, vec!["1", "2", "3"]);
/// assert_eq!(route.daily_passengers, 5000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitRecord {
    /// Route or line id ("B1", "M2", ...).
    pub id: String,
    /// Ordered stop ids served by this service.
    pub stops: Vec<String>,
    /// Daily passenger figure used as the base demand value.
    pub daily_passengers: f64,
}

impl TransitRecord {
    /// Creates a record from an already-split stop sequence.
    pub fn new(id: impl Into<String>, stops: Vec<String>, daily_passengers: f64) -> Self {
        Self {
            id: id.into(),
            stops,
            daily_passengers,
        }
    }

    /// Creates a record from a comma-delimited stop list, trimming
    /// whitespace and dropping empty entries.
    pub fn from_stop_list(
        id: impl Into<String>,
        stops: &str,
        daily_passengers: f64,
    ) -> Self {
        let stops = stops
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Self::new(id, stops, daily_passengers)
    }
}

/// Origin/destination travel demand in daily passengers.
///
/// Pairs are stored directionally; [`DemandMatrix::between`] sums both
/// directions for callers that treat demand as symmetric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemandMatrix {
    pairs: HashMap<(String, String), f64>,
}

impl DemandMatrix {
    /// Creates an empty demand matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records demand for the ordered pair `(from, to)`, replacing any
    /// previous figure.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>, passengers: f64) {
        self.pairs.insert((from.into(), to.into()), passengers);
    }

    /// Directional demand from `from` to `to`; zero when unrecorded.
    pub fn get(&self, from: &str, to: &str) -> f64 {
        self.pairs
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Total demand between two stops, both directions summed.
    pub fn between(&self, a: &str, b: &str) -> f64 {
        self.get(a, b) + self.get(b, a)
    }

    /// Total demand over every pair that touches the given stop.
    pub fn touching(&self, stop: &str) -> f64 {
        self.pairs
            .iter()
            .filter(|((from, to), _)| from == stop || to == stop)
            .map(|(_, &p)| p)
            .sum()
    }

    /// Number of recorded pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no pairs are recorded.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stop_list_trims() {
        let r = TransitRecord::from_stop_list("B1", "1, 2 , 3,", 100.0);
        assert_eq!(r.stops, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_demand_between_sums_directions() {
        let mut d = DemandMatrix::new();
        d.insert("1", "2", 300.0);
        d.insert("2", "1", 200.0);
        assert_eq!(d.get("1", "2"), 300.0);
        assert_eq!(d.get("2", "3"), 0.0);
        assert_eq!(d.between("1", "2"), 500.0);
        assert_eq!(d.between("2", "1"), 500.0);
    }

    #[test]
    fn test_demand_touching() {
        let mut d = DemandMatrix::new();
        d.insert("1", "2", 300.0);
        d.insert("3", "1", 100.0);
        d.insert("2", "3", 50.0);
        assert_eq!(d.touching("1"), 400.0);
        assert_eq!(d.touching("4"), 0.0);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(TransitMode::Bus.to_string(), "Bus");
        assert_eq!(TransitMode::Metro.to_string(), "Metro");
        assert_eq!(TransitMode::Transfer.to_string(), "Transfer");
    }
}
