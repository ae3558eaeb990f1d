//! Road table rows.

use serde::{Deserialize, Serialize};

/// A raw road table row connecting two locations.
///
/// Roads are undirected: traversal cost is identical in both directions.
/// `traffic_flow` and `congestion` are optional live-ish overlays; when
/// absent, the travel-time model assumes 50% capacity utilisation and a
/// 0.5 congestion level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadRecord {
    /// Id of one endpoint location.
    pub from_id: String,
    /// Id of the other endpoint location.
    pub to_id: String,
    /// Road display name.
    pub name: String,
    /// Length in kilometers. Must be positive.
    pub distance_km: f64,
    /// Capacity in vehicles per hour.
    pub capacity: f64,
    /// Road quality, 1 (worst) to 10 (best).
    pub condition: u8,
    /// Observed flow in vehicles per hour, if known.
    #[serde(default)]
    pub traffic_flow: Option<f64>,
    /// Saturation fraction in `[0, 1]`, if known.
    #[serde(default)]
    pub congestion: Option<f64>,
}

impl RoadRecord {
    /// Creates a road row with no traffic overlay.
    pub fn new(
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        name: impl Into<String>,
        distance_km: f64,
        capacity: f64,
        condition: u8,
    ) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            name: name.into(),
            distance_km,
            capacity,
            condition,
            traffic_flow: None,
            congestion: None,
        }
    }

    /// Checks the numeric fields, returning the first problem found.
    ///
    /// Used by the graph builder to decide whether to skip the record.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.distance_km.is_finite() || self.distance_km <= 0.0 {
            return Err("distance must be positive");
        }
        if !self.capacity.is_finite() || self.capacity < 0.0 {
            return Err("capacity must be non-negative");
        }
        if self.condition < 1 || self.condition > 10 {
            return Err("condition must be in 1..=10");
        }
        if let Some(c) = self.congestion {
            if !(0.0..=1.0).contains(&c) {
                return Err("congestion must be in 0..=1");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_record() {
        let r = RoadRecord::new("1", "2", "Ring Road", 12.5, 3000.0, 8);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_invalid_distance() {
        let mut r = RoadRecord::new("1", "2", "Ring Road", 0.0, 3000.0, 8);
        assert_eq!(r.validate(), Err("distance must be positive"));
        r.distance_km = f64::NAN;
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_invalid_condition() {
        let r = RoadRecord::new("1", "2", "Ring Road", 5.0, 3000.0, 0);
        assert!(r.validate().is_err());
        let r = RoadRecord::new("1", "2", "Ring Road", 5.0, 3000.0, 11);
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_invalid_congestion() {
        let mut r = RoadRecord::new("1", "2", "Ring Road", 5.0, 3000.0, 7);
        r.congestion = Some(1.4);
        assert!(r.validate().is_err());
    }
}
