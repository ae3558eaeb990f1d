//! Location types: neighborhoods and public facilities.

use serde::{Deserialize, Serialize};

/// What kind of place a [`Location`] is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationKind {
    /// A residential neighborhood.
    Neighborhood,
    /// A public facility with a category label ("Medical", "Education", ...).
    Facility {
        /// Facility category, matched case-insensitively by searches.
        category: String,
    },
}

/// A named point in the urban network: a neighborhood or a facility.
///
/// Locations are immutable reference data loaded once per session; the
/// core never mutates them. Coordinates are in the dataset's geographic
/// units (degree-like); multiply a coordinate distance by 100 to obtain
/// kilometers for this dataset.
///
/// # Examples
///
/// ```
/// use urban_transit::models::Location;
///
/// let n = Location::neighborhood("1", "Downtown", 250_000, 30.05, 31.24);
/// assert_eq!(n.id(), "1");
/// assert!(n.is_neighborhood());
/// assert_eq!(n.population(), Some(250_000));
///
/// let h = Location::facility("F1", "Central Hospital", "Medical", 30.06, 31.25);
/// assert_eq!(h.facility_category(), Some("Medical"));
/// assert!(h.population().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: String,
    name: String,
    population: Option<u64>,
    kind: LocationKind,
    x: f64,
    y: f64,
}

impl Location {
    /// Creates a neighborhood with a population figure.
    pub fn neighborhood(
        id: impl Into<String>,
        name: impl Into<String>,
        population: u64,
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            population: Some(population),
            kind: LocationKind::Neighborhood,
            x,
            y,
        }
    }

    /// Creates a facility of the given category.
    pub fn facility(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            population: None,
            kind: LocationKind::Facility {
                category: category.into(),
            },
            x,
            y,
        }
    }

    /// Unique location id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resident population (neighborhoods only).
    pub fn population(&self) -> Option<u64> {
        self.population
    }

    /// The kind of place this is.
    pub fn kind(&self) -> &LocationKind {
        &self.kind
    }

    /// Returns `true` for neighborhoods.
    pub fn is_neighborhood(&self) -> bool {
        matches!(self.kind, LocationKind::Neighborhood)
    }

    /// Facility category, or `None` for neighborhoods.
    pub fn facility_category(&self) -> Option<&str> {
        match &self.kind {
            LocationKind::Facility { category } => Some(category),
            LocationKind::Neighborhood => None,
        }
    }

    /// X-coordinate (longitude-like).
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate (latitude-like).
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Coordinate pair `(x, y)`.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Euclidean distance to another location, in coordinate units.
    pub fn distance_to(&self, other: &Location) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
