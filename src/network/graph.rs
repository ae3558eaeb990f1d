//! Road network graph construction.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::models::{Location, RoadRecord};

/// An undirected weighted edge of the road network.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadEdge {
    from: String,
    to: String,
    name: String,
    distance: f64,
    capacity: f64,
    condition: u8,
    traffic_flow: Option<f64>,
    congestion: Option<f64>,
}

impl RoadEdge {
    fn from_record(record: &RoadRecord) -> Self {
        Self {
            from: record.from_id.clone(),
            to: record.to_id.clone(),
            name: record.name.clone(),
            distance: record.distance_km,
            capacity: record.capacity,
            condition: record.condition,
            traffic_flow: record.traffic_flow,
            congestion: record.congestion,
        }
    }

    /// One endpoint id.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// The other endpoint id.
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Road display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length in kilometers.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Capacity in vehicles per hour.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Road quality, 1 (worst) to 10 (best).
    pub fn condition(&self) -> u8 {
        self.condition
    }

    /// Observed flow in vehicles per hour, if known.
    pub fn traffic_flow(&self) -> Option<f64> {
        self.traffic_flow
    }

    /// Saturation fraction in `[0, 1]`, if known.
    pub fn congestion(&self) -> Option<f64> {
        self.congestion
    }

    /// Given one endpoint id, returns the opposite endpoint.
    pub fn other_end(&self, id: &str) -> &str {
        if self.from == id {
            &self.to
        } else {
            &self.from
        }
    }

    /// Returns `true` if the edge connects the given pair, in either order.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// Options for building a [`RoadNetwork`].
#[derive(Debug, Clone)]
pub struct GraphOptions {
    /// Include facility locations as graph nodes. Default `true`.
    pub include_facilities: bool,
    /// Location ids under closure: any edge touching one is dropped.
    /// Matched exactly, never by substring.
    pub closed_locations: HashSet<String>,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            include_facilities: true,
            closed_locations: HashSet::new(),
        }
    }
}

/// The undirected weighted road graph over neighborhoods and facilities.
///
/// Built once from raw tables; construction tolerates bad data by
/// skipping offending road records (logged), so a fully malformed road
/// table still yields a graph of isolated nodes and path queries on it
/// report "no route" instead of failing.
///
/// # Examples
///
/// ```
/// use urban_transit::models::{Location, RoadRecord};
/// use urban_transit::network::{GraphOptions, RoadNetwork};
///
/// let neighborhoods = vec![
///     Location::neighborhood("1", "Downtown", 250_000, 0.0, 0.0),
///     Location::neighborhood("2", "Maadi", 85_000, 0.1, 0.0),
/// ];
/// let roads = vec![RoadRecord::new("1", "2", "Corniche", 10.0, 3000.0, 8)];
///
/// let network = RoadNetwork::build(&neighborhoods, &[], &roads, &GraphOptions::default());
/// assert_eq!(network.node_count(), 2);
/// assert_eq!(network.edge_count(), 1);
/// assert!(network.edge_between("2", "1").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    locations: HashMap<String, Location>,
    edges: Vec<RoadEdge>,
    adjacency: HashMap<String, Vec<usize>>,
}

impl RoadNetwork {
    /// Builds the road graph from location and road tables.
    ///
    /// Nodes are the neighborhoods plus, when
    /// `options.include_facilities` is set, the facilities. A road
    /// record becomes an edge only when both endpoints are known nodes,
    /// neither endpoint is closed, and its numeric fields validate;
    /// anything else is skipped and logged, never fatal.
    pub fn build(
        neighborhoods: &[Location],
        facilities: &[Location],
        roads: &[RoadRecord],
        options: &GraphOptions,
    ) -> Self {
        let mut locations = HashMap::new();
        for loc in neighborhoods {
            locations.insert(loc.id().to_string(), loc.clone());
        }
        if options.include_facilities {
            for loc in facilities {
                locations.insert(loc.id().to_string(), loc.clone());
            }
        }

        let mut network = Self {
            locations,
            edges: Vec::new(),
            adjacency: HashMap::new(),
        };

        for record in roads {
            if let Err(reason) = record.validate() {
                warn!(
                    road = %record.name,
                    from = %record.from_id,
                    to = %record.to_id,
                    reason,
                    "skipping malformed road record"
                );
                continue;
            }
            if !network.locations.contains_key(&record.from_id)
                || !network.locations.contains_key(&record.to_id)
            {
                debug!(
                    road = %record.name,
                    from = %record.from_id,
                    to = %record.to_id,
                    "skipping road with unknown endpoint"
                );
                continue;
            }
            if options.closed_locations.contains(&record.from_id)
                || options.closed_locations.contains(&record.to_id)
            {
                debug!(road = %record.name, "skipping road under closure");
                continue;
            }

            let idx = network.edges.len();
            network.edges.push(RoadEdge::from_record(record));
            network
                .adjacency
                .entry(record.from_id.clone())
                .or_default()
                .push(idx);
            network
                .adjacency
                .entry(record.to_id.clone())
                .or_default()
                .push(idx);
        }

        network
    }

    /// Returns `true` if the id is a node of this graph.
    pub fn contains(&self, id: &str) -> bool {
        self.locations.contains_key(id)
    }

    /// Looks up a location by id.
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    /// Iterates over all locations in the graph.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Coordinate pair of a node, if present.
    pub fn position(&self, id: &str) -> Option<(f64, f64)> {
        self.locations.get(id).map(Location::position)
    }

    /// Edges incident to the given node.
    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a RoadEdge> + 'a {
        self.adjacency
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    /// The first edge connecting the pair, in either direction.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&RoadEdge> {
        self.neighbors(a).find(|e| e.connects(a, b))
    }

    /// All edges of the graph.
    pub fn edges(&self) -> &[RoadEdge] {
        &self.edges
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.locations.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
