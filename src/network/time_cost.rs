//! Time-of-day travel-time model and path analysis.
//!
//! # Model
//!
//! Travel time over a road edge is derived from a 60 km/h base speed
//! scaled by three multipliers applied in order: the time-of-day
//! traffic factor, the road-condition factor (`condition / 10`), and
//! the capacity-utilisation factor (`max(0.3, 1 - flow / capacity)`,
//! with flow defaulting to half of capacity when unobserved). The
//! multipliers are a tunable table, not derived quantities.
//!
//! The model is pure and total: any edge with positive distance yields
//! a finite time, and a zero-length edge yields zero minutes.

use serde::{Deserialize, Serialize};

use super::{RoadEdge, RoadNetwork};

/// Free-flow base speed in km/h.
pub const BASE_SPEED_KMH: f64 = 60.0;

/// Lower bound on the capacity-utilisation factor.
pub const MIN_CAPACITY_FACTOR: f64 = 0.3;

/// Assumed congestion level for edges without observed data.
pub const DEFAULT_CONGESTION: f64 = 0.5;

/// Time-of-day traffic buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    /// Heavy inbound traffic; speeds halved.
    MorningRush,
    /// Heaviest traffic of the day.
    EveningRush,
    /// Moderate traffic.
    Midday,
    /// Free-flow conditions.
    Night,
}

impl TimeOfDay {
    /// All buckets, in day order.
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::MorningRush,
        TimeOfDay::Midday,
        TimeOfDay::EveningRush,
        TimeOfDay::Night,
    ];

    /// Speed multiplier applied during this bucket.
    pub fn traffic_multiplier(self) -> f64 {
        match self {
            TimeOfDay::MorningRush => 0.5,
            TimeOfDay::EveningRush => 0.4,
            TimeOfDay::Midday => 0.8,
            TimeOfDay::Night => 1.0,
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeOfDay::MorningRush => write!(f, "Morning Rush"),
            TimeOfDay::EveningRush => write!(f, "Evening Rush"),
            TimeOfDay::Midday => write!(f, "Midday"),
            TimeOfDay::Night => write!(f, "Night"),
        }
    }
}

/// Estimated travel time over an edge at the given time of day, in minutes.
///
/// # Examples
///
/// ```
/// use urban_transit::models::{Location, RoadRecord};
/// use urban_transit::network::{travel_time_minutes, GraphOptions, RoadNetwork, TimeOfDay};
///
/// let nodes = vec![
///     Location::neighborhood("1", "A", 0, 0.0, 0.0),
///     Location::neighborhood("2", "B", 0, 0.1, 0.0),
/// ];
/// let roads = vec![RoadRecord::new("1", "2", "Corniche", 5.0, 3000.0, 8)];
/// let net = RoadNetwork::build(&nodes, &[], &roads, &GraphOptions::default());
/// let edge = net.edge_between("1", "2").unwrap();
///
/// // 5 km at 60 * 1.0 * 0.8 * 0.5 = 24 km/h -> 12.5 minutes.
/// let t = travel_time_minutes(edge, TimeOfDay::Night);
/// assert!((t - 12.5).abs() < 1e-10);
/// ```
pub fn travel_time_minutes(edge: &RoadEdge, time_of_day: TimeOfDay) -> f64 {
    let traffic_mult = time_of_day.traffic_multiplier();
    let condition_mult = f64::from(edge.condition()) / 10.0;

    let capacity = edge.capacity();
    let capacity_mult = if capacity > 0.0 {
        let flow = edge.traffic_flow().unwrap_or(capacity * 0.5);
        (1.0 - flow / capacity).max(MIN_CAPACITY_FACTOR)
    } else {
        MIN_CAPACITY_FACTOR
    };

    let speed = BASE_SPEED_KMH * traffic_mult * condition_mult * capacity_mult;
    (edge.distance() / speed) * 60.0
}

/// Multiplier `(1 + congestion)` used by congestion-avoiding searches.
pub fn congestion_penalty(edge: &RoadEdge) -> f64 {
    1.0 + edge.congestion().unwrap_or(DEFAULT_CONGESTION)
}

/// Travel time totals for every time-of-day bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTimes {
    /// Minutes during the morning rush.
    pub morning_rush: f64,
    /// Minutes at midday.
    pub midday: f64,
    /// Minutes during the evening rush.
    pub evening_rush: f64,
    /// Minutes at night.
    pub night: f64,
}

impl PeriodTimes {
    fn of(edge: &RoadEdge) -> Self {
        Self {
            morning_rush: travel_time_minutes(edge, TimeOfDay::MorningRush),
            midday: travel_time_minutes(edge, TimeOfDay::Midday),
            evening_rush: travel_time_minutes(edge, TimeOfDay::EveningRush),
            night: travel_time_minutes(edge, TimeOfDay::Night),
        }
    }

    fn accumulate(&mut self, other: &PeriodTimes) {
        self.morning_rush += other.morning_rush;
        self.midday += other.midday;
        self.evening_rush += other.evening_rush;
        self.night += other.night;
    }

    /// Minutes for the given bucket.
    pub fn for_period(&self, period: TimeOfDay) -> f64 {
        match period {
            TimeOfDay::MorningRush => self.morning_rush,
            TimeOfDay::Midday => self.midday,
            TimeOfDay::EveningRush => self.evening_rush,
            TimeOfDay::Night => self.night,
        }
    }

    /// Spread between the slowest and fastest bucket, in minutes.
    pub fn variance(&self) -> f64 {
        let (_, best) = self.best();
        let (_, worst) = self.worst();
        worst - best
    }

    /// The fastest bucket and its minutes.
    pub fn best(&self) -> (TimeOfDay, f64) {
        self.extreme(|a, b| a < b)
    }

    /// The slowest bucket and its minutes.
    pub fn worst(&self) -> (TimeOfDay, f64) {
        self.extreme(|a, b| a > b)
    }

    fn extreme(&self, better: impl Fn(f64, f64) -> bool) -> (TimeOfDay, f64) {
        let mut pick = (TimeOfDay::MorningRush, self.morning_rush);
        for period in [TimeOfDay::Midday, TimeOfDay::EveningRush, TimeOfDay::Night] {
            let t = self.for_period(period);
            if better(t, pick.1) {
                pick = (period, t);
            }
        }
        pick
    }
}

/// Why a segment is flagged as a bottleneck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BottleneckReason {
    /// Travel time swings more than 10 minutes across the day.
    HighTimeVariance,
    /// Road condition below 6.
    PoorCondition,
}

impl std::fmt::Display for BottleneckReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BottleneckReason::HighTimeVariance => write!(f, "High traffic variance"),
            BottleneckReason::PoorCondition => write!(f, "Poor condition"),
        }
    }
}

/// A segment flagged during path analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    /// Road name of the flagged segment.
    pub road_name: String,
    /// Why it was flagged.
    pub reason: BottleneckReason,
    /// Road condition of the segment.
    pub condition: u8,
    /// Time spread of the segment across the day, in minutes.
    pub time_variance: f64,
}

/// Per-segment metrics of an analyzed path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentAnalysis {
    /// Road name.
    pub road_name: String,
    /// Segment origin id.
    pub from: String,
    /// Segment destination id.
    pub to: String,
    /// Length in kilometers.
    pub distance: f64,
    /// Road condition.
    pub condition: u8,
    /// Capacity in vehicles per hour.
    pub capacity: f64,
    /// Travel time at the requested time of day, in minutes.
    pub current_time: f64,
    /// Travel time for every bucket.
    pub times: PeriodTimes,
    /// `true` when the segment is a bottleneck.
    pub is_bottleneck: bool,
}

/// Full analysis of a road path at a given time of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathAnalysis {
    /// Per-segment breakdown in path order.
    pub segments: Vec<SegmentAnalysis>,
    /// Total length in kilometers.
    pub total_distance: f64,
    /// Total travel time at the requested time of day, in minutes.
    pub total_time: f64,
    /// Mean road condition over the segments.
    pub avg_condition: f64,
    /// Path totals for every bucket.
    pub period_totals: PeriodTimes,
    /// The cheapest bucket to travel and its minutes.
    pub best_period: (TimeOfDay, f64),
    /// Minutes saved by traveling in the best rather than worst bucket.
    pub potential_saving: f64,
    /// Flagged segments.
    pub bottlenecks: Vec<Bottleneck>,
}

/// Analyzes a path found on the road network: per-segment times across
/// all four buckets, totals, average condition, the best period to
/// travel, and bottleneck flags (time spread over 10 minutes, or
/// condition below 6).
///
/// Returns `None` for paths shorter than two nodes or paths that do not
/// follow edges of the graph.
pub fn analyze_path(
    network: &RoadNetwork,
    path: &[String],
    time_of_day: TimeOfDay,
) -> Option<PathAnalysis> {
    if path.len() < 2 {
        return None;
    }

    let mut segments = Vec::with_capacity(path.len() - 1);
    let mut bottlenecks = Vec::new();
    let mut period_totals = PeriodTimes::default();
    let mut total_distance = 0.0;
    let mut condition_sum = 0.0;

    for pair in path.windows(2) {
        let edge = network.edge_between(&pair[0], &pair[1])?;
        let times = PeriodTimes::of(edge);
        let variance = times.variance();

        let reason = if variance > 10.0 {
            Some(BottleneckReason::HighTimeVariance)
        } else if edge.condition() < 6 {
            Some(BottleneckReason::PoorCondition)
        } else {
            None
        };
        if let Some(reason) = reason {
            bottlenecks.push(Bottleneck {
                road_name: edge.name().to_string(),
                reason,
                condition: edge.condition(),
                time_variance: variance,
            });
        }

        total_distance += edge.distance();
        condition_sum += f64::from(edge.condition());
        period_totals.accumulate(&times);

        segments.push(SegmentAnalysis {
            road_name: edge.name().to_string(),
            from: pair[0].clone(),
            to: pair[1].clone(),
            distance: edge.distance(),
            condition: edge.condition(),
            capacity: edge.capacity(),
            current_time: times.for_period(time_of_day),
            times,
            is_bottleneck: reason.is_some(),
        });
    }

    let best_period = period_totals.best();
    let (_, worst) = period_totals.worst();

    Some(PathAnalysis {
        total_distance,
        total_time: period_totals.for_period(time_of_day),
        avg_condition: condition_sum / segments.len() as f64,
        best_period,
        potential_saving: worst - best_period.1,
        period_totals,
        bottlenecks,
        segments,
    })
}
