//! Timetable generation from a fleet allocation.
//!
//! Given the units assigned to each service, spreads departures evenly
//! over the mode's service day and reports headway, timetable, and
//! daily seat capacity per service.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::allocation::Allocation;
use crate::models::{TransitMode, TransitRecord};

/// Seats per bus used for daily-capacity reporting.
pub const BUS_SEATS: u64 = 50;
/// Passengers per train used for daily-capacity reporting.
pub const TRAIN_CAPACITY: u64 = 1000;

/// One service's generated timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSchedule {
    /// Route or line id.
    pub route_id: String,
    /// Bus or metro.
    pub mode: TransitMode,
    /// Stops served, in order.
    pub stops: Vec<String>,
    /// Vehicles or trains assigned by the optimizer.
    pub assigned_units: usize,
    /// Resulting headway in minutes.
    pub interval_min: f64,
    /// Departure times over the service day.
    pub departures: Vec<NaiveTime>,
    /// Transfer points among the service's stops, in stop order.
    pub transfer_points: Vec<String>,
    /// Seats offered per day: departures times per-unit capacity.
    pub daily_capacity: u64,
}

fn service_day(mode: TransitMode) -> (u32, u32) {
    // Minutes from midnight: buses 06:00-22:00, metro 05:00-23:00.
    match mode {
        TransitMode::Bus => (6 * 60, 22 * 60),
        TransitMode::Metro => (5 * 60, 23 * 60),
        TransitMode::Transfer => (0, 0),
    }
}

fn unit_capacity(mode: TransitMode) -> u64 {
    match mode {
        TransitMode::Bus => BUS_SEATS,
        TransitMode::Metro => TRAIN_CAPACITY,
        TransitMode::Transfer => 0,
    }
}

/// Generates timetables for every allocated service of one mode.
///
/// Services absent from the allocation (or allocated zero units) get no
/// timetable and are skipped.
pub fn service_schedules(
    records: &[TransitRecord],
    allocation: &Allocation,
    mode: TransitMode,
    transfer_points: &BTreeSet<String>,
) -> Vec<ServiceSchedule> {
    let (start_min, end_min) = service_day(mode);
    let service_minutes = f64::from(end_min - start_min);

    let mut schedules = Vec::with_capacity(records.len());
    for record in records {
        let units = allocation.get(&record.id).copied().unwrap_or(0);
        if units == 0 {
            debug!(service = %record.id, "no units allocated, skipping timetable");
            continue;
        }

        let interval_min = service_minutes / units as f64;
        let mut departures = Vec::new();
        let mut k = 0u32;
        loop {
            let minute = f64::from(start_min) + f64::from(k) * interval_min;
            // Tolerance absorbs float drift on the final departure.
            if minute > f64::from(end_min) + 1e-9 {
                break;
            }
            let seconds = (minute * 60.0).round() as u32;
            if let Some(t) = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0) {
                departures.push(t);
            }
            k += 1;
        }

        let daily_capacity = departures.len() as u64 * unit_capacity(mode);
        schedules.push(ServiceSchedule {
            route_id: record.id.clone(),
            mode,
            stops: record.stops.clone(),
            assigned_units: units,
            interval_min,
            transfer_points: record
                .stops
                .iter()
                .filter(|s| transfer_points.contains(*s))
                .cloned()
                .collect(),
            daily_capacity,
            departures,
        });
    }
    schedules
}
