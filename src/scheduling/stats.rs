//! Day and period aggregation over the appointment store.
//!
//! Revenue counts every appointment in range, cancelled ones included.
//! Material cost joins each appointment's service id against the live
//! catalog; services no longer in the catalog cost nothing.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::store::AppointmentStore;
use crate::models::{Appointment, Service};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStats {
    pub date: NaiveDate,
    pub revenue: f64,
    pub material_cost: f64,
    pub profit: f64,
    pub count: usize,
    /// By time of day.
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStats {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub revenue: f64,
    pub material_cost: f64,
    pub profit: f64,
    pub volume: usize,
    /// Revenue per appointment, rounded; 0 without appointments.
    pub average_ticket: f64,
    /// Revenue per calendar day of the range (at least one day).
    pub daily_average: f64,
}

pub fn day_stats(store: &AppointmentStore, catalog: &[Service], date: NaiveDate) -> DayStats {
    let appointments: Vec<Appointment> = store.for_date(date).cloned().collect();
    let (revenue, material_cost) = totals(appointments.iter(), catalog);
    DayStats {
        date,
        revenue,
        material_cost,
        profit: revenue - material_cost,
        count: appointments.len(),
        appointments,
    }
}

/// Inclusive range. An inverted range aggregates nothing.
pub fn period_stats(
    store: &AppointmentStore,
    catalog: &[Service],
    start: NaiveDate,
    end: NaiveDate,
) -> PeriodStats {
    let volume = store.in_range(start, end).count();
    let (revenue, material_cost) = totals(store.in_range(start, end), catalog);
    let span_days = ((end - start).num_days() + 1).max(1);

    PeriodStats {
        start,
        end,
        revenue,
        material_cost,
        profit: revenue - material_cost,
        volume,
        average_ticket: if volume == 0 {
            0.0
        } else {
            (revenue / volume as f64).round()
        },
        daily_average: revenue / span_days as f64,
    }
}

/// Days of a month carrying at least one appointment, for the month grid.
pub fn days_with_appointments(store: &AppointmentStore, month: u32, year: i32) -> BTreeSet<u32> {
    store
        .all()
        .iter()
        .filter(|a| a.date.month() == month && a.date.year() == year)
        .map(|a| a.date.day())
        .collect()
}

fn totals<'a>(
    appointments: impl Iterator<Item = &'a Appointment>,
    catalog: &[Service],
) -> (f64, f64) {
    let costs: HashMap<&str, f64> = catalog
        .iter()
        .map(|s| (s.id.as_str(), s.material_cost))
        .collect();

    appointments.fold((0.0, 0.0), |(revenue, cost), a| {
        (
            revenue + a.value,
            cost + costs.get(a.service_id.as_str()).copied().unwrap_or(0.0),
        )
    })
}
