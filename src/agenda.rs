//! Agenda view — groups the committed timeline by calendar day.
//!
//! A derived, read-only index over the canonical list. The store stays
//! the single source of truth; this view is recomputed on demand and
//! never written back, so the two cannot drift.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Appointment;

/// One calendar day's appointments, start-ascending.
#[derive(Debug, Clone, Serialize)]
pub struct DayAgenda {
    pub date: NaiveDate,
    pub appointments: Vec<Appointment>,
}

/// Groups appointments by the calendar date of their start, days
/// ascending, entries within a day start-sorted.
pub fn group_by_day(appointments: &[Appointment]) -> Vec<DayAgenda> {
    let mut by_day: BTreeMap<NaiveDate, Vec<Appointment>> = BTreeMap::new();
    for a in appointments {
        by_day.entry(a.start.date()).or_default().push(a.clone());
    }
    by_day
        .into_iter()
        .map(|(date, mut appointments)| {
            appointments.sort_by_key(|a| a.start);
            DayAgenda { date, appointments }
        })
        .collect()
}

/// The date-scoped subset the reflow engine operates on, in display
/// (start-ascending) order.
pub fn appointments_on(appointments: &[Appointment], date: NaiveDate) -> Vec<Appointment> {
    let mut day: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.start.date() == date)
        .cloned()
        .collect();
    day.sort_by_key(|a| a.start);
    day
}
