//! Scheduling — the slot-allocation core of the triage companion.
//!
//! `allocate` and `reflow`/`cancel` are pure: they read nothing but
//! their arguments and propose a new timeline. The service functions
//! here wire them to the [`AppointmentStore`]: read the canonical list,
//! run the pure core, commit the full replacement. Both entry points
//! are invoked synchronously from a user action, after the UI's
//! explicit confirmation.

mod allocate;
mod reflow;

pub use allocate::{allocate, Allocation};
pub use reflow::{cancel, reflow};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::models::Appointment;
use crate::store::AppointmentStore;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Cancellation index {index} out of range for {len} appointment(s)")]
    InvalidIndex { index: usize, len: usize },
}

/// What the external triage collaborator delivers once the language
/// model has classified the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub severity: crate::models::Severity,
    pub topic: Option<String>,
}

/// Books a slot for a triage result and commits the new timeline.
///
/// The inserted appointment is enriched with the persisted facility
/// selection and the visit topic (trimmed; blank means none) before
/// the commit, mirroring what the triage flow attaches on confirm.
/// Returns the appointment as committed.
pub fn book_from_triage(
    store: &mut AppointmentStore,
    assessment: &TriageAssessment,
    now: NaiveDateTime,
) -> Appointment {
    let Allocation {
        updated,
        mut inserted,
    } = allocate(
        store.appointments(),
        assessment.severity,
        now,
        config::slot_duration(),
    );

    inserted.hospital = store.selected_hospital().cloned();
    inserted.topic = assessment
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    let mut new_list = updated;
    new_list.push(inserted.clone());
    store.commit(new_list);

    tracing::info!(
        severity = assessment.severity.as_str(),
        start = %inserted.start,
        "Booked triage appointment"
    );
    inserted
}

/// Cancels the `index`-th appointment of the given calendar day and
/// commits the reflowed timeline. The day's subset is recomputed; every
/// other day is carried over untouched, and the committed list is the
/// union of all day subsets.
///
/// On [`ScheduleError::InvalidIndex`] the store is left untouched.
pub fn cancel_appointment(
    store: &mut AppointmentStore,
    date: NaiveDate,
    index: usize,
) -> Result<(), ScheduleError> {
    let (day_list, mut others): (Vec<Appointment>, Vec<Appointment>) = store
        .appointments()
        .iter()
        .cloned()
        .partition(|a| a.start.date() == date);

    let rebuilt = cancel(&day_list, index)?;

    others.extend(rebuilt);
    store.commit(others);
    tracing::info!(%date, index, "Cancelled appointment and reflowed the day");
    Ok(())
}

/// Lays `appointments` out back-to-back from `start`, preserving input
/// order and individual durations. Shared by the critical bump path and
/// the reflow engine.
pub(crate) fn lay_out_from(start: NaiveDateTime, appointments: &[Appointment]) -> Vec<Appointment> {
    let mut cursor = start;
    appointments
        .iter()
        .map(|a| {
            let mut shifted = a.clone();
            shifted.start = cursor;
            shifted.end = cursor + effective_duration(a);
            cursor = shifted.end;
            shifted
        })
        .collect()
}

/// `end <= start` marks a corrupt persisted row; substitute the
/// standard slot length so the timeline stays renderable.
pub(crate) fn effective_duration(a: &Appointment) -> Duration {
    let d = a.duration();
    if d > Duration::zero() {
        d
    } else {
        tracing::warn!("Appointment {} has end <= start, using standard slot length", a.id);
        config::slot_duration()
    }
}
