//! Reflow engine — cancellation and back-to-back timeline recomputation.
//!
//! Operates on one calendar day's subset of the timeline (the grouping
//! boundary the display layer uses). After a removal the survivors are
//! re-laid back-to-back from the earliest surviving start, in their
//! pre-existing order, each keeping its own duration.

use crate::models::Appointment;

use super::{lay_out_from, ScheduleError};

/// Removes the appointment at `index` from a day's subset and reflows
/// the survivors. The input list is not assumed sorted — the survivors
/// keep their pre-existing relative order.
///
/// An out-of-range index is reported as [`ScheduleError::InvalidIndex`]
/// and nothing is recomputed; the caller treats it as a no-op.
pub fn cancel(day_list: &[Appointment], index: usize) -> Result<Vec<Appointment>, ScheduleError> {
    if index >= day_list.len() {
        return Err(ScheduleError::InvalidIndex {
            index,
            len: day_list.len(),
        });
    }
    let mut survivors = day_list.to_vec();
    let removed = survivors.remove(index);
    tracing::debug!("Cancelled appointment {} ({})", removed.id, removed.summary);
    Ok(reflow(&survivors))
}

/// Lays the appointments back-to-back from the earliest start among
/// them, preserving relative order and each appointment's duration
/// (corrupt `end <= start` rows fall back to the standard slot length).
/// Idempotent: applied to its own output it changes nothing.
pub fn reflow(appointments: &[Appointment]) -> Vec<Appointment> {
    let Some(earliest) = appointments.iter().map(|a| a.start).min() else {
        return Vec::new();
    };
    lay_out_from(earliest, appointments)
}
