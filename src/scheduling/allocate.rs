//! Slot allocator — pure placement logic for new triage bookings.
//!
//! Given the current timeline and a triage severity, computes where the
//! new appointment lands and which existing appointments (if any) must
//! shift. Only Critical bumps existing appointments; every other level
//! takes the first gap or appends at the end. The computation reads no
//! clock of its own — placement is fully determined by the supplied
//! `now` (only the generated appointment id differs between calls).

use chrono::{Duration, NaiveDateTime};
use uuid::Uuid;

use crate::config;
use crate::models::{Appointment, Severity};

use super::lay_out_from;

/// Outcome of a slot allocation: the (possibly shifted) existing
/// appointments plus the newly placed one. Nothing is committed yet.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub updated: Vec<Appointment>,
    pub inserted: Appointment,
}

/// Computes a non-overlapping slot for a new appointment.
///
/// The earliest schedulable start is `now + lead_time()` — nothing may
/// be booked before that floor.
///
/// Critical: the new appointment takes the floor, and the existing
/// appointments are re-laid back-to-back after it in start order, each
/// keeping its own duration.
///
/// Everything else: first-fit scan over the start-sorted timeline with
/// a `last_end` cursor; a gap of at least `slot` wins, otherwise the
/// appointment is appended after the final cursor position. Existing
/// appointments are returned unmodified on this path, even when an
/// earlier global re-pack would reduce total lateness.
pub fn allocate(
    existing: &[Appointment],
    severity: Severity,
    now: NaiveDateTime,
    slot: Duration,
) -> Allocation {
    let floor = now + config::lead_time();

    let mut sorted: Vec<Appointment> = existing.to_vec();
    sorted.sort_by_key(|a| a.start);

    if severity.is_critical() {
        let inserted = new_appointment(severity, floor, slot);
        let updated = lay_out_from(inserted.end, &sorted);
        return Allocation { updated, inserted };
    }

    let mut last_end = floor;
    for appt in &sorted {
        if appt.start - last_end >= slot {
            let inserted = new_appointment(severity, last_end, slot);
            return Allocation {
                updated: sorted,
                inserted,
            };
        }
        last_end = last_end.max(appt.end);
    }

    let inserted = new_appointment(severity, last_end, slot);
    Allocation {
        updated: sorted,
        inserted,
    }
}

fn new_appointment(severity: Severity, start: NaiveDateTime, slot: Duration) -> Appointment {
    let (summary, description) = if severity.is_critical() {
        (
            "Emergency visit (Critical)".to_string(),
            "Auto-scheduled due to critical severity".to_string(),
        )
    } else {
        (
            format!("ER visit ({})", severity.as_str()),
            "Scheduled based on triage severity".to_string(),
        )
    };
    Appointment {
        id: Uuid::new_v4(),
        summary,
        description,
        start,
        end: start + slot,
        severity: Some(severity),
        hospital: None,
        topic: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn appt(summary: &str, start: NaiveDateTime, end: NaiveDateTime) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            summary: summary.into(),
            description: String::new(),
            start,
            end,
            severity: Some(Severity::Mild),
            hospital: None,
            topic: None,
        }
    }

    fn slot() -> Duration {
        Duration::minutes(20)
    }

    fn assert_no_overlap(appointments: &[Appointment]) {
        for (i, a) in appointments.iter().enumerate() {
            for b in &appointments[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.summary, b.summary);
            }
        }
    }

    #[test]
    fn empty_timeline_places_at_floor() {
        for severity in Severity::ALL {
            let result = allocate(&[], severity, at(9, 0), slot());
            assert!(result.updated.is_empty());
            assert_eq!(result.inserted.start, at(9, 5));
            assert_eq!(result.inserted.end, at(9, 25));
        }
    }

    #[test]
    fn moderate_lands_in_first_sufficient_gap() {
        let existing = vec![
            appt("first", at(10, 0), at(10, 20)),
            appt("second", at(10, 40), at(11, 0)),
        ];
        let result = allocate(&existing, Severity::Moderate, at(9, 0), slot());

        assert_eq!(result.inserted.start, at(10, 20));
        assert_eq!(result.inserted.end, at(10, 40));
        // Existing appointments untouched on the non-critical path.
        assert_eq!(result.updated, existing);
    }

    #[test]
    fn non_critical_appends_when_no_gap_fits() {
        let existing = vec![
            appt("first", at(9, 10), at(9, 30)),
            appt("second", at(9, 30), at(9, 50)),
            appt("third", at(10, 0), at(10, 15)),
        ];
        let result = allocate(&existing, Severity::Concerning, at(9, 0), slot());

        assert_eq!(result.inserted.start, at(10, 15));
        assert_eq!(result.inserted.end, at(10, 35));
        assert_eq!(result.updated, existing);
    }

    #[test]
    fn too_small_gap_is_skipped() {
        // 15-minute gap at 09:05, 20-minute gap after 09:45.
        let existing = vec![
            appt("first", at(9, 20), at(9, 45)),
            appt("second", at(10, 5), at(10, 25)),
        ];
        let result = allocate(&existing, Severity::Mild, at(9, 0), slot());
        assert_eq!(result.inserted.start, at(9, 45));
        assert_eq!(result.inserted.end, at(10, 5));
    }

    #[test]
    fn nothing_is_scheduled_before_the_floor() {
        // A morning appointment already in the past must not pull the
        // new booking before now + lead time.
        let existing = vec![appt("past", at(8, 0), at(8, 20))];
        let result = allocate(&existing, Severity::Minimal, at(11, 40), slot());
        assert_eq!(result.inserted.start, at(11, 45));
        assert_no_overlap(&with_inserted(result));
    }

    #[test]
    fn critical_bumps_existing_appointments() {
        // The documented bump scenario: two back-to-back bookings, a
        // Critical arrival at 09:00 with a 5-minute lead time.
        let existing = vec![
            appt("first", at(9, 10), at(9, 30)),
            appt("second", at(9, 30), at(9, 50)),
        ];
        let result = allocate(&existing, Severity::Critical, at(9, 0), slot());

        assert_eq!(result.inserted.start, at(9, 5));
        assert_eq!(result.inserted.end, at(9, 25));

        assert_eq!(result.updated.len(), 2);
        assert_eq!(result.updated[0].summary, "first");
        assert_eq!(result.updated[0].start, at(9, 25));
        assert_eq!(result.updated[0].end, at(9, 45));
        assert_eq!(result.updated[1].summary, "second");
        assert_eq!(result.updated[1].start, at(9, 45));
        assert_eq!(result.updated[1].end, at(10, 5));
    }

    #[test]
    fn critical_always_takes_the_earliest_slot() {
        let existing = vec![
            appt("a", at(9, 40), at(10, 0)),
            appt("b", at(11, 0), at(11, 45)),
        ];
        let result = allocate(&existing, Severity::Critical, at(9, 0), slot());

        assert_eq!(result.inserted.start, at(9, 5));
        for shifted in &result.updated {
            assert!(result.inserted.start <= shifted.start);
        }
    }

    #[test]
    fn critical_shift_preserves_durations_and_order() {
        let existing = vec![
            appt("short", at(9, 10), at(9, 25)),
            appt("long", at(9, 25), at(10, 10)),
            appt("late", at(14, 0), at(14, 30)),
        ];
        let result = allocate(&existing, Severity::Critical, at(9, 0), slot());

        let summaries: Vec<_> = result.updated.iter().map(|a| a.summary.as_str()).collect();
        assert_eq!(summaries, ["short", "long", "late"]);
        assert_eq!(result.updated[0].duration(), Duration::minutes(15));
        assert_eq!(result.updated[1].duration(), Duration::minutes(45));
        assert_eq!(result.updated[2].duration(), Duration::minutes(30));
        assert_no_overlap(&with_inserted(result));
    }

    #[test]
    fn unsorted_input_is_handled() {
        let existing = vec![
            appt("second", at(10, 40), at(11, 0)),
            appt("first", at(10, 0), at(10, 20)),
        ];
        let result = allocate(&existing, Severity::Moderate, at(9, 0), slot());
        assert_eq!(result.inserted.start, at(10, 20));
        assert_eq!(result.updated[0].summary, "first");
    }

    #[test]
    fn no_overlap_across_severities() {
        let existing = vec![
            appt("a", at(9, 30), at(9, 50)),
            appt("b", at(10, 30), at(10, 50)),
        ];
        for severity in Severity::ALL {
            let result = allocate(&existing, severity, at(9, 0), slot());
            assert_no_overlap(&with_inserted(result));
        }
    }

    #[test]
    fn placement_is_deterministic() {
        let existing = vec![appt("a", at(9, 30), at(9, 50))];
        let first = allocate(&existing, Severity::Moderate, at(9, 0), slot());
        let second = allocate(&existing, Severity::Moderate, at(9, 0), slot());
        assert_eq!(first.inserted.start, second.inserted.start);
        assert_eq!(first.inserted.end, second.inserted.end);
        assert_eq!(first.updated, second.updated);
    }

    #[test]
    fn non_critical_summary_names_the_severity() {
        let result = allocate(&[], Severity::Concerning, at(9, 0), slot());
        assert_eq!(result.inserted.summary, "ER visit (Concerning)");
    }

    fn with_inserted(result: Allocation) -> Vec<Appointment> {
        let mut all = result.updated;
        all.push(result.inserted);
        all
    }
}
