//! Appointment store — single source of truth for the shared timeline.
//!
//! Holds the canonical appointment list in memory and mirrors it into
//! SQLite after every mutation. Both engines read the full list and
//! write back a full replacement (no partial-update API), so there is
//! exactly one logical writer and no partial-write races. A failed
//! database write is logged and swallowed: the in-memory list stays
//! authoritative for the session, and losing persistence must never
//! block scheduling.

use std::path::Path;
use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::{Appointment, Hospital, Severity};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
const SELECTED_HOSPITAL_KEY: &str = "selected_hospital";

pub struct AppointmentStore {
    conn: Connection,
    appointments: Vec<Appointment>,
    selected_hospital: Option<Hospital>,
}

impl AppointmentStore {
    /// Open (creating if needed) the store at `path` and load the
    /// persisted timeline. An empty store is valid — no seed data.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = db::open_database(path)?;
        Self::from_connection(conn)
    }

    /// In-memory store (for testing)
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = db::open_memory_database()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        let appointments = load_appointments(&conn)?;
        let selected_hospital = load_selected_hospital(&conn)?;
        tracing::info!("Appointment store opened: {} appointment(s)", appointments.len());
        Ok(Self {
            conn,
            appointments,
            selected_hospital,
        })
    }

    /// The full canonical list, start-ascending.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Replace the canonical list. Sorts by start, swaps the in-memory
    /// copy, then rewrites the table in one transaction (best-effort).
    pub fn commit(&mut self, mut new_list: Vec<Appointment>) {
        new_list.sort_by_key(|a| a.start);
        if let Err(e) = persist_appointments(&mut self.conn, &new_list) {
            tracing::warn!("Failed to persist appointments, keeping in-memory list: {e}");
        }
        self.appointments = new_list;
    }

    /// The facility the user picked in the map view, if any.
    pub fn selected_hospital(&self) -> Option<&Hospital> {
        self.selected_hospital.as_ref()
    }

    /// Persist the user's facility selection (or clear it).
    pub fn set_selected_hospital(&mut self, hospital: Option<Hospital>) {
        if let Err(e) = persist_selected_hospital(&self.conn, hospital.as_ref()) {
            tracing::warn!("Failed to persist selected hospital: {e}");
        }
        self.selected_hospital = hospital;
    }
}

/// Loads and validates persisted rows. Rows with unreadable timestamps
/// are dropped with a warning; an unknown severity string or a garbled
/// hospital payload degrades to unset rather than failing the load.
fn load_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, summary, description, start_time, end_time, severity, hospital, topic
         FROM appointments ORDER BY start_time",
    )?;

    type Row = (
        String,
        String,
        String,
        String,
        String,
        Option<String>,
        Option<String>,
        Option<String>,
    );
    let rows = stmt.query_map([], |row| {
        Ok::<Row, rusqlite::Error>((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
            row.get(7)?,
        ))
    })?;

    let mut appointments = Vec::new();
    for row in rows {
        let (id, summary, description, start, end, severity, hospital, topic) = row?;

        let start = match chrono::NaiveDateTime::parse_from_str(&start, DATETIME_FMT) {
            Ok(t) => t,
            Err(_) => {
                tracing::warn!("Dropping appointment {id}: unreadable start time {start:?}");
                continue;
            }
        };
        let end = match chrono::NaiveDateTime::parse_from_str(&end, DATETIME_FMT) {
            Ok(t) => t,
            Err(_) => {
                tracing::warn!("Dropping appointment {id}: unreadable end time {end:?}");
                continue;
            }
        };

        let id = Uuid::parse_str(&id).unwrap_or_else(|_| {
            tracing::warn!("Replacing malformed appointment id {id:?}");
            Uuid::new_v4()
        });
        let severity = severity.as_deref().and_then(|s| match Severity::from_str(s) {
            Ok(sev) => Some(sev),
            Err(_) => {
                tracing::warn!("Unknown severity {s:?} on appointment {id}, treating as unset");
                None
            }
        });
        let hospital = hospital.as_deref().and_then(|json| match serde_json::from_str(json) {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::warn!("Unreadable hospital payload on appointment {id}: {e}");
                None
            }
        });

        appointments.push(Appointment {
            id,
            summary,
            description,
            start,
            end,
            severity,
            hospital,
            topic,
        });
    }
    Ok(appointments)
}

fn persist_appointments(
    conn: &mut Connection,
    appointments: &[Appointment],
) -> Result<(), DatabaseError> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM appointments", [])?;
    for a in appointments {
        let hospital = a
            .hospital
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .unwrap_or_else(|e| {
                tracing::warn!("Skipping unserializable hospital on appointment {}: {e}", a.id);
                None
            });
        tx.execute(
            "INSERT INTO appointments (id, summary, description, start_time, end_time, severity, hospital, topic)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                a.id.to_string(),
                a.summary,
                a.description,
                a.start.format(DATETIME_FMT).to_string(),
                a.end.format(DATETIME_FMT).to_string(),
                a.severity.map(|s| s.as_str()),
                hospital,
                a.topic,
            ],
        )?;
    }
    tx.commit()?;
    Ok(())
}

fn load_selected_hospital(conn: &Connection) -> Result<Option<Hospital>, DatabaseError> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![SELECTED_HOSPITAL_KEY],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    Ok(value.and_then(|json| match serde_json::from_str(&json) {
        Ok(h) => Some(h),
        Err(e) => {
            tracing::warn!("Unreadable selected hospital, ignoring: {e}");
            None
        }
    }))
}

fn persist_selected_hospital(
    conn: &Connection,
    hospital: Option<&Hospital>,
) -> Result<(), DatabaseError> {
    match hospital {
        Some(h) => {
            let json = serde_json::to_string(h).map_err(|e| DatabaseError::InvalidEnum {
                field: "hospital".into(),
                value: e.to_string(),
            })?;
            conn.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![SELECTED_HOSPITAL_KEY, json],
            )?;
        }
        None => {
            conn.execute(
                "DELETE FROM settings WHERE key = ?1",
                params![SELECTED_HOSPITAL_KEY],
            )?;
        }
    }
    Ok(())
}
