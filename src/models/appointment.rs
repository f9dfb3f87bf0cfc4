use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Severity;

/// A selected care facility, as delivered by the facility-selection
/// collaborator. Only `name` is guaranteed to be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

/// One slot on the shared appointment timeline.
///
/// `start`/`end` are the only fields the reflow engine may rewrite;
/// everything else is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub severity: Option<Severity>,
    pub hospital: Option<Hospital>,
    pub topic: Option<String>,
}

impl Appointment {
    /// Raw scheduled length. Negative or zero for corrupt rows where
    /// `end <= start`; the scheduling layer substitutes the standard
    /// slot length for those.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open interval check: `[start, end)` — appointments that
    /// only touch do not overlap.
    pub fn overlaps(&self, other: &Appointment) -> bool {
        self.start < other.end && other.start < self.end
    }
}
