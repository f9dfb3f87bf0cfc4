use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Triage urgency, ordered least to most urgent. Variant order carries
/// the ordering: `Minimal < Mild < Moderate < Concerning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Minimal,
    Mild,
    Moderate,
    Concerning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "Minimal",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Concerning => "Concerning",
            Self::Critical => "Critical",
        }
    }

    /// Critical is the only level that bumps existing appointments.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Critical)
    }

    pub const ALL: [Severity; 5] = [
        Self::Minimal,
        Self::Mild,
        Self::Moderate,
        Self::Concerning,
        Self::Critical,
    ];
}

impl std::str::FromStr for Severity {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Minimal" => Ok(Self::Minimal),
            "Mild" => Ok(Self::Mild),
            "Moderate" => Ok(Self::Moderate),
            "Concerning" => Ok(Self::Concerning),
            "Critical" => Ok(Self::Critical),
            _ => Err(DatabaseError::InvalidEnum {
                field: "Severity".into(),
                value: s.into(),
            }),
        }
    }
}
