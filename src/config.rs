use std::path::PathBuf;

use chrono::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Medway";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum buffer between "now" and the earliest schedulable start.
pub const LEAD_TIME_MINUTES: i64 = 5;

/// Standard slot length for a triage booking. Also the fallback
/// duration substituted for corrupt rows where `end <= start`.
pub const SLOT_MINUTES: i64 = 20;

pub fn lead_time() -> Duration {
    Duration::minutes(LEAD_TIME_MINUTES)
}

pub fn slot_duration() -> Duration {
    Duration::minutes(SLOT_MINUTES)
}

/// Default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Medway/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Medway")
}

/// Get the appointment database path
pub fn database_path() -> PathBuf {
    app_data_dir().join("medway.db")
}
