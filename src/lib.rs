//! Medway — a private, locally-run patient-triage companion engine.
//!
//! An external language model classifies symptom severity; this crate
//! books the resulting visit on a single shared appointment timeline
//! and keeps that timeline consistent: non-overlapping slots, critical
//! cases first, durations preserved across reflows. The UI, the triage
//! prompt handling, and every network proxy live outside this crate
//! and talk to it through plain function calls.

pub mod agenda;
pub mod config;
pub mod db;
pub mod models;
pub mod scheduling;
pub mod store;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for an embedding shell. Call once at startup.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
