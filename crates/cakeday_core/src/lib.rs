//! Core domain logic for Cakeday.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use engine::recurrence::{
    collect_upcoming_events, days_between, format_occurrence, project_next_occurrence,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::celebration::{Celebration, CelebrationKind};
pub use model::person::{
    PersonId, PersonRecord, PersonStatus, PersonValidationError, RecurringDate,
    RecurringDateError, TenantId,
};
pub use repo::person_repo::{
    PersonListQuery, PersonRepository, RepoError, RepoResult, SqlitePersonRepository,
};
pub use service::celebration_service::{CelebrationFeedEntry, CelebrationService};
pub use service::directory_service::{
    DirectoryService, DirectoryServiceError, ImportOutcome, ImportPersonRow, ImportRejection,
    OnboardPersonRequest,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
