//! People directory use-case service.
//!
//! # Responsibility
//! - Provide onboarding/offboarding entry points for core callers.
//! - Parse raw `YYYY-MM-DD` celebration dates at the ingestion boundary.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Batch import tolerates per-record failures: one bad record never
//!   aborts the batch.

use crate::model::person::{
    PersonId, PersonRecord, PersonValidationError, RecurringDate, RecurringDateError, TenantId,
};
use crate::repo::person_repo::{PersonListQuery, PersonRepository, RepoError, RepoResult};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for directory use-cases.
#[derive(Debug)]
pub enum DirectoryServiceError {
    /// A celebration date string failed to parse.
    InvalidRecurringDate {
        field: &'static str,
        source: RecurringDateError,
    },
    /// Person record fields failed validation.
    InvalidPerson(PersonValidationError),
    /// Target person does not exist or is offboarded.
    PersonNotFound(PersonId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for DirectoryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRecurringDate { field, source } => {
                write!(f, "invalid {field}: {source}")
            }
            Self::InvalidPerson(err) => write!(f, "{err}"),
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DirectoryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRecurringDate { source, .. } => Some(source),
            Self::InvalidPerson(err) => Some(err),
            Self::PersonNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for DirectoryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::PersonNotFound(id),
            RepoError::Validation(err) => Self::InvalidPerson(err),
            other => Self::Repo(other),
        }
    }
}

impl From<PersonValidationError> for DirectoryServiceError {
    fn from(value: PersonValidationError) -> Self {
        Self::InvalidPerson(value)
    }
}

/// Request model for onboarding one person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardPersonRequest {
    pub tenant_id: TenantId,
    pub display_label: String,
    /// Raw `YYYY-MM-DD` input; year is read and discarded.
    pub birthday: Option<String>,
    /// Raw `YYYY-MM-DD` input; year is read and discarded.
    pub anniversary: Option<String>,
}

/// One raw row of a bulk directory import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPersonRow {
    pub tenant_id: TenantId,
    pub display_label: String,
    pub birthday: Option<String>,
    pub anniversary: Option<String>,
}

/// A rejected import row with its position and human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRejection {
    pub row_index: usize,
    pub display_label: String,
    pub reason: String,
}

/// Result of a bulk import: accepted IDs plus per-row rejections.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub created: Vec<PersonId>,
    pub rejected: Vec<ImportRejection>,
}

/// Use-case service wrapper for directory operations.
pub struct DirectoryService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> DirectoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Onboards one person as an invited placeholder.
    ///
    /// # Contract
    /// - Date strings are parsed fail-fast; a malformed date rejects the
    ///   request before any write happens.
    /// - Returns the created stable person ID.
    pub fn onboard_person(
        &self,
        request: &OnboardPersonRequest,
    ) -> Result<PersonId, DirectoryServiceError> {
        let birthday = parse_optional_date(request.birthday.as_deref(), "birthday")?;
        let anniversary = parse_optional_date(request.anniversary.as_deref(), "anniversary")?;

        let mut person = PersonRecord::new(request.tenant_id, request.display_label.clone())?;
        person.birthday = birthday;
        person.anniversary = anniversary;

        Ok(self.repo.create_person(&person)?)
    }

    /// Flips an invited placeholder to an active account.
    pub fn activate_person(&self, id: PersonId) -> Result<(), DirectoryServiceError> {
        let mut person = self
            .repo
            .get_person(id, false)?
            .ok_or(DirectoryServiceError::PersonNotFound(id))?;

        person.activate();
        self.repo.update_person(&person)?;
        Ok(())
    }

    /// Updates an existing person record by stable ID.
    pub fn update_person(&self, person: &PersonRecord) -> Result<(), DirectoryServiceError> {
        self.repo.update_person(person)?;
        Ok(())
    }

    /// Gets one person by ID with optional offboarded-row visibility.
    pub fn get_person(
        &self,
        id: PersonId,
        include_offboarded: bool,
    ) -> RepoResult<Option<PersonRecord>> {
        self.repo.get_person(id, include_offboarded)
    }

    /// Lists people using filter and pagination options.
    pub fn list_people(&self, query: &PersonListQuery) -> RepoResult<Vec<PersonRecord>> {
        self.repo.list_people(query)
    }

    /// Tombstones a person by ID.
    pub fn offboard_person(&self, id: PersonId) -> Result<(), DirectoryServiceError> {
        self.repo.offboard_person(id)?;
        Ok(())
    }

    /// Bulk-ingests raw directory rows.
    ///
    /// # Contract
    /// - Rows with malformed dates or invalid fields are skipped, logged
    ///   and reported in the outcome; remaining rows still import.
    /// - Infrastructure failures (DB transport) abort the whole batch.
    pub fn import(&self, rows: &[ImportPersonRow]) -> Result<ImportOutcome, DirectoryServiceError> {
        let mut outcome = ImportOutcome::default();

        for (row_index, row) in rows.iter().enumerate() {
            match self.import_row(row) {
                Ok(id) => outcome.created.push(id),
                Err(rejection @ (DirectoryServiceError::InvalidRecurringDate { .. }
                | DirectoryServiceError::InvalidPerson(_))) => {
                    warn!(
                        "event=directory_import module=service status=skipped row_index={row_index} reason={rejection}"
                    );
                    outcome.rejected.push(ImportRejection {
                        row_index,
                        display_label: row.display_label.clone(),
                        reason: rejection.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        Ok(outcome)
    }

    fn import_row(&self, row: &ImportPersonRow) -> Result<PersonId, DirectoryServiceError> {
        let birthday = parse_optional_date(row.birthday.as_deref(), "birthday")?;
        let anniversary = parse_optional_date(row.anniversary.as_deref(), "anniversary")?;

        let mut person = PersonRecord::new(row.tenant_id, row.display_label.clone())?;
        person.birthday = birthday;
        person.anniversary = anniversary;

        Ok(self.repo.create_person(&person)?)
    }
}

fn parse_optional_date(
    input: Option<&str>,
    field: &'static str,
) -> Result<Option<RecurringDate>, DirectoryServiceError> {
    input
        .map(|raw| {
            RecurringDate::parse(raw)
                .map_err(|source| DirectoryServiceError::InvalidRecurringDate { field, source })
        })
        .transpose()
}
