//! Person directory domain model.
//!
//! # Responsibility
//! - Define the canonical tenant-scoped person record.
//! - Own the `YYYY-MM-DD` parse boundary for recurring celebration dates.
//! - Provide lifecycle helpers for offboarding tombstone semantics.
//!
//! # Invariants
//! - `id` is stable and never reused for another person.
//! - `status` is the source of truth for offboarded state.
//! - A `RecurringDate` value always holds a month in 1..=12 and a day that
//!   exists in that month (Feb 29 included).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every person in the directory.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PersonId = Uuid;

/// Identifier of the company a person record is scoped to.
pub type TenantId = Uuid;

const MAX_DISPLAY_LABEL_CHARS: usize = 200;

/// Day counts per month, leap-permissive: Feb 29 is a storable recurring
/// date even though it only materializes in leap years.
const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

static RECURRING_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid recurring date regex"));

/// Parse/validation error for recurring date input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurringDateError {
    /// Input does not match the `YYYY-MM-DD` shape.
    InvalidFormat(String),
    /// Month component outside 1..=12.
    MonthOutOfRange(u32),
    /// Day component does not exist in the given month.
    DayOutOfRange { month: u32, day: u32 },
}

impl Display for RecurringDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat(value) => {
                write!(f, "recurring date `{value}` is not in YYYY-MM-DD form")
            }
            Self::MonthOutOfRange(month) => write!(f, "month {month} is outside 1..=12"),
            Self::DayOutOfRange { month, day } => {
                write!(f, "day {day} does not exist in month {month}")
            }
        }
    }
}

impl Error for RecurringDateError {}

/// An annually repeating month/day pair, year already discarded.
///
/// This is the fail-fast boundary for celebration dates: construction
/// validates, so downstream projection code never sees a malformed value.
/// Deserialization routes through the same validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecurringDateParts")]
pub struct RecurringDate {
    month: u32,
    day: u32,
}

#[derive(Deserialize)]
struct RecurringDateParts {
    month: u32,
    day: u32,
}

impl TryFrom<RecurringDateParts> for RecurringDate {
    type Error = RecurringDateError;

    fn try_from(parts: RecurringDateParts) -> Result<Self, Self::Error> {
        Self::from_month_day(parts.month, parts.day)
    }
}

impl RecurringDate {
    /// Builds a recurring date from already-split components.
    ///
    /// # Errors
    /// - `MonthOutOfRange` when `month` is not in 1..=12.
    /// - `DayOutOfRange` when `day` does not exist in `month` (Feb 29 is
    ///   accepted; its projection is clamped per [`Self::resolve_in_year`]).
    pub fn from_month_day(month: u32, day: u32) -> Result<Self, RecurringDateError> {
        if !(1..=12).contains(&month) {
            return Err(RecurringDateError::MonthOutOfRange(month));
        }
        let max_day = DAYS_IN_MONTH[(month - 1) as usize];
        if day == 0 || day > max_day {
            return Err(RecurringDateError::DayOutOfRange { month, day });
        }
        Ok(Self { month, day })
    }

    /// Parses `YYYY-MM-DD` input, reading and discarding the year segment.
    ///
    /// # Errors
    /// - `InvalidFormat` when the input does not match the expected shape.
    /// - Range errors from [`Self::from_month_day`].
    pub fn parse(input: &str) -> Result<Self, RecurringDateError> {
        let captures = RECURRING_DATE_RE
            .captures(input.trim())
            .ok_or_else(|| RecurringDateError::InvalidFormat(input.to_string()))?;

        let month: u32 = captures[2]
            .parse()
            .map_err(|_| RecurringDateError::InvalidFormat(input.to_string()))?;
        let day: u32 = captures[3]
            .parse()
            .map_err(|_| RecurringDateError::InvalidFormat(input.to_string()))?;

        Self::from_month_day(month, day)
    }

    /// Month component, 1-indexed.
    pub fn month(self) -> u32 {
        self.month
    }

    /// Day-of-month component, 1-indexed.
    pub fn day(self) -> u32 {
        self.day
    }

    /// Resolves this recurring date to a concrete date in `year`.
    ///
    /// Feb 29 clamps to Feb 28 when `year` is not a leap year, keeping the
    /// occurrence inside the month the record names.
    pub fn resolve_in_year(self, year: i32) -> NaiveDate {
        match NaiveDate::from_ymd_opt(year, self.month, self.day) {
            Some(date) => date,
            None => NaiveDate::from_ymd_opt(year, 2, 28).expect("Feb 28 exists in every year"),
        }
    }
}

/// Directory lifecycle state for a person record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonStatus {
    /// Placeholder created by an admin; account not yet claimed.
    Invited,
    /// Claimed, visible everywhere.
    Active,
    /// Tombstoned by offboarding; kept for history, hidden by default.
    Offboarded,
}

/// Validation error for person record fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    EmptyDisplayLabel,
    DisplayLabelTooLong { chars: usize, max: usize },
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDisplayLabel => write!(f, "display label cannot be empty"),
            Self::DisplayLabelTooLong { chars, max } => {
                write!(f, "display label has {chars} chars, max is {max}")
            }
        }
    }
}

impl Error for PersonValidationError {}

/// Canonical tenant-scoped person record.
///
/// Celebration dates are optional because both are user-supplied profile
/// fields; records without them simply contribute no events to feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Stable global ID used for linking and auditing.
    pub id: PersonId,
    /// Company scoping key; feeds and listings never cross tenants.
    pub tenant_id: TenantId,
    /// Human-readable name, or an email fallback for invited placeholders.
    pub display_label: String,
    /// Annually repeating birthday, year ignored.
    pub birthday: Option<RecurringDate>,
    /// Annually repeating work anniversary, year ignored.
    pub anniversary: Option<RecurringDate>,
    /// Directory lifecycle state.
    pub status: PersonStatus,
}

impl PersonRecord {
    /// Creates a record with a generated stable ID and `Invited` status.
    ///
    /// # Errors
    /// Returns a validation error for an empty or oversized display label.
    pub fn new(
        tenant_id: TenantId,
        display_label: impl Into<String>,
    ) -> Result<Self, PersonValidationError> {
        Self::with_id(Uuid::new_v4(), tenant_id, display_label)
    }

    /// Creates a record with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: PersonId,
        tenant_id: TenantId,
        display_label: impl Into<String>,
    ) -> Result<Self, PersonValidationError> {
        let record = Self {
            id,
            tenant_id,
            display_label: display_label.into(),
            birthday: None,
            anniversary: None,
            status: PersonStatus::Invited,
        };
        record.validate()?;
        Ok(record)
    }

    /// Checks field-level invariants.
    ///
    /// Write paths in the repository call this before any SQL mutation.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.display_label.trim().is_empty() {
            return Err(PersonValidationError::EmptyDisplayLabel);
        }
        let chars = self.display_label.chars().count();
        if chars > MAX_DISPLAY_LABEL_CHARS {
            return Err(PersonValidationError::DisplayLabelTooLong {
                chars,
                max: MAX_DISPLAY_LABEL_CHARS,
            });
        }
        Ok(())
    }

    /// Marks this person as offboarded (tombstoned).
    pub fn offboard(&mut self) {
        self.status = PersonStatus::Offboarded;
    }

    /// Flips an invited placeholder to an active account.
    pub fn activate(&mut self) {
        self.status = PersonStatus::Active;
    }

    /// Returns whether this person should appear in default listings.
    pub fn is_onboard(&self) -> bool {
        self.status != PersonStatus::Offboarded
    }
}
