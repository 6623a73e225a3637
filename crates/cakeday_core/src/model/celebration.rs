//! Projected celebration events.
//!
//! # Responsibility
//! - Define the ephemeral event shape produced by the recurrence engine.
//!
//! # Invariants
//! - Events are recomputed per invocation and never persisted.
//! - `subject` borrows the person record it was derived from.

use crate::model::person::PersonRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which recurring profile field an event was projected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CelebrationKind {
    Birthday,
    Anniversary,
}

/// A single upcoming celebration, projected onto a concrete date.
///
/// Borrowed view over the input people slice; callers that need to hold
/// events past the borrow map them into owned feed entries at the service
/// layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Celebration<'a> {
    pub kind: CelebrationKind,
    /// The person this event was derived from.
    pub subject: &'a PersonRecord,
    /// Next occurrence, this year or next.
    pub occurs_on: NaiveDate,
    /// Whole days from the reference date to `occurs_on`; 0 means today.
    pub days_until: i64,
    /// Month-name rendering of `occurs_on` for banners and lists.
    pub display_text: String,
}
