//! Recurring-event projection engine.
//!
//! # Responsibility
//! - Project a stored month/day onto its nearest non-past occurrence.
//! - Rank a directory's upcoming celebrations chronologically.
//!
//! # Invariants
//! - Pure functions of their arguments; no clock reads, no I/O.
//! - All comparison happens at calendar-date granularity. Time-of-day is
//!   truncated away before values reach this module (`date_naive()` at the
//!   caller boundary), so DST shifts cannot skew day counts.

use crate::model::celebration::{Celebration, CelebrationKind};
use crate::model::person::{PersonRecord, RecurringDate};
use chrono::{Datelike, NaiveDate};

/// Resolves a recurring date to its next occurrence on or after `today`.
///
/// The candidate is built in `today`'s year; if that already passed, it is
/// rebuilt in the following year. An occurrence falling exactly on `today`
/// is not advanced: the celebration is today.
pub fn project_next_occurrence(recurring: RecurringDate, today: NaiveDate) -> NaiveDate {
    let this_year = recurring.resolve_in_year(today.year());
    if this_year < today {
        recurring.resolve_in_year(today.year() + 1)
    } else {
        this_year
    }
}

/// Signed whole-day count from `a` to `b`.
///
/// Zero when both name the same calendar day, positive when `b` is later,
/// negative when earlier. Exactly antisymmetric:
/// `days_between(a, b) == -days_between(b, a)`.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

/// Projects every present recurring date across `people` and returns the
/// events sorted soonest-first.
///
/// Each person contributes 0, 1 or 2 events depending on which profile
/// dates are set; duplicates in the input stay independent events. Ties on
/// `days_until` keep input order (stable sort). No window filtering happens
/// here; "next N days" and "today only" views are applied by callers.
pub fn collect_upcoming_events<'a>(
    people: &'a [PersonRecord],
    today: NaiveDate,
) -> Vec<Celebration<'a>> {
    let mut events = Vec::new();

    for person in people {
        if let Some(birthday) = person.birthday {
            events.push(project_event(CelebrationKind::Birthday, person, birthday, today));
        }
        if let Some(anniversary) = person.anniversary {
            events.push(project_event(
                CelebrationKind::Anniversary,
                person,
                anniversary,
                today,
            ));
        }
    }

    events.sort_by_key(|event| event.days_until);
    events
}

/// Month-name rendering used for banners, e.g. `June 15`.
pub fn format_occurrence(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

fn project_event<'a>(
    kind: CelebrationKind,
    person: &'a PersonRecord,
    recurring: RecurringDate,
    today: NaiveDate,
) -> Celebration<'a> {
    let occurs_on = project_next_occurrence(recurring, today);
    Celebration {
        kind,
        subject: person,
        occurs_on,
        days_until: days_between(today, occurs_on),
        display_text: format_occurrence(occurs_on),
    }
}
