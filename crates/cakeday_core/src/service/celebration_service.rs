//! Celebration feed use-case service.
//!
//! # Responsibility
//! - Load a tenant's people and run the recurrence engine over them.
//! - Apply the caller-side windows the product surfaces ("next N days",
//!   "today").
//!
//! # Invariants
//! - Offboarded people never contribute events.
//! - This is the only module that reads the wall clock; it truncates to a
//!   calendar date before anything reaches the engine.

use crate::engine::recurrence::collect_upcoming_events;
use crate::model::celebration::{Celebration, CelebrationKind};
use crate::model::person::{PersonId, TenantId};
use crate::repo::person_repo::{PersonListQuery, PersonRepository, RepoResult};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Owned feed entry for callers that outlive the people slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelebrationFeedEntry {
    pub kind: CelebrationKind,
    pub person_id: PersonId,
    pub display_label: String,
    pub occurs_on: NaiveDate,
    pub days_until: i64,
    pub display_text: String,
}

impl CelebrationFeedEntry {
    fn from_celebration(event: &Celebration<'_>) -> Self {
        Self {
            kind: event.kind,
            person_id: event.subject.id,
            display_label: event.subject.display_label.clone(),
            occurs_on: event.occurs_on,
            days_until: event.days_until,
            display_text: event.display_text.clone(),
        }
    }
}

/// Use-case service producing celebration feeds for one tenant at a time.
pub struct CelebrationService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> CelebrationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Full sorted feed for a tenant relative to `today`, soonest first.
    pub fn upcoming_feed(
        &self,
        tenant: TenantId,
        today: NaiveDate,
    ) -> RepoResult<Vec<CelebrationFeedEntry>> {
        let people = self.repo.list_people(&PersonListQuery {
            tenant: Some(tenant),
            ..PersonListQuery::default()
        })?;

        Ok(collect_upcoming_events(&people, today)
            .iter()
            .map(CelebrationFeedEntry::from_celebration)
            .collect())
    }

    /// Feed restricted to events within the next `days` days, inclusive of
    /// today and of the window edge.
    pub fn upcoming_within(
        &self,
        tenant: TenantId,
        today: NaiveDate,
        days: i64,
    ) -> RepoResult<Vec<CelebrationFeedEntry>> {
        let mut feed = self.upcoming_feed(tenant, today)?;
        feed.retain(|entry| (0..=days).contains(&entry.days_until));
        Ok(feed)
    }

    /// Events occurring exactly on `today`.
    pub fn celebrations_today(
        &self,
        tenant: TenantId,
        today: NaiveDate,
    ) -> RepoResult<Vec<CelebrationFeedEntry>> {
        self.upcoming_within(tenant, today, 0)
    }

    /// Full feed relative to the local wall clock.
    ///
    /// Wall-clock time is truncated to a calendar date here, at the
    /// boundary; the engine never sees time-of-day.
    pub fn upcoming_feed_now(&self, tenant: TenantId) -> RepoResult<Vec<CelebrationFeedEntry>> {
        self.upcoming_feed(tenant, Local::now().date_naive())
    }
}
