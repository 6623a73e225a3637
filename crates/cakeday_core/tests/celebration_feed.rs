use cakeday_core::db::open_db_in_memory;
use cakeday_core::{
    CelebrationKind, CelebrationService, DirectoryService, DirectoryServiceError, ImportPersonRow,
    OnboardPersonRequest, PersonListQuery, PersonStatus, SqlitePersonRepository, TenantId,
};
use chrono::NaiveDate;
use uuid::Uuid;

fn tenant_a() -> TenantId {
    Uuid::parse_str("aaaaaaaa-0000-4000-8000-000000000001").unwrap()
}

fn tenant_b() -> TenantId {
    Uuid::parse_str("bbbbbbbb-0000-4000-8000-000000000002").unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn onboard(
    service: &DirectoryService<SqlitePersonRepository<'_>>,
    tenant: TenantId,
    label: &str,
    birthday: Option<&str>,
    anniversary: Option<&str>,
) -> Uuid {
    service
        .onboard_person(&OnboardPersonRequest {
            tenant_id: tenant,
            display_label: label.to_string(),
            birthday: birthday.map(str::to_string),
            anniversary: anniversary.map(str::to_string),
        })
        .unwrap()
}

#[test]
fn feed_is_sorted_and_scoped_to_tenant() {
    let conn = open_db_in_memory().unwrap();
    let directory = DirectoryService::new(SqlitePersonRepository::try_new(&conn).unwrap());
    let celebrations = CelebrationService::new(SqlitePersonRepository::try_new(&conn).unwrap());

    onboard(&directory, tenant_a(), "Later", Some("1990-03-30"), None);
    onboard(&directory, tenant_a(), "Today", Some("1985-03-10"), None);
    onboard(&directory, tenant_b(), "Other Tenant", Some("1991-03-11"), None);

    let feed = celebrations.upcoming_feed(tenant_a(), date(2025, 3, 10)).unwrap();

    let labels: Vec<&str> = feed.iter().map(|entry| entry.display_label.as_str()).collect();
    assert_eq!(labels, vec!["Today", "Later"]);
    assert_eq!(feed[0].days_until, 0);
    assert_eq!(feed[1].days_until, 20);
    assert_eq!(feed[0].display_text, "March 10");
}

#[test]
fn feed_emits_both_kinds_for_one_person() {
    let conn = open_db_in_memory().unwrap();
    let directory = DirectoryService::new(SqlitePersonRepository::try_new(&conn).unwrap());
    let celebrations = CelebrationService::new(SqlitePersonRepository::try_new(&conn).unwrap());

    let id = onboard(
        &directory,
        tenant_a(),
        "Both Dates",
        Some("1990-04-01"),
        Some("2018-03-15"),
    );

    let feed = celebrations.upcoming_feed(tenant_a(), date(2025, 3, 10)).unwrap();

    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].kind, CelebrationKind::Anniversary);
    assert_eq!(feed[1].kind, CelebrationKind::Birthday);
    assert!(feed.iter().all(|entry| entry.person_id == id));
}

#[test]
fn window_filters_are_inclusive() {
    let conn = open_db_in_memory().unwrap();
    let directory = DirectoryService::new(SqlitePersonRepository::try_new(&conn).unwrap());
    let celebrations = CelebrationService::new(SqlitePersonRepository::try_new(&conn).unwrap());

    onboard(&directory, tenant_a(), "Today", Some("1990-03-10"), None);
    onboard(&directory, tenant_a(), "Edge", Some("1990-03-20"), None);
    onboard(&directory, tenant_a(), "Outside", Some("1990-03-21"), None);

    let today = date(2025, 3, 10);

    let window = celebrations.upcoming_within(tenant_a(), today, 10).unwrap();
    let labels: Vec<&str> = window.iter().map(|entry| entry.display_label.as_str()).collect();
    assert_eq!(labels, vec!["Today", "Edge"]);

    let today_only = celebrations.celebrations_today(tenant_a(), today).unwrap();
    assert_eq!(today_only.len(), 1);
    assert_eq!(today_only[0].display_label, "Today");
}

#[test]
fn offboarded_people_disappear_from_feeds() {
    let conn = open_db_in_memory().unwrap();
    let directory = DirectoryService::new(SqlitePersonRepository::try_new(&conn).unwrap());
    let celebrations = CelebrationService::new(SqlitePersonRepository::try_new(&conn).unwrap());

    let staying = onboard(&directory, tenant_a(), "Staying", Some("1990-03-12"), None);
    let leaving = onboard(&directory, tenant_a(), "Leaving", Some("1990-03-11"), None);

    directory.offboard_person(leaving).unwrap();

    let feed = celebrations.upcoming_feed(tenant_a(), date(2025, 3, 10)).unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].person_id, staying);
}

#[test]
fn onboard_rejects_malformed_dates_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let directory = DirectoryService::new(SqlitePersonRepository::try_new(&conn).unwrap());

    let err = directory
        .onboard_person(&OnboardPersonRequest {
            tenant_id: tenant_a(),
            display_label: "Bad Date".to_string(),
            birthday: Some("15/06/1990".to_string()),
            anniversary: None,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        DirectoryServiceError::InvalidRecurringDate { field: "birthday", .. }
    ));

    let people = directory.list_people(&PersonListQuery::default()).unwrap();
    assert!(people.is_empty());
}

#[test]
fn activate_person_flips_invited_to_active() {
    let conn = open_db_in_memory().unwrap();
    let directory = DirectoryService::new(SqlitePersonRepository::try_new(&conn).unwrap());

    let id = onboard(&directory, tenant_a(), "New Hire", None, None);
    assert_eq!(
        directory.get_person(id, false).unwrap().unwrap().status,
        PersonStatus::Invited
    );

    directory.activate_person(id).unwrap();
    assert_eq!(
        directory.get_person(id, false).unwrap().unwrap().status,
        PersonStatus::Active
    );
}

#[test]
fn import_skips_bad_rows_and_keeps_good_ones() {
    let conn = open_db_in_memory().unwrap();
    let directory = DirectoryService::new(SqlitePersonRepository::try_new(&conn).unwrap());

    let rows = vec![
        ImportPersonRow {
            tenant_id: tenant_a(),
            display_label: "Good One".to_string(),
            birthday: Some("1990-06-15".to_string()),
            anniversary: None,
        },
        ImportPersonRow {
            tenant_id: tenant_a(),
            display_label: "Bad Date".to_string(),
            birthday: Some("1990-13-01".to_string()),
            anniversary: None,
        },
        ImportPersonRow {
            tenant_id: tenant_a(),
            display_label: "  ".to_string(),
            birthday: None,
            anniversary: None,
        },
        ImportPersonRow {
            tenant_id: tenant_a(),
            display_label: "Good Two".to_string(),
            birthday: None,
            anniversary: Some("2020-01-05".to_string()),
        },
    ];

    let outcome = directory.import(&rows).unwrap();

    assert_eq!(outcome.created.len(), 2);
    assert_eq!(outcome.rejected.len(), 2);
    assert_eq!(outcome.rejected[0].row_index, 1);
    assert!(outcome.rejected[0].reason.contains("month"));
    assert_eq!(outcome.rejected[1].row_index, 2);

    let people = directory.list_people(&PersonListQuery::default()).unwrap();
    let labels: Vec<&str> = people.iter().map(|p| p.display_label.as_str()).collect();
    assert_eq!(labels, vec!["Good One", "Good Two"]);
}
