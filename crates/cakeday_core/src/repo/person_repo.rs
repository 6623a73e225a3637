//! Person repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the canonical `people` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `PersonRecord::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Listings never mix tenants when a tenant filter is set.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::person::{
    PersonId, PersonRecord, PersonStatus, PersonValidationError, RecurringDate, TenantId,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    tenant_id,
    display_label,
    birthday_month,
    birthday_day,
    anniversary_month,
    anniversary_day,
    status
FROM people";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "tenant_id",
    "display_label",
    "birthday_month",
    "birthday_day",
    "anniversary_month",
    "anniversary_day",
    "status",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for person persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    Db(DbError),
    NotFound(PersonId),
    InvalidData(String),
    /// Connection has no applied schema (`PRAGMA user_version` is 0).
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted person data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version is {actual_version}, expected {expected_version}; \
                 open connections through `db::open_db`"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing people.
#[derive(Debug, Clone, Default)]
pub struct PersonListQuery {
    /// Restrict to one tenant; `None` lists across tenants (admin tooling).
    pub tenant: Option<TenantId>,
    pub include_offboarded: bool,
    /// Case-insensitive substring match on `display_label`.
    pub label_contains: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for person CRUD operations.
pub trait PersonRepository {
    fn create_person(&self, person: &PersonRecord) -> RepoResult<PersonId>;
    fn update_person(&self, person: &PersonRecord) -> RepoResult<()>;
    fn get_person(&self, id: PersonId, include_offboarded: bool) -> RepoResult<Option<PersonRecord>>;
    fn list_people(&self, query: &PersonListQuery) -> RepoResult<Vec<PersonRecord>>;
    fn offboard_person(&self, id: PersonId) -> RepoResult<()>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Wraps a connection after verifying the schema it carries.
    ///
    /// # Errors
    /// - `UninitializedConnection` when no migrations were applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what this binary expects.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version == 0 {
            return Err(RepoError::UninitializedConnection {
                expected_version: latest_version(),
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'people'
             );",
            [],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(RepoError::MissingRequiredTable("people"));
        }

        let mut stmt = conn.prepare("PRAGMA table_info(people);")?;
        let mut rows = stmt.query([])?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            columns.push(row.get::<_, String>("name")?);
        }
        for &required in REQUIRED_COLUMNS {
            if !columns.iter().any(|column| column.as_str() == required) {
                return Err(RepoError::MissingRequiredColumn {
                    table: "people",
                    column: required,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, person: &PersonRecord) -> RepoResult<PersonId> {
        person.validate()?;

        self.conn.execute(
            "INSERT INTO people (
                id,
                tenant_id,
                display_label,
                birthday_month,
                birthday_day,
                anniversary_month,
                anniversary_day,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                person.id.to_string(),
                person.tenant_id.to_string(),
                person.display_label.as_str(),
                person.birthday.map(RecurringDate::month),
                person.birthday.map(RecurringDate::day),
                person.anniversary.map(RecurringDate::month),
                person.anniversary.map(RecurringDate::day),
                status_to_db(person.status),
            ],
        )?;

        Ok(person.id)
    }

    fn update_person(&self, person: &PersonRecord) -> RepoResult<()> {
        person.validate()?;

        let changed = self.conn.execute(
            "UPDATE people
             SET
                tenant_id = ?1,
                display_label = ?2,
                birthday_month = ?3,
                birthday_day = ?4,
                anniversary_month = ?5,
                anniversary_day = ?6,
                status = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?8;",
            params![
                person.tenant_id.to_string(),
                person.display_label.as_str(),
                person.birthday.map(RecurringDate::month),
                person.birthday.map(RecurringDate::day),
                person.anniversary.map(RecurringDate::month),
                person.anniversary.map(RecurringDate::day),
                status_to_db(person.status),
                person.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(person.id));
        }

        Ok(())
    }

    fn get_person(&self, id: PersonId, include_offboarded: bool) -> RepoResult<Option<PersonRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 1 OR status != 'offboarded');"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_offboarded)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn list_people(&self, query: &PersonListQuery) -> RepoResult<Vec<PersonRecord>> {
        let mut sql = format!("{PERSON_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_offboarded {
            sql.push_str(" AND status != 'offboarded'");
        }

        if let Some(tenant) = query.tenant {
            sql.push_str(" AND tenant_id = ?");
            bind_values.push(Value::Text(tenant.to_string()));
        }

        if let Some(needle) = query.label_contains.as_deref() {
            sql.push_str(" AND instr(lower(display_label), lower(?)) > 0");
            bind_values.push(Value::Text(needle.to_string()));
        }

        sql.push_str(" ORDER BY display_label COLLATE NOCASE ASC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut people = Vec::new();

        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }

    fn offboard_person(&self, id: PersonId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE people
             SET
                status = 'offboarded',
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<PersonRecord> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{id_text}` in people.id")))?;

    let tenant_text: String = row.get("tenant_id")?;
    let tenant_id = Uuid::parse_str(&tenant_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid `{tenant_text}` in people.tenant_id"))
    })?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in people.status"))
    })?;

    let birthday = parse_recurring_columns(row, "birthday_month", "birthday_day")?;
    let anniversary = parse_recurring_columns(row, "anniversary_month", "anniversary_day")?;

    let person = PersonRecord {
        id,
        tenant_id,
        display_label: row.get("display_label")?,
        birthday,
        anniversary,
        status,
    };
    person.validate()?;
    Ok(person)
}

/// Month/day columns travel as a pair: both set or both null.
fn parse_recurring_columns(
    row: &Row<'_>,
    month_column: &'static str,
    day_column: &'static str,
) -> RepoResult<Option<RecurringDate>> {
    let month: Option<u32> = row.get(month_column)?;
    let day: Option<u32> = row.get(day_column)?;

    match (month, day) {
        (None, None) => Ok(None),
        (Some(month), Some(day)) => RecurringDate::from_month_day(month, day)
            .map(Some)
            .map_err(|err| {
                RepoError::InvalidData(format!(
                    "invalid recurring date in people.{month_column}/{day_column}: {err}"
                ))
            }),
        _ => Err(RepoError::InvalidData(format!(
            "people.{month_column}/{day_column} must be set together"
        ))),
    }
}

fn status_to_db(status: PersonStatus) -> &'static str {
    match status {
        PersonStatus::Invited => "invited",
        PersonStatus::Active => "active",
        PersonStatus::Offboarded => "offboarded",
    }
}

fn parse_status(value: &str) -> Option<PersonStatus> {
    match value {
        "invited" => Some(PersonStatus::Invited),
        "active" => Some(PersonStatus::Active),
        "offboarded" => Some(PersonStatus::Offboarded),
        _ => None,
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
