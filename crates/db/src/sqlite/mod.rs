//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub mod login_log;
pub mod pool;
pub mod stories;
pub mod users;

pub use pool::SqliteDb;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::DbResult;

/// Zeitstempel als Text mit fester Breite, damit die Sortierung per
/// `ORDER BY` der zeitlichen Reihenfolge entspricht
pub(crate) fn zeit_text(zeit: DateTime<Utc>) -> String {
    zeit.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn zeit_parsen(row: &sqlx::sqlite::SqliteRow, spalte: &str) -> DbResult<DateTime<Utc>> {
    let text: String = row.try_get(spalte)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::intern(format!("Ungueltiger Zeitstempel {spalte} '{text}': {e}")))
}

pub(crate) fn uuid_parsen(row: &sqlx::sqlite::SqliteRow, spalte: &str) -> DbResult<Uuid> {
    let text: String = row.try_get(spalte)?;
    Uuid::parse_str(&text)
        .map_err(|e| DbError::intern(format!("Ungueltige UUID {spalte} '{text}': {e}")))
}

pub(crate) fn opt_uuid_parsen(
    row: &sqlx::sqlite::SqliteRow,
    spalte: &str,
) -> DbResult<Option<Uuid>> {
    let text: Option<String> = row.try_get(spalte)?;
    text.as_deref()
        .map(|s| {
            Uuid::parse_str(s)
                .map_err(|e| DbError::intern(format!("Ungueltige UUID {spalte} '{s}': {e}")))
        })
        .transpose()
}
