//! SQLite-Implementierung des LoginLogRepository

use chrono::Utc;
use sqlx::Row as _;
use uuid::Uuid;

use fabula_core::UserId;

use crate::models::{LoginLogRecord, NeuerLoginLog};
use crate::repository::{DbResult, LoginLogRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{uuid_parsen, zeit_parsen, zeit_text};

impl LoginLogRepository for SqliteDb {
    async fn log_login(&self, data: NeuerLoginLog<'_>) -> DbResult<LoginLogRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO login_log (id, user_id, email, ip_adresse, zeitpunkt)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.user_id.als_text())
        .bind(data.email)
        .bind(data.ip_adresse)
        .bind(zeit_text(now))
        .execute(&self.pool)
        .await?;

        Ok(LoginLogRecord {
            id,
            user_id: data.user_id,
            email: data.email.to_string(),
            ip_adresse: data.ip_adresse.map(|s| s.to_string()),
            zeitpunkt: now,
        })
    }

    async fn list_recent(&self, limit: u32) -> DbResult<Vec<LoginLogRecord>> {
        // Gleicher Zeitstempel: spaeter eingefuegte Zeile zuerst
        let rows = sqlx::query(
            "SELECT id, user_id, email, ip_adresse, zeitpunkt
             FROM login_log
             ORDER BY zeitpunkt DESC, rowid DESC
             LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_login_log).collect()
    }
}

fn row_to_login_log(row: &sqlx::sqlite::SqliteRow) -> DbResult<LoginLogRecord> {
    Ok(LoginLogRecord {
        id: uuid_parsen(row, "id")?,
        user_id: UserId(uuid_parsen(row, "user_id")?),
        email: row.try_get("email")?,
        ip_adresse: row.try_get("ip_adresse")?,
        zeitpunkt: zeit_parsen(row, "zeitpunkt")?,
    })
}
