//! SQLite-Implementierung des UserRepository

use chrono::Utc;
use sqlx::Row as _;

use fabula_core::{Rolle, UserId};

use crate::error::{ist_unique_verletzung, DbError};
use crate::models::{BenutzerRecord, NeuerBenutzer};
use crate::repository::{DbResult, UserRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{uuid_parsen, zeit_parsen, zeit_text};

impl UserRepository for SqliteDb {
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        if data.password_hash.is_empty() {
            return Err(DbError::UngueltigeDaten("Passwort-Hash ist leer".into()));
        }

        let id = UserId::new();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, rolle, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.als_text())
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.rolle.als_str())
        .bind(zeit_text(now))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if ist_unique_verletzung(&e) {
                DbError::Eindeutigkeit(format!("E-Mail '{}' bereits vergeben", data.email))
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(BenutzerRecord {
            id,
            email: data.email.to_string(),
            password_hash: data.password_hash.to_string(),
            rolle: data.rolle.clone(),
            created_at: now,
        })
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, rolle, created_at
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, rolle, created_at
             FROM users WHERE id = ?",
        )
        .bind(id.als_text())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }
}

fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    let rolle: String = row.try_get("rolle")?;
    let rolle = Rolle::neu(rolle)
        .map_err(|e| DbError::intern(format!("Ungueltige Rolle in users: {e}")))?;

    Ok(BenutzerRecord {
        id: UserId(uuid_parsen(row, "id")?),
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        rolle,
        created_at: zeit_parsen(row, "created_at")?,
    })
}
