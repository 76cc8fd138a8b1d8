//! SQLite-Implementierung des StoryRepository

use chrono::Utc;
use sqlx::Row as _;

use fabula_core::{StoryId, UserId};

use crate::models::{NeueStory, StoryRecord};
use crate::repository::{DbResult, StoryRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{opt_uuid_parsen, uuid_parsen, zeit_parsen, zeit_text};

const STORY_SPALTEN: &str = "s.id, s.titel, s.inhalt, s.oeffentlich, s.autor_id, s.erstellt_am,
     u.email AS autor_email";

impl StoryRepository for SqliteDb {
    async fn create(&self, data: NeueStory<'_>) -> DbResult<StoryRecord> {
        let id = StoryId::new();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO stories (id, titel, inhalt, oeffentlich, autor_id, erstellt_am)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.inner().to_string())
        .bind(data.titel)
        .bind(data.inhalt)
        .bind(data.oeffentlich as i64)
        .bind(data.autor_id.als_text())
        .bind(zeit_text(now))
        .execute(&self.pool)
        .await?;

        let autor_email: Option<String> = sqlx::query("SELECT email FROM users WHERE id = ?")
            .bind(data.autor_id.als_text())
            .fetch_optional(&self.pool)
            .await?
            .map(|r| r.try_get("email"))
            .transpose()?;

        Ok(StoryRecord {
            id,
            titel: data.titel.to_string(),
            inhalt: data.inhalt.to_string(),
            oeffentlich: data.oeffentlich,
            autor_id: Some(data.autor_id),
            autor_email,
            erstellt_am: now,
        })
    }

    async fn list_public(&self) -> DbResult<Vec<StoryRecord>> {
        let sql = format!(
            "SELECT {STORY_SPALTEN}
             FROM stories s LEFT JOIN users u ON u.id = s.autor_id
             WHERE s.oeffentlich = 1
             ORDER BY s.erstellt_am DESC, s.rowid DESC"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_story).collect()
    }

    async fn list_by_author(&self, autor_id: UserId) -> DbResult<Vec<StoryRecord>> {
        let sql = format!(
            "SELECT {STORY_SPALTEN}
             FROM stories s LEFT JOIN users u ON u.id = s.autor_id
             WHERE s.autor_id = ?
             ORDER BY s.erstellt_am DESC, s.rowid DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(autor_id.als_text())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_story).collect()
    }
}

fn row_to_story(row: &sqlx::sqlite::SqliteRow) -> DbResult<StoryRecord> {
    let oeffentlich: i64 = row.try_get("oeffentlich")?;

    Ok(StoryRecord {
        id: StoryId(uuid_parsen(row, "id")?),
        titel: row.try_get("titel")?,
        inhalt: row.try_get("inhalt")?,
        oeffentlich: oeffentlich != 0,
        autor_id: opt_uuid_parsen(row, "autor_id")?.map(UserId),
        autor_email: row.try_get("autor_email")?,
        erstellt_am: zeit_parsen(row, "erstellt_am")?,
    })
}
