//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. Auth- und Story-Service kennen nur diese
//! Traits; die SQLite-Implementierung liegt in [`crate::sqlite`].

use fabula_core::UserId;

use crate::error::DbError;
use crate::models::{
    BenutzerRecord, LoginLogRecord, NeueStory, NeuerBenutzer, NeuerLoginLog, StoryRecord,
};

/// Result-Alias fuer alle Repository-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://fabula.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://fabula.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Credential Store: Benutzer anlegen und nachschlagen
///
/// Benutzer werden nie aktualisiert oder geloescht.
#[allow(async_fn_in_trait)]
pub trait UserRepository: Send + Sync {
    /// Legt einen Benutzer an. Schlaegt mit [`DbError::Eindeutigkeit`] fehl
    /// wenn die E-Mail-Adresse bereits vergeben ist.
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;

    /// Einen Benutzer anhand seiner E-Mail-Adresse laden
    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>>;

    /// Einen Benutzer anhand seiner ID laden
    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>>;
}

/// Login-Protokoll: nur Anhaengen und Auflisten
#[allow(async_fn_in_trait)]
pub trait LoginLogRepository: Send + Sync {
    /// Haengt einen Eintrag mit aktuellem Zeitstempel an
    async fn log_login(&self, data: NeuerLoginLog<'_>) -> DbResult<LoginLogRecord>;

    /// Die neuesten `limit` Eintraege, neueste zuerst
    async fn list_recent(&self, limit: u32) -> DbResult<Vec<LoginLogRecord>>;
}

/// Repository fuer Stories
#[allow(async_fn_in_trait)]
pub trait StoryRepository: Send + Sync {
    async fn create(&self, data: NeueStory<'_>) -> DbResult<StoryRecord>;

    /// Alle oeffentlichen Stories, neueste zuerst
    async fn list_public(&self) -> DbResult<Vec<StoryRecord>>;

    /// Alle Stories eines Autors (oeffentlich und privat), neueste zuerst
    async fn list_by_author(&self, autor_id: UserId) -> DbResult<Vec<StoryRecord>>;
}
