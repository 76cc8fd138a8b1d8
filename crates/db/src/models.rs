//! Datenbankmodelle fuer Fabula
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind von den Domain-Typen getrennt und dienen als reine Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use fabula_core::{Rolle, StoryId, UserId};

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize)]
pub struct BenutzerRecord {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub rolle: Rolle,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub rolle: &'a Rolle,
}

// ---------------------------------------------------------------------------
// Login-Protokoll
// ---------------------------------------------------------------------------

/// Eintrag im Login-Protokoll (wird nie veraendert)
#[derive(Debug, Clone, Serialize)]
pub struct LoginLogRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub email: String,
    pub ip_adresse: Option<String>,
    pub zeitpunkt: DateTime<Utc>,
}

/// Daten fuer einen neuen Login-Protokoll-Eintrag
#[derive(Debug, Clone)]
pub struct NeuerLoginLog<'a> {
    pub user_id: UserId,
    pub email: &'a str,
    pub ip_adresse: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Stories
// ---------------------------------------------------------------------------

/// Story-Datensatz inklusive E-Mail des Autors (per JOIN geladen)
#[derive(Debug, Clone, Serialize)]
pub struct StoryRecord {
    pub id: StoryId,
    pub titel: String,
    pub inhalt: String,
    pub oeffentlich: bool,
    pub autor_id: Option<UserId>,
    pub autor_email: Option<String>,
    pub erstellt_am: DateTime<Utc>,
}

/// Daten zum Erstellen einer Story
#[derive(Debug, Clone)]
pub struct NeueStory<'a> {
    pub titel: &'a str,
    pub inhalt: &'a str,
    pub oeffentlich: bool,
    pub autor_id: UserId,
}
