//! Fehlertypen fuer den Auth-Service

use thiserror::Error;

/// Alle moeglichen Fehler im Auth-Service
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Eingabe ---
    #[error("Ungueltige Eingabe: {0}")]
    Validierung(String),

    // --- Authentifizierung ---
    /// Gleiche Meldung fuer unbekannte E-Mail und falsches Passwort
    #[error("E-Mail oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    // --- Registrierung ---
    #[error("E-Mail-Adresse bereits registriert")]
    BereitsVorhanden,

    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] fabula_db::DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

/// Grobe Einordnung eines Fehlers fuer Aufrufer und Protokollierung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FehlerKategorie {
    /// Fehlerhafte Eingabe, nicht sicherheitsrelevant
    Validierung,
    /// Falsche Anmeldedaten oder ungueltiges Token
    Authentifizierung,
    /// Doppelte Registrierung
    Konflikt,
    /// Hashing, Datenbank, Konfiguration – Details nur im Server-Log
    Intern,
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    pub fn validierung(msg: impl Into<String>) -> Self {
        Self::Validierung(msg.into())
    }

    pub fn kategorie(&self) -> FehlerKategorie {
        match self {
            Self::Validierung(_) => FehlerKategorie::Validierung,
            Self::UngueltigeAnmeldedaten => FehlerKategorie::Authentifizierung,
            Self::BereitsVorhanden => FehlerKategorie::Konflikt,
            Self::PasswortHashing(_)
            | Self::Konfiguration(_)
            | Self::Datenbank(_)
            | Self::Intern(_) => FehlerKategorie::Intern,
        }
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;
