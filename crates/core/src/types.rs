//! Gemeinsame Identifikationstypen fuer Fabula
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Eindeutige Benutzer-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Erstellt eine neue zufaellige UserId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }

    /// Kanonische Textform (kleingeschriebene UUID mit Bindestrichen)
    pub fn als_text(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// Eindeutige Story-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(pub Uuid);

impl StoryId {
    /// Erstellt eine neue zufaellige StoryId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for StoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "story:{}", self.0)
    }
}

/// Fehler beim Erzeugen einer Rolle aus einem leeren String
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Rolle darf nicht leer sein")]
pub struct RolleUngueltig;

/// Rollen-Tag eines Benutzers
///
/// Nie leer. `user` ist der Standard, `admin` die erhoehte Rolle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rolle(String);

impl Rolle {
    pub const STANDARD: &'static str = "user";
    pub const ADMIN: &'static str = "admin";

    /// Die Rolle die neue Benutzer bei der Registrierung erhalten
    pub fn standard() -> Self {
        Self(Self::STANDARD.to_string())
    }

    pub fn admin() -> Self {
        Self(Self::ADMIN.to_string())
    }

    pub fn neu(wert: impl Into<String>) -> Result<Self, RolleUngueltig> {
        let wert = wert.into();
        if wert.trim().is_empty() {
            return Err(RolleUngueltig);
        }
        Ok(Self(wert))
    }

    pub fn als_str(&self) -> &str {
        &self.0
    }

    pub fn ist_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }
}

impl Default for Rolle {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<String> for Rolle {
    type Error = RolleUngueltig;

    fn try_from(wert: String) -> Result<Self, Self::Error> {
        Self::neu(wert)
    }
}

impl From<Rolle> for String {
    fn from(rolle: Rolle) -> Self {
        rolle.0
    }
}

impl std::fmt::Display for Rolle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
