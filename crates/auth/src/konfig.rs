//! Konfiguration des Auth-Kerns
//!
//! Wird als `[auth]`-Abschnitt aus der Server-Konfiguration geladen. Der
//! Signaturschluessel gehoert bewusst nicht hierher, er kommt ausschliesslich
//! aus der Umgebung.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Argon2id-Arbeitsfaktor
///
/// Standardwerte gemaess OWASP-Empfehlungen:
/// - Speicher: 64 MiB
/// - Iterationen: 3
/// - Parallelismus: 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashParameter {
    /// m_cost in KiB
    pub speicher_kib: u32,
    /// t_cost
    pub iterationen: u32,
    /// p_cost
    pub parallelitaet: u32,
}

impl Default for HashParameter {
    fn default() -> Self {
        Self {
            speicher_kib: 64 * 1024,
            iterationen: 3,
            parallelitaet: 1,
        }
    }
}

/// Einstellungen fuer Anmeldung, Tokens und Login-Protokoll
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthKonfig {
    /// Gueltigkeitsdauer ausgestellter Tokens in Stunden
    pub token_gueltigkeit_stunden: u64,
    /// Maximale Anzahl Eintraege beim Auflisten des Login-Protokolls
    pub login_log_limit: u32,
    /// Argon2id-Parameter
    pub hashing: HashParameter,
}

impl Default for AuthKonfig {
    fn default() -> Self {
        Self {
            token_gueltigkeit_stunden: 24,
            login_log_limit: 50,
            hashing: HashParameter::default(),
        }
    }
}

impl AuthKonfig {
    pub fn token_gueltigkeit(&self) -> Duration {
        Duration::from_secs(self.token_gueltigkeit_stunden * 60 * 60)
    }
}
