//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist. Der Token-Signaturschluessel steht nie in der Datei,
//! er kommt aus `FABULA_JWT_SECRET`.

use serde::{Deserialize, Serialize};

use fabula_auth::AuthKonfig;
use fabula_db::DatabaseConfig;
use fabula_observability::logging::{log_format_gueltig, log_level_gueltig};

/// Umgebungsvariable fuer den Token-Signaturschluessel
pub const ENV_JWT_SECRET: &str = "FABULA_JWT_SECRET";
/// Mindestlaenge des Signaturschluessels in Bytes
pub const MIN_SCHLUESSEL_BYTES: usize = 32;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Anmeldung, Tokens, Passwort-Hashing
    pub auth: AuthKonfig,
    /// CORS fuer die REST-API
    pub cors: CorsEinstellungen,
    /// Observability-Einstellungen (Metriken, Health)
    pub observability: ObservabilityEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers (nur fuer Logs)
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Fabula".into(),
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer alle Listener
    pub bind_adresse: String,
    /// Port fuer die REST-API
    pub api_port: u16,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            api_port: 8080,
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// WAL-Modus fuer SQLite
    pub wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        Self {
            url: "sqlite://fabula.db".into(),
            max_verbindungen: 5,
            wal: true,
        }
    }
}

impl DatenbankEinstellungen {
    pub fn als_db_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            max_verbindungen: self.max_verbindungen,
            sqlite_wal: self.wal,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// CORS-Einstellungen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsEinstellungen {
    /// Erlaubte Origins (leer = alle erlaubt)
    pub origins: Vec<String>,
}

/// Observability-Einstellungen (Metriken + Health-Check)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityEinstellungen {
    /// Aktiviert den Observability-Server
    pub aktiviert: bool,
    /// Port fuer Metriken und Health
    pub port: u16,
    /// Abstand der DB-Pings fuer `/health` in Sekunden
    pub db_ping_sekunden: u64,
}

impl Default for ObservabilityEinstellungen {
    fn default() -> Self {
        Self {
            aktiviert: true,
            port: 9300,
            db_ping_sekunden: 15,
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                config
                    .pruefen()
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Prueft Werte, die serde allein nicht abfangen kann
    pub fn pruefen(&self) -> anyhow::Result<()> {
        if !log_level_gueltig(&self.logging.level) {
            anyhow::bail!("[logging] level '{}' ist ungueltig", self.logging.level);
        }
        if !log_format_gueltig(&self.logging.format) {
            anyhow::bail!("[logging] format '{}' ist ungueltig", self.logging.format);
        }
        Ok(())
    }

    /// Gibt die Bind-Adresse fuer den REST-Server zurueck
    pub fn api_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.api_port)
    }

    /// Gibt die Bind-Adresse fuer den Observability-Server zurueck
    pub fn observability_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.observability.port)
    }
}

/// Liest den Signaturschluessel aus der Umgebung
pub fn signaturschluessel_aus_env() -> anyhow::Result<Vec<u8>> {
    signaturschluessel(std::env::var(ENV_JWT_SECRET).ok())
}

/// Prueft einen Schluesselwert; fehlend oder zu kurz ist ein Startfehler
pub fn signaturschluessel(wert: Option<String>) -> anyhow::Result<Vec<u8>> {
    let wert = wert.ok_or_else(|| {
        anyhow::anyhow!("{ENV_JWT_SECRET} ist nicht gesetzt, Server kann keine Tokens signieren")
    })?;

    if wert.len() < MIN_SCHLUESSEL_BYTES {
        anyhow::bail!(
            "{ENV_JWT_SECRET} ist zu kurz: {} Bytes (Minimum: {MIN_SCHLUESSEL_BYTES})",
            wert.len()
        );
    }

    Ok(wert.into_bytes())
}
