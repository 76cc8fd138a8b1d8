//! fabula-server – Bibliotheks-Root
//!
//! Verdrahtet Datenbank, Auth-Kern, Story-Service, REST-API und
//! Observability zu einem laufenden Server.

pub mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;

use fabula_api::{ApiState, RestServer, RestServerKonfig};
use fabula_auth::TokenDienst;
use fabula_db::SqliteDb;
use fabula_observability::{observability_server_starten, FabulaMetriken, HealthState};

use config::{signaturschluessel_aus_env, ServerConfig};

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Signaturschluessel aus der Umgebung lesen (fehlt er, bricht der Start ab)
    /// 2. Datenbankverbindung herstellen, Migrationen ausfuehren
    /// 3. Auth- und Story-Service aufbauen
    /// 4. Observability-Server und DB-Ping starten
    /// 5. REST-API starten
    /// 6. Auf Ctrl-C warten, dann beide Server geordnet beenden
    pub async fn starten(self) -> Result<()> {
        let config = self.config;

        tracing::info!(
            server_name = %config.server.name,
            api = %config.api_bind_adresse(),
            "Server startet"
        );

        let schluessel = signaturschluessel_aus_env()?;
        let tokens = Arc::new(TokenDienst::neu(&schluessel)?);

        let db = Arc::new(SqliteDb::oeffnen(&config.datenbank.als_db_config()).await?);

        let metriken = FabulaMetriken::neu()?;
        let state = ApiState::neu(
            Arc::clone(&db),
            tokens,
            config.auth.clone(),
            metriken.clone(),
        )?;

        let (stopp_tx, stopp_rx) = watch::channel(false);

        if config.observability.aktiviert {
            let addr: SocketAddr = config.observability_bind_adresse().parse()?;
            let health = HealthState::neu();

            db_ping_starten(
                Arc::clone(&db),
                health.clone(),
                Duration::from_secs(config.observability.db_ping_sekunden.max(1)),
                stopp_rx.clone(),
            );

            let rx = stopp_rx.clone();
            tokio::spawn(async move {
                if let Err(e) =
                    observability_server_starten(addr, metriken, health, stopp_abwarten(rx)).await
                {
                    tracing::error!(fehler = %e, "Observability-Server beendet");
                }
            });
        }

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Shutdown-Signal empfangen, Server wird beendet"),
                Err(e) => tracing::error!(fehler = %e, "Signal-Handler fehlgeschlagen"),
            }
            let _ = stopp_tx.send(true);
        });

        let rest = RestServer::neu(RestServerKonfig {
            bind_addr: config.api_bind_adresse().parse()?,
            cors_origins: config.cors.origins.clone(),
        });
        rest.starten(state, stopp_abwarten(stopp_rx)).await?;

        tracing::info!("Server beendet");
        Ok(())
    }
}

/// Wartet bis das Stopp-Signal gesendet oder der Sender verworfen wurde
async fn stopp_abwarten(mut rx: watch::Receiver<bool>) {
    let _ = rx.changed().await;
}

/// Aktualisiert den DB-Status fuer `/health` in festen Abstaenden
fn db_ping_starten(
    db: Arc<SqliteDb>,
    health: HealthState,
    abstand: Duration,
    mut stopp: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let mut intervall = tokio::time::interval(abstand);
        loop {
            tokio::select! {
                _ = intervall.tick() => {
                    let verbunden = db.ping().await;
                    if verbunden != health.db_verbunden() {
                        tracing::warn!(verbunden, "DB-Status geaendert");
                    }
                    health.db_status_setzen(verbunden);
                }
                _ = stopp.changed() => break,
            }
        }
    });
}
