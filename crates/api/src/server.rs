//! Axum HTTP-Server fuer die REST-API

use std::future::Future;
use std::net::SocketAddr;

use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use fabula_observability::request_timing_layer;

use crate::routes::router;
use crate::state::ApiState;

/// REST-Server-Konfiguration
#[derive(Debug, Clone)]
pub struct RestServerKonfig {
    pub bind_addr: SocketAddr,
    /// Erlaubte CORS-Origins. Leer = alle Origins erlaubt (nur fuer Entwicklung).
    pub cors_origins: Vec<String>,
}

impl Default for RestServerKonfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            cors_origins: vec![],
        }
    }
}

/// Baut den CORS-Layer aus der Origin-Liste
fn cors_layer(origins: &[String]) -> CorsLayer {
    let basis = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.is_empty() {
        return basis.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(wert) => Some(wert),
            Err(_) => {
                tracing::warn!(origin = %o, "Ungueltiger CORS-Origin wird ignoriert");
                None
            }
        })
        .collect();
    basis.allow_origin(origins)
}

/// Axum HTTP-Server fuer die REST-API
pub struct RestServer {
    konfig: RestServerKonfig,
}

impl RestServer {
    pub fn neu(konfig: RestServerKonfig) -> Self {
        Self { konfig }
    }

    /// Startet den REST-Server und laeuft bis `shutdown` fertig ist
    pub async fn starten(
        self,
        state: ApiState,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let app = router(state)
            .layer(request_timing_layer())
            .layer(cors_layer(&self.konfig.cors_origins));

        let listener = tokio::net::TcpListener::bind(self.konfig.bind_addr).await?;
        tracing::info!(addr = %self.konfig.bind_addr, "REST-Server gestartet");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
