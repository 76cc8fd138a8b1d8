//! Prometheus-kompatible Metriken fuer Fabula
//!
//! Registrierte Metriken:
//! - `fabula_signups_total` – Counter: Erfolgreiche Registrierungen
//! - `fabula_logins_total` – Counter: Login-Versuche (ergebnis)
//! - `fabula_gate_rejections_total` – Counter: Vom Zugangs-Gate abgewiesene Anfragen (grund)
//! - `fabula_http_requests_total` – Counter: HTTP-Anfragen (method, path, status)
//! - `fabula_http_request_duration_seconds` – Histogram: HTTP-Antwortzeit
//!
//! Unter Linux kommen die Prozess-Metriken (`process_*`) dazu.

use anyhow::Result;
use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse, routing::get, Router};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Alle Fabula-Prometheus-Metriken
///
/// Jede Instanz hat ihre eigene Registry, Tests kommen sich so nicht in die Quere.
#[derive(Clone)]
pub struct FabulaMetriken {
    pub registry: Arc<Registry>,

    // Auth-Metriken
    pub signups_total: IntCounter,
    pub logins_total: IntCounterVec,
    pub gate_rejections_total: IntCounterVec,

    // HTTP-Metriken
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
}

impl FabulaMetriken {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        // --- Auth-Metriken ---
        let signups_total = IntCounter::with_opts(Opts::new(
            "fabula_signups_total",
            "Anzahl erfolgreicher Registrierungen",
        ))?;
        registry.register(Box::new(signups_total.clone()))?;

        let logins_total = IntCounterVec::new(
            Opts::new("fabula_logins_total", "Login-Versuche nach Ergebnis"),
            &["ergebnis"],
        )?;
        registry.register(Box::new(logins_total.clone()))?;

        let gate_rejections_total = IntCounterVec::new(
            Opts::new(
                "fabula_gate_rejections_total",
                "Vom Zugangs-Gate abgewiesene Anfragen nach Grund",
            ),
            &["grund"],
        )?;
        registry.register(Box::new(gate_rejections_total.clone()))?;

        // --- HTTP-Metriken ---
        let http_requests_total = IntCounterVec::new(
            Opts::new("fabula_http_requests_total", "Gesamtanzahl HTTP-Anfragen"),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "fabula_http_request_duration_seconds",
                "HTTP-Antwortzeit in Sekunden",
            )
            // Argon2 macht Login/Signup deutlich langsamer als den Rest
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ]),
            &["method", "path"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry: Arc::new(registry),
            signups_total,
            logins_total,
            gate_rejections_total,
            http_requests_total,
            http_request_duration_seconds,
        })
    }

    /// Zaehlt einen Login-Versuch (`erfolg`, `abgelehnt`, `fehler`)
    pub fn login_zaehlen(&self, ergebnis: &str) {
        self.logins_total.with_label_values(&[ergebnis]).inc();
    }

    /// Zaehlt eine Abweisung durch das Zugangs-Gate
    pub fn abweisung_zaehlen(&self, grund: &str) {
        self.gate_rejections_total.with_label_values(&[grund]).inc();
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: FabulaMetriken) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metriken)
}

async fn metrics_handler(State(metriken): State<FabulaMetriken>) -> impl IntoResponse {
    match metriken.exportieren() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn metriken_erstellen_erfolgreich() {
        let metriken = FabulaMetriken::neu().unwrap();
        metriken.signups_total.inc();
        assert!(!metriken.registry.gather().is_empty());
    }

    #[test]
    fn zwei_instanzen_unabhaengig() {
        let a = FabulaMetriken::neu().unwrap();
        let b = FabulaMetriken::neu().unwrap();
        a.signups_total.inc();
        assert_eq!(a.signups_total.get(), 1);
        assert_eq!(b.signups_total.get(), 0);
    }

    #[test]
    fn login_und_abweisung_mit_labels() {
        let metriken = FabulaMetriken::neu().unwrap();
        metriken.login_zaehlen("erfolg");
        metriken.login_zaehlen("erfolg");
        metriken.login_zaehlen("abgelehnt");
        metriken.abweisung_zaehlen("kein_token");

        assert_eq!(metriken.logins_total.with_label_values(&["erfolg"]).get(), 2);
        assert_eq!(metriken.logins_total.with_label_values(&["abgelehnt"]).get(), 1);
        assert_eq!(
            metriken
                .gate_rejections_total
                .with_label_values(&["kein_token"])
                .get(),
            1
        );
    }

    #[test]
    fn metriken_export_prometheus_format() {
        let metriken = FabulaMetriken::neu().unwrap();
        metriken.signups_total.inc();
        metriken
            .http_requests_total
            .with_label_values(&["POST", "/signup", "200"])
            .inc();
        metriken
            .http_request_duration_seconds
            .with_label_values(&["POST", "/signup"])
            .observe(0.2);

        let output = metriken.exportieren().unwrap();
        assert!(output.contains("fabula_signups_total 1"));
        assert!(output.contains("fabula_http_requests_total"));
        assert!(output.contains("fabula_http_request_duration_seconds_bucket"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[tokio::test]
    async fn metrics_endpunkt_liefert_text() {
        let metriken = FabulaMetriken::neu().unwrap();
        metriken.signups_total.inc();

        let antwort = metrics_router(metriken)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(antwort.status(), StatusCode::OK);
        let content_type = antwort.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    }
}
