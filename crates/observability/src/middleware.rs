//! Request-Timing Middleware fuer Axum
//!
//! Misst die Antwortzeit jeder HTTP-Anfrage, protokolliert sie als
//! strukturiertes Log-Event und schreibt sie in die Prometheus-Metriken.

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{Request, Response},
    middleware::Next,
};
use std::time::Instant;

use crate::metrics::FabulaMetriken;

/// Pfad-Label fuer Anfragen ohne passende Route
const UNBEKANNTER_PFAD: &str = "unbekannt";

/// Erstellt den tower-http Trace-Layer fuer HTTP-Spans
pub fn request_timing_layer() -> tower_http::trace::TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
> {
    use tower_http::trace::TraceLayer;
    TraceLayer::new_for_http()
}

/// Axum-Middleware-Funktion: misst Antwortzeit, loggt strukturiert und
/// zaehlt die Anfrage in den HTTP-Metriken.
///
/// Als Label dient das Routen-Muster (`/stories/my`), nicht der rohe Pfad.
///
/// Verwendung:
/// ```ignore
/// Router::new()
///     .route("/", get(handler))
///     .layer(axum::middleware::from_fn_with_state(metriken, timing_middleware))
/// ```
pub async fn timing_middleware(
    State(metriken): State<FabulaMetriken>,
    req: Request<Body>,
    next: Next,
) -> Response<Body> {
    let methode = req.method().to_string();
    let pfad = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNBEKANNTER_PFAD.to_string());
    let start = Instant::now();

    let response = next.run(req).await;

    let dauer = start.elapsed();
    let status = response.status().as_u16();

    let status_text = status.to_string();
    metriken
        .http_requests_total
        .with_label_values(&[methode.as_str(), pfad.as_str(), status_text.as_str()])
        .inc();
    metriken
        .http_request_duration_seconds
        .with_label_values(&[methode.as_str(), pfad.as_str()])
        .observe(dauer.as_secs_f64());

    tracing::info!(
        method = %methode,
        path = %pfad,
        status = status,
        duration_ms = dauer.as_millis(),
        "HTTP-Anfrage abgeschlossen"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    fn app(metriken: FabulaMetriken) -> Router {
        Router::new()
            .route("/eintrag/:id", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(metriken, timing_middleware))
    }

    #[tokio::test]
    async fn zaehlt_mit_routen_muster() {
        let metriken = FabulaMetriken::neu().unwrap();

        let antwort = app(metriken.clone())
            .oneshot(Request::get("/eintrag/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(antwort.status(), StatusCode::OK);

        let wert = metriken
            .http_requests_total
            .with_label_values(&["GET", "/eintrag/:id", "200"])
            .get();
        assert_eq!(wert, 1);

        let beobachtungen = metriken
            .http_request_duration_seconds
            .with_label_values(&["GET", "/eintrag/:id"])
            .get_sample_count();
        assert_eq!(beobachtungen, 1);
    }
}
