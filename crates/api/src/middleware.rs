//! Axum-Middleware fuer das Zugangs-Gate und Hilfsfunktionen

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use fabula_auth::{Identitaet, ZugangVerweigert};

use crate::error::ApiError;
use crate::state::ApiState;

/// Extrahiert die Herkunft des Aufrufers (erster `X-Forwarded-For`-Eintrag)
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Fehlerantwort fuer REST-API: `{"error":{"code","message"}}`
pub fn fehler_antwort(status: StatusCode, nachricht: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": nachricht
            }
        })),
    )
        .into_response()
}

/// Axum-Middleware: laesst nur Anfragen mit gueltigem Token durch
///
/// Bei Erfolg liegt die [`Identitaet`] in den Request-Extensions.
pub async fn zugangs_middleware(
    State(state): State<ApiState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match state.gate.pruefen(header) {
        Ok(identitaet) => {
            req.extensions_mut().insert(identitaet);
            next.run(req).await
        }
        Err(verweigert) => {
            state.metriken.abweisung_zaehlen(verweigert.grund());
            let nachricht = match verweigert {
                ZugangVerweigert::KeinToken => "Authorization-Header fehlt",
                ZugangVerweigert::Ungueltig(_) => "Ungueltiger oder abgelaufener Token",
            };
            fehler_antwort(StatusCode::UNAUTHORIZED, nachricht)
        }
    }
}

/// Wrapper-Typ fuer die verifizierte Identitaet (aus den Extensions)
#[derive(Debug, Clone)]
pub struct Angemeldet(pub Identitaet);

#[async_trait]
impl<S> FromRequestParts<S> for Angemeldet
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identitaet>()
            .cloned()
            .map(Angemeldet)
            .ok_or_else(|| ApiError::NichtAuthentifiziert("Nicht angemeldet".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn client_ip_aus_x_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers).as_deref(), Some("192.168.1.1"));
    }

    #[test]
    fn client_ip_ohne_header() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), None);
    }

    #[test]
    fn client_ip_leerer_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" , 10.0.0.1"));
        assert_eq!(client_ip(&headers), None);
    }
}
