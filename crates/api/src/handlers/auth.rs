//! REST-Handler fuer Status, Registrierung und Login

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use fabula_auth::AuthError;

use crate::error::ApiResult;
use crate::middleware::client_ip;
use crate::state::ApiState;

/// Body fuer `/signup` und `/login`
#[derive(Debug, Deserialize)]
pub struct ZugangsdatenBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginAntwort {
    pub token: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

/// GET / – Lebenszeichen
pub async fn wurzel() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Fabula laeuft" }))
}

/// POST /signup
pub async fn signup(
    State(state): State<ApiState>,
    body: Result<Json<ZugangsdatenBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;

    state.auth.registrieren(&body.email, &body.password).await?;
    state.metriken.signups_total.inc();

    Ok(Json(json!({ "message": "Benutzer angelegt" })))
}

/// POST /login
pub async fn login(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Result<Json<ZugangsdatenBody>, JsonRejection>,
) -> ApiResult<Json<LoginAntwort>> {
    let Json(body) = body?;
    let herkunft = client_ip(&headers);

    match state
        .auth
        .anmelden(&body.email, &body.password, herkunft.as_deref())
        .await
    {
        Ok(anmeldung) => {
            state.metriken.login_zaehlen("erfolg");
            Ok(Json(LoginAntwort {
                token: anmeldung.token,
                role: anmeldung.rolle.to_string(),
                expires_at: anmeldung.laeuft_ab_am,
            }))
        }
        Err(e) => {
            let ergebnis = match e {
                AuthError::UngueltigeAnmeldedaten => "abgelehnt",
                AuthError::Validierung(_) => "ungueltig",
                _ => "fehler",
            };
            state.metriken.login_zaehlen(ergebnis);
            Err(e.into())
        }
    }
}
