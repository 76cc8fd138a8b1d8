//! REST-Handler fuer Admin-Endpunkte

use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use fabula_db::models::LoginLogRecord;

use crate::error::{ApiError, ApiResult};
use crate::middleware::Angemeldet;
use crate::state::ApiState;

#[derive(Debug, Serialize)]
pub struct LoginLogAntwort {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<LoginLogRecord> for LoginLogAntwort {
    fn from(r: LoginLogRecord) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id.inner(),
            email: r.email,
            ip_address: r.ip_adresse,
            created_at: r.zeitpunkt,
        }
    }
}

/// GET /admin/logins – nur mit Rolle `admin`
pub async fn get_login_logs(
    State(state): State<ApiState>,
    Angemeldet(ich): Angemeldet,
) -> ApiResult<Json<Value>> {
    if !ich.ist_admin() {
        tracing::warn!(user_id = %ich.user_id, rolle = %ich.rolle, "Admin-Zugriff verweigert");
        return Err(ApiError::KeineBerechtigung(
            "Nur fuer Administratoren".into(),
        ));
    }

    let logs: Vec<LoginLogAntwort> = state
        .auth
        .login_logs_auflisten()
        .await?
        .into_iter()
        .map(LoginLogAntwort::from)
        .collect();

    Ok(Json(json!({ "logs": logs })))
}
