//! Fehlertypen der REST-API und ihre HTTP-Abbildung

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use fabula_auth::{AuthError, FehlerKategorie};
use fabula_stories::StoryError;

use crate::middleware::fehler_antwort;

/// Meldung fuer alle internen Fehler; Details stehen nur im Server-Log
const INTERNE_MELDUNG: &str = "Interner Serverfehler";

/// Alle Fehler, die ein Handler zurueckgeben kann
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    UngueltigeEingabe(String),

    #[error("{0}")]
    NichtAuthentifiziert(String),

    #[error("{0}")]
    KeineBerechtigung(String),

    #[error("{0}")]
    Konflikt(String),

    #[error("Interner Fehler: {0}")]
    Intern(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::UngueltigeEingabe(_) => StatusCode::BAD_REQUEST,
            Self::NichtAuthentifiziert(_) => StatusCode::UNAUTHORIZED,
            Self::KeineBerechtigung(_) => StatusCode::FORBIDDEN,
            Self::Konflikt(_) => StatusCode::CONFLICT,
            Self::Intern(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        match self {
            Self::Intern(detail) => {
                tracing::error!(fehler = %detail, "Anfrage mit internem Fehler beendet");
                fehler_antwort(status, INTERNE_MELDUNG)
            }
            andere => fehler_antwort(status, &andere.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e.kategorie() {
            FehlerKategorie::Validierung => Self::UngueltigeEingabe(e.to_string()),
            FehlerKategorie::Authentifizierung => Self::NichtAuthentifiziert(e.to_string()),
            FehlerKategorie::Konflikt => Self::Konflikt(e.to_string()),
            FehlerKategorie::Intern => Self::Intern(e.to_string()),
        }
    }
}

impl From<StoryError> for ApiError {
    fn from(e: StoryError) -> Self {
        match e {
            StoryError::UngueltigeEingabe(_) => Self::UngueltigeEingabe(e.to_string()),
            StoryError::AutorUnbekannt => Self::NichtAuthentifiziert(e.to_string()),
            StoryError::DatenbankFehler(_) => Self::Intern(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::UngueltigeEingabe(format!("Ungueltiger Request-Body: {}", e.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_kategorien_auf_status() {
        let faelle = [
            (AuthError::validierung("x"), StatusCode::BAD_REQUEST),
            (AuthError::UngueltigeAnmeldedaten, StatusCode::UNAUTHORIZED),
            (AuthError::BereitsVorhanden, StatusCode::CONFLICT),
            (AuthError::intern("kaputt"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (fehler, status) in faelle {
            assert_eq!(ApiError::from(fehler).http_status(), status);
        }
    }

    #[test]
    fn story_validierung_ist_400() {
        let fehler = ApiError::from(StoryError::UngueltigeEingabe("Titel".into()));
        assert_eq!(fehler.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unbekannter_autor_ist_401() {
        let fehler = ApiError::from(StoryError::AutorUnbekannt);
        assert_eq!(fehler.http_status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn interner_fehler_ist_opak() {
        let antwort = ApiError::Intern("geheime Details".into()).into_response();
        assert_eq!(antwort.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
