//! Fehlertypen fuer das Story-Crate

use thiserror::Error;

/// Story-Fehlertypen
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    /// Autor aus dem Token existiert nicht (mehr) im Benutzerbestand
    #[error("Autor unbekannt")]
    AutorUnbekannt,

    #[error("Datenbank-Fehler: {0}")]
    DatenbankFehler(#[from] fabula_db::DbError),
}

pub type StoryResult<T> = Result<T, StoryError>;
