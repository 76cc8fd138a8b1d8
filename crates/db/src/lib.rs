//! fabula-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern bereit: Benutzer (Credential
//! Store), Login-Protokoll und Stories liegen hinter Traits, die SQLite-
//! Implementierung steckt in [`sqlite`]. Services werden gegen die Traits
//! geschrieben und koennen so mit In-Memory-Fakes getestet werden.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{
    DatabaseConfig, DbResult, LoginLogRepository, StoryRepository, UserRepository,
};
pub use sqlite::SqliteDb;
