//! fabula-core – Gemeinsame Typen
//!
//! Dieses Crate stellt die Identifikationstypen und das Rollen-Tag bereit,
//! die von allen anderen Fabula-Crates gemeinsam genutzt werden.

pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use types::{Rolle, RolleUngueltig, StoryId, UserId};
