//! fabula-stories – Stories und Schreibvorschlaege
//!
//! Dieses Crate implementiert:
//! - StoryService: Stories anlegen, oeffentliche und eigene auflisten
//! - Vorschlags-Generator fuer den Editor (deterministischer Platzhalter)

pub mod error;
pub mod service;
pub mod vorschlag;


// Bequeme Re-Exporte
pub use error::{StoryError, StoryResult};
pub use service::StoryService;
pub use vorschlag::{vorschlag_generieren, VorschlagsModus};
