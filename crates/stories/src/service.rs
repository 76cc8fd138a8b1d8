//! StoryService – Stories anlegen und auflisten

use std::sync::Arc;

use fabula_core::UserId;
use fabula_db::{
    models::{NeueStory, StoryRecord},
    StoryRepository,
};

use crate::error::{StoryError, StoryResult};

/// Maximale Titellaenge in Zeichen
pub const MAX_TITEL_ZEICHEN: usize = 200;
/// Maximale Inhaltslaenge in Zeichen
pub const MAX_INHALT_ZEICHEN: usize = 100_000;

/// StoryService verwaltet die Stories aller Benutzer
pub struct StoryService<R: StoryRepository> {
    repo: Arc<R>,
}

impl<R: StoryRepository> StoryService<R> {
    /// Erstellt einen neuen StoryService
    pub fn neu(repo: Arc<R>) -> Arc<Self> {
        Arc::new(Self { repo })
    }

    /// Legt eine Story fuer `autor` an
    pub async fn erstellen(
        &self,
        autor: UserId,
        titel: &str,
        inhalt: &str,
        oeffentlich: bool,
    ) -> StoryResult<StoryRecord> {
        let titel = titel.trim();
        if titel.is_empty() {
            return Err(StoryError::UngueltigeEingabe(
                "Titel darf nicht leer sein".into(),
            ));
        }

        let titel_zeichen = titel.chars().count();
        if titel_zeichen > MAX_TITEL_ZEICHEN {
            return Err(StoryError::UngueltigeEingabe(format!(
                "Titel zu lang: {titel_zeichen} Zeichen (Maximum: {MAX_TITEL_ZEICHEN})"
            )));
        }

        let inhalt_zeichen = inhalt.chars().count();
        if inhalt_zeichen > MAX_INHALT_ZEICHEN {
            return Err(StoryError::UngueltigeEingabe(format!(
                "Inhalt zu lang: {inhalt_zeichen} Zeichen (Maximum: {MAX_INHALT_ZEICHEN})"
            )));
        }

        let story = self
            .repo
            .create(NeueStory {
                titel,
                inhalt,
                oeffentlich,
                autor_id: autor,
            })
            .await
            .map_err(|e| {
                if e.ist_fremdschluessel() {
                    tracing::warn!(autor = %autor, "Story fuer unbekannten Autor abgewiesen");
                    StoryError::AutorUnbekannt
                } else {
                    StoryError::DatenbankFehler(e)
                }
            })?;

        tracing::info!(
            story_id = %story.id,
            autor = %autor,
            oeffentlich,
            "Story angelegt"
        );

        Ok(story)
    }

    /// Alle oeffentlichen Stories, neueste zuerst
    pub async fn oeffentliche_auflisten(&self) -> StoryResult<Vec<StoryRecord>> {
        Ok(self.repo.list_public().await?)
    }

    /// Alle Stories von `autor`, auch private, neueste zuerst
    pub async fn eigene_auflisten(&self, autor: UserId) -> StoryResult<Vec<StoryRecord>> {
        Ok(self.repo.list_by_author(autor).await?)
    }
}
