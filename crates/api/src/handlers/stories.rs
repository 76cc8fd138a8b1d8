//! REST-Handler fuer Stories und Schreibvorschlaege

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use fabula_db::models::StoryRecord;
use fabula_stories::{vorschlag_generieren, VorschlagsModus};

use crate::error::ApiResult;
use crate::middleware::Angemeldet;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct StoryErstellenBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "isPublic", alias = "is_public")]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct VorschlagBody {
    #[serde(default)]
    pub context: String,
    pub mode: Option<String>,
}

/// Story in der JSON-Darstellung der API
#[derive(Debug, Serialize)]
pub struct StoryAntwort {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_public: bool,
    pub author_id: Option<Uuid>,
    pub author_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<StoryRecord> for StoryAntwort {
    fn from(r: StoryRecord) -> Self {
        Self {
            id: r.id.inner(),
            title: r.titel,
            content: r.inhalt,
            is_public: r.oeffentlich,
            author_id: r.autor_id.map(|id| id.inner()),
            author_email: r.autor_email,
            created_at: r.erstellt_am,
        }
    }
}

fn stories_json(records: Vec<StoryRecord>) -> Json<Value> {
    let stories: Vec<StoryAntwort> = records.into_iter().map(StoryAntwort::from).collect();
    Json(json!({ "stories": stories }))
}

/// POST /stories
pub async fn create_story(
    State(state): State<ApiState>,
    Angemeldet(ich): Angemeldet,
    body: Result<Json<StoryErstellenBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;

    let story = state
        .stories
        .erstellen(ich.user_id, &body.title, &body.content, body.is_public)
        .await?;

    Ok(Json(json!({ "message": "Story angelegt", "id": story.id.inner() })))
}

/// GET /stories – alle oeffentlichen Stories
pub async fn list_stories(
    State(state): State<ApiState>,
    _ich: Angemeldet,
) -> ApiResult<Json<Value>> {
    let records = state.stories.oeffentliche_auflisten().await?;
    Ok(stories_json(records))
}

/// GET /stories/my – eigene Stories inklusive privater
pub async fn list_my_stories(
    State(state): State<ApiState>,
    Angemeldet(ich): Angemeldet,
) -> ApiResult<Json<Value>> {
    let records = state.stories.eigene_auflisten(ich.user_id).await?;
    Ok(stories_json(records))
}

/// POST /stories/generate
pub async fn generate(
    _ich: Angemeldet,
    body: Result<Json<VorschlagBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    let modus = VorschlagsModus::aus_text(body.mode.as_deref());
    let vorschlag = vorschlag_generieren(&body.context, modus);
    Ok(Json(json!({ "suggestion": vorschlag })))
}
