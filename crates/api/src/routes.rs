//! Route-Definitionen fuer die REST-API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use fabula_observability::timing_middleware;

use crate::handlers;
use crate::middleware::zugangs_middleware;
use crate::state::ApiState;

/// Erstellt den vollstaendigen Router mit Zugangs-Gate und Request-Metriken
pub fn router(state: ApiState) -> Router {
    let geschuetzt = Router::new()
        // Stories
        .route(
            "/stories",
            post(handlers::stories::create_story).get(handlers::stories::list_stories),
        )
        .route("/stories/my", get(handlers::stories::list_my_stories))
        .route("/stories/generate", post(handlers::stories::generate))
        // Admin
        .route("/admin/logins", get(handlers::admin::get_login_logs))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            zugangs_middleware,
        ));

    Router::new()
        .route("/", get(handlers::auth::wurzel))
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .merge(geschuetzt)
        .layer(middleware::from_fn_with_state(
            state.metriken.clone(),
            timing_middleware,
        ))
        .with_state(state)
}
