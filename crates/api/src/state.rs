//! Geteilter Axum-State der REST-API

use std::sync::Arc;

use fabula_auth::{AuthKonfig, AuthResult, AuthService, TokenDienst, ZugangsGate};
use fabula_db::SqliteDb;
use fabula_observability::FabulaMetriken;
use fabula_stories::StoryService;

/// AuthService gegen die SQLite-Repositories
pub type DbAuthService = AuthService<SqliteDb, SqliteDb>;

/// Axum-State fuer alle Handler
#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<DbAuthService>,
    pub stories: Arc<StoryService<SqliteDb>>,
    pub gate: Arc<ZugangsGate>,
    pub metriken: FabulaMetriken,
}

impl ApiState {
    /// Verdrahtet Services und Gate auf einer gemeinsamen Datenbank
    ///
    /// Derselbe `TokenDienst` stellt beim Login aus und prueft im Gate.
    pub fn neu(
        db: Arc<SqliteDb>,
        tokens: Arc<TokenDienst>,
        auth_konfig: AuthKonfig,
        metriken: FabulaMetriken,
    ) -> AuthResult<Self> {
        let auth = AuthService::neu(
            Arc::clone(&db),
            Arc::clone(&db),
            Arc::clone(&tokens),
            auth_konfig,
        )?;

        Ok(Self {
            auth: Arc::new(auth),
            stories: StoryService::neu(db),
            gate: Arc::new(ZugangsGate::neu(tokens)),
            metriken,
        })
    }
}
