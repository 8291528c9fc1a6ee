use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub verifier: Arc<dyn TokenVerifier>,
}
