use std::sync::Arc;

use crate::auth::token::TokenCodec;
use crate::config::{AuthConfig, CorsConfig};
use crate::db::Database;
use crate::store::{TaskStore, UserStore};

/// Shared application state. Handlers receive it as `Arc<AppState>`; the
/// codec and config fields are read-only after startup, the stores
/// synchronize internally.
pub struct AppState {
    pub user_store: Arc<dyn UserStore>,
    pub task_store: Arc<dyn TaskStore>,
    pub token_codec: TokenCodec,
    pub auth_config: AuthConfig,
    pub cors: CorsConfig,
    /// Present only when running against PostgreSQL; health checks ping it.
    pub db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        task_store: Arc<dyn TaskStore>,
        token_codec: TokenCodec,
        auth_config: AuthConfig,
        cors: CorsConfig,
        db: Option<Arc<Database>>,
    ) -> Self {
        Self {
            user_store,
            task_store,
            token_codec,
            auth_config,
            cors,
            db,
        }
    }
}
