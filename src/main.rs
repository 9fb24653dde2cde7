//! taskhive - Multi-Tenant To-Do Service
//!
//! This is the main entry point. Architecture:
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌──────────┐    ┌──────────┐
//! │  Client  │───▶│ Session      │───▶│  Route   │───▶│  Stores  │
//! │ (cookie) │    │ Middleware   │    │  Gates   │    │ (PG/mem) │
//! └──────────┘    └──────────────┘    └──────────┘    └──────────┘
//!
//! Session middleware responsibilities:
//! - Verify the JWT cookie (fail-open: bad token = anonymous)
//! - Attach the request-scoped Identity
//! - Leave all rejection decisions to the route gates
//! ```

use std::sync::Arc;

use taskhive::auth::token::TokenCodec;
use taskhive::config::AppConfig;
use taskhive::db::Database;
use taskhive::gateway::run_server;
use taskhive::gateway::state::AppState;
use taskhive::store::{
    MemoryTaskStore, MemoryUserStore, PgTaskStore, PgUserStore, TaskStore, UserStore, init_schema,
};

// ============================================================
// CLI ARGUMENTS
// ============================================================

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

// ============================================================
// MAIN
// ============================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env);
    let _log_guard = taskhive::logging::init_logging(&app_config);

    tracing::info!("Starting taskhive in {} mode", env);

    // Get Gateway config from YAML, allow --port override
    let gateway_config = &app_config.gateway;
    let port = get_port_override().unwrap_or(gateway_config.port);

    // Stores: PostgreSQL when configured, otherwise in-memory (development)
    let (user_store, task_store, db): (Arc<dyn UserStore>, Arc<dyn TaskStore>, Option<_>) =
        match app_config.postgres_url.as_deref() {
            Some(url) => {
                println!("[Store] Connecting to PostgreSQL...");
                let db = Arc::new(Database::connect(url).await?);
                init_schema(db.pool()).await?;
                println!("✅ PostgreSQL connected and schema initialized");
                (
                    Arc::new(PgUserStore::new(db.pool().clone())),
                    Arc::new(PgTaskStore::new(db.pool().clone())),
                    Some(db),
                )
            }
            None => {
                tracing::warn!(
                    "No postgres_url configured; using in-memory stores \
                     (development only, data is lost on restart)"
                );
                println!("⚠️  In-memory stores (no postgres_url configured)");
                (
                    Arc::new(MemoryUserStore::new()),
                    Arc::new(MemoryTaskStore::new()),
                    None,
                )
            }
        };

    let token_codec = TokenCodec::from_config(&app_config.auth);

    let state = Arc::new(AppState::new(
        user_store,
        task_store,
        token_codec,
        app_config.auth.clone(),
        app_config.cors.clone(),
        db,
    ));

    run_server(&gateway_config.host, port, state).await;

    Ok(())
}
