pub mod error;
pub mod health;
pub mod openapi;
pub mod state;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;

use crate::auth;
use crate::config::CorsConfig;
use crate::tasks;
use state::AppState;

/// Build the CORS layer from configured origins. Credentials are allowed
/// so the session cookie flows on cross-origin requests; that rules out a
/// wildcard origin.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring unparseable CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Assemble the full application router. Shared by the server and the
/// integration tests.
pub fn build_router(state: Arc<AppState>) -> Router {
    // ==========================================================================
    // Auth routes (public; /auth/me gates itself via the Identity extractor)
    // ==========================================================================
    let auth_routes = Router::new()
        .route("/register", post(auth::handlers::register))
        .route("/login", post(auth::handlers::login))
        .route("/logout", post(auth::handlers::logout))
        .route("/me", get(auth::handlers::me));

    // ==========================================================================
    // Task routes (Identity/AdminIdentity extractors enforce the gate)
    // ==========================================================================
    let task_routes = Router::new()
        .route(
            "/tasks",
            get(tasks::handlers::list_tasks).post(tasks::handlers::create_task),
        )
        .route(
            "/tasks/{id}",
            put(tasks::handlers::update_task).delete(tasks::handlers::delete_task),
        )
        .route("/tasks/{id}/done", patch(tasks::handlers::toggle_done));

    let cors = cors_layer(&state.cors);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi::serve_openapi))
        .nest("/auth", auth_routes)
        .merge(task_routes)
        // Session extraction runs on every route; CookieManagerLayer must
        // wrap it so the Cookies extractor has parsed cookies to read.
        .layer(from_fn_with_state(
            state.clone(),
            auth::middleware::session_middleware,
        ))
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {}: {}", addr, e);
            eprintln!(
                "   Hint: Port {} may already be in use. Check with: lsof -i :{}",
                port, port
            );
            std::process::exit(1);
        }
    };

    println!("🚀 taskhive listening on http://{}", addr);
    println!("📖 OpenAPI JSON: http://{}/api-docs/openapi.json", addr);
    println!("🔓 Auth API:  /auth/*");
    println!("🔒 Task API:  /tasks (session cookie required)");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
