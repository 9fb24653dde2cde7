//! OpenAPI documentation
//!
//! Auto-generated OpenAPI 3.0 document for the taskhive API, served at
//! `/api-docs/openapi.json` and exportable via the `export_openapi` bin.

use axum::Json;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::handlers::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserData,
};
use crate::auth::identity::Role;
use crate::gateway::health::HealthResponse;
use crate::tasks::model::{CreateTaskRequest, TaskData, ToggleDoneRequest, UpdateTaskRequest};

/// Session cookie security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "JWT",
                    "HTTP-only session cookie issued by POST /auth/login",
                ))),
            );
        }
    }
}

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskhive API",
        version = "1.0.0",
        description = "Multi-tenant to-do service with cookie-based JWT sessions. \
                       Admins see and manage all tasks; users only their own.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development"),
    ),
    paths(
        crate::gateway::health::health_check,
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,
        crate::tasks::handlers::list_tasks,
        crate::tasks::handlers::create_task,
        crate::tasks::handlers::update_task,
        crate::tasks::handlers::toggle_done,
        crate::tasks::handlers::delete_task,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            MessageResponse,
            UserData,
            Role,
            TaskData,
            CreateTaskRequest,
            UpdateTaskRequest,
            ToggleDoneRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "System", description = "Service health"),
        (name = "Auth", description = "Registration and session management"),
        (name = "Tasks", description = "Task management (session required)")
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_covers_all_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/auth/register",
            "/auth/login",
            "/auth/logout",
            "/auth/me",
            "/tasks",
            "/tasks/{id}",
            "/tasks/{id}/done",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_document_serializes_with_security_scheme() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Taskhive API");

        let components = doc.components.as_ref().expect("components section");
        assert!(components.security_schemes.contains_key("session_cookie"));

        let json = doc.to_json().expect("document should serialize");
        assert!(json.contains("session_cookie"));
    }
}
