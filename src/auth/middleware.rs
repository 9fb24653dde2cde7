//! Session extraction middleware.
//!
//! Runs on every request: reads the `JWT` cookie, verifies it, and attaches
//! an [`Identity`] extension on success. Fail-open: a missing, malformed,
//! tampered, or expired token just leaves the request anonymous. Route
//! gates ([`Identity`]/`AdminIdentity` extractors) decide whether an
//! anonymous request is acceptable.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use chrono::Utc;
use std::sync::Arc;
use tower_cookies::Cookies;

use super::cookie::SESSION_COOKIE;
use super::identity::Identity;
use crate::gateway::state::AppState;

pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    // An identity attached upstream wins; do not re-derive it.
    if request.extensions().get::<Identity>().is_none() {
        if let Some(cookie) = cookies.get(SESSION_COOKIE) {
            match state.token_codec.verify(cookie.value(), Utc::now()) {
                Ok(claims) => {
                    let identity = Identity::from_claims(&claims);
                    tracing::debug!("Session cookie verified for '{}'", identity.username);
                    request.extensions_mut().insert(identity);
                }
                Err(e) => {
                    // Anonymous is a valid outcome, not an error.
                    tracing::debug!("Ignoring session cookie: {}", e);
                }
            }
        }
    }

    next.run(request).await
}
