//! Authenticated identity and route-level gates.
//!
//! The session middleware attaches an [`Identity`] to request extensions
//! when the `JWT` cookie verifies. Handlers opt into protection by taking
//! `Identity` (any authenticated user) or [`AdminIdentity`] as an
//! extractor; anonymous requests are rejected before the handler body runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::token::Claims;
use crate::gateway::error::ApiError;

/// Fixed role set. Serialized as lowercase labels everywhere (wire, token,
/// database); the label is the single normalized representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse a role label. Unknown labels yield None so stale or foreign
    /// tokens degrade to fewer privileges instead of failing.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Request-scoped authenticated identity. Built by the session middleware,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub roles: Vec<Role>,
}

impl Identity {
    /// Map verified claims to an identity. Unknown role labels are dropped.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            username: claims.sub.clone(),
            roles: claims
                .roles
                .iter()
                .filter_map(|label| Role::from_label(label))
                .collect(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Identity that additionally holds the admin role. 401 when anonymous,
/// 403 when authenticated without admin.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        if !identity.is_admin() {
            return Err(ApiError::forbidden("Administrator role required"));
        }
        Ok(Self(identity))
    }
}
