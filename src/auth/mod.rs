//! Authentication and session management.
//!
//! Cookie-transported JWT sessions: login issues a signed token, the
//! session middleware turns it back into a request-scoped identity, and
//! the extractors gate protected routes.
//!
//! ## Components
//! - `token`: HS256 session token codec (issue/verify)
//! - `password`: argon2 password hashing
//! - `identity`: `Role`, `Identity` and the route-gate extractors
//! - `middleware`: fail-open session extraction from the `JWT` cookie
//! - `cookie`: session cookie construction for login/logout
//! - `handlers`: register/login/logout/me endpoints

pub mod cookie;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod token;

// Re-export for convenience
pub use cookie::SESSION_COOKIE;
pub use identity::{AdminIdentity, Identity, Role};
pub use middleware::session_middleware;
pub use token::{Claims, TokenCodec, VerifyError};
