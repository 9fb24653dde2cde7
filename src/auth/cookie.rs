//! Session cookie construction.
//!
//! Login and logout build their `Set-Cookie` through the same constructor
//! so the attribute set (HttpOnly, Path, SameSite, Secure) cannot drift
//! between the two.

use tower_cookies::Cookie;
use tower_cookies::cookie::SameSite;
use tower_cookies::cookie::time::Duration as CookieDuration;

use crate::config::AuthConfig;

/// Name of the session cookie holding the JWT.
pub const SESSION_COOKIE: &str = "JWT";

fn same_site(config: &AuthConfig) -> SameSite {
    match config.cookie_same_site.as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    }
}

fn build(value: String, max_age: CookieDuration, config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .path("/")
        .same_site(same_site(config))
        .secure(config.cookie_secure)
        .max_age(max_age)
        .build()
}

/// Cookie carrying a fresh session token. Max-Age matches the token TTL.
pub fn session_cookie(
    token: String,
    ttl: chrono::Duration,
    config: &AuthConfig,
) -> Cookie<'static> {
    build(token, CookieDuration::seconds(ttl.num_seconds()), config)
}

/// Cookie that clears the session on the client (empty value, Max-Age 0).
pub fn removal_cookie(config: &AuthConfig) -> Cookie<'static> {
    build(String::new(), CookieDuration::ZERO, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: None,
            token_ttl_hours: 4,
            cookie_secure: true,
            cookie_same_site: "lax".to_string(),
        }
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok123".to_string(), chrono::Duration::hours(4), &config());
        assert_eq!(cookie.name(), "JWT");
        assert_eq!(cookie.value(), "tok123");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(CookieDuration::hours(4)));
    }

    #[test]
    fn test_removal_cookie_clears_value() {
        let cookie = removal_cookie(&config());
        assert_eq!(cookie.name(), "JWT");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_same_site_from_config() {
        let mut c = config();
        c.cookie_same_site = "strict".to_string();
        assert_eq!(
            removal_cookie(&c).same_site(),
            Some(SameSite::Strict)
        );
        c.cookie_same_site = "unknown".to_string();
        assert_eq!(removal_cookie(&c).same_site(), Some(SameSite::Lax));
    }
}
