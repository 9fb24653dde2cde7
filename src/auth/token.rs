//! Session token codec.
//!
//! Issues and verifies the HS256-signed JWTs that back login sessions.
//! The codec is pure: callers pass the clock in, so expiry is testable
//! without sleeping. Tokens are not revocable before expiry; logout only
//! clears the client cookie.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::identity::Role;
use crate::config::AuthConfig;

/// Minimum signing secret length for HS256.
pub const MIN_SECRET_BYTES: usize = 32;

/// JWT claims carried by a session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Role labels. Decoding is tolerant: a bare string, an array of
    /// strings, or a missing/odd-shaped claim all decode (the last two to
    /// an empty set). Verification never fails on the roles claim alone.
    #[serde(default, deserialize_with = "roles_claim")]
    pub roles: Vec<String>,
    /// Issued at (UTC timestamp, seconds)
    pub iat: i64,
    /// Expiration time (UTC timestamp, seconds)
    pub exp: i64,
}

fn roles_claim<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => vec![s],
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Why a token failed verification.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token has expired")]
    Expired,
}

/// Issues and verifies session tokens with a single process-wide key.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Build the codec from config. A missing or too-short secret falls
    /// back to an ephemeral random key: tokens then die with the process,
    /// which is acceptable for development only.
    pub fn from_config(config: &AuthConfig) -> Self {
        let ttl = Duration::hours(config.token_ttl_hours);
        match config.jwt_secret.as_deref() {
            Some(secret) if secret.len() >= MIN_SECRET_BYTES => Self::new(secret.as_bytes(), ttl),
            configured => {
                if configured.is_some() {
                    tracing::warn!(
                        "Configured JWT secret is shorter than {} bytes, ignoring it",
                        MIN_SECRET_BYTES
                    );
                }
                let key: [u8; 32] = rand::random();
                tracing::warn!(
                    "Using a generated JWT signing key (development only); \
                     sessions will not survive a restart"
                );
                Self::new(&key, ttl)
            }
        }
    }

    /// Session lifetime, also used for the cookie Max-Age.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a signed token for `username` carrying `roles`, valid from
    /// `now` until `now + ttl`.
    pub fn issue(&self, username: &str, roles: &[Role], now: DateTime<Utc>) -> Result<String> {
        let expiration = now
            .checked_add_signed(self.ttl)
            .context("token expiry out of range")?;

        let claims = Claims {
            sub: username.to_string(),
            roles: roles.iter().map(|r| r.label().to_string()).collect(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).context("Failed to generate token")
    }

    /// Verify signature and expiry against the supplied clock. Claims are
    /// only returned for a fully verified token.
    ///
    /// The library's own exp check is disabled so expiry is compared to
    /// `now` here (no hidden leeway, no system clock).
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, VerifyError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => VerifyError::BadSignature,
                _ => VerifyError::Malformed,
            }
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(VerifyError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TEST_SECRET: &[u8] = b"test-secret-test-secret-test-secret!";

    fn codec() -> TokenCodec {
        TokenCodec::new(TEST_SECRET, Duration::hours(4))
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let codec = codec();
        let token = codec.issue("alice", &[Role::User], t0()).unwrap();

        let claims = codec.verify(&token, t0() + Duration::minutes(5)).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, vec!["user".to_string()]);
        assert_eq!(claims.iat, t0().timestamp());
        assert_eq!(claims.exp, (t0() + Duration::hours(4)).timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = codec();
        let token = codec.issue("alice", &[Role::User], t0()).unwrap();

        // Valid strictly before exp, Expired at and after it.
        let just_before = t0() + Duration::hours(4) - Duration::seconds(1);
        assert!(codec.verify(&token, just_before).is_ok());

        let at_exp = t0() + Duration::hours(4);
        assert_eq!(codec.verify(&token, at_exp), Err(VerifyError::Expired));

        let later = t0() + Duration::hours(5);
        assert_eq!(codec.verify(&token, later), Err(VerifyError::Expired));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let codec = codec();
        let token = codec.issue("alice", &[Role::Admin], t0()).unwrap();

        // Flip the last signature character.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert_eq!(
            codec.verify(&tampered, t0()),
            Err(VerifyError::BadSignature)
        );
    }

    #[test]
    fn test_wrong_key_rejected() {
        let codec = codec();
        let other = TokenCodec::new(b"another-secret-another-secret-32", Duration::hours(4));
        let token = other.issue("alice", &[Role::User], t0()).unwrap();

        assert_eq!(codec.verify(&token, t0()), Err(VerifyError::BadSignature));
    }

    #[test]
    fn test_garbage_token_malformed() {
        let codec = codec();
        assert_eq!(
            codec.verify("not-a-jwt", t0()),
            Err(VerifyError::Malformed)
        );
        assert_eq!(codec.verify("", t0()), Err(VerifyError::Malformed));
        assert_eq!(
            codec.verify("a.b.c", t0()),
            Err(VerifyError::Malformed)
        );
    }

    #[test]
    fn test_roles_claim_accepts_string_or_array() {
        let single: Claims = serde_json::from_value(serde_json::json!({
            "sub": "alice", "roles": "admin", "iat": 0, "exp": 1
        }))
        .unwrap();
        assert_eq!(single.roles, vec!["admin".to_string()]);

        let array: Claims = serde_json::from_value(serde_json::json!({
            "sub": "alice", "roles": ["user", "admin"], "iat": 0, "exp": 1
        }))
        .unwrap();
        assert_eq!(array.roles, vec!["user".to_string(), "admin".to_string()]);
    }

    #[test]
    fn test_roles_claim_tolerates_missing_or_odd_shapes() {
        let missing: Claims = serde_json::from_value(serde_json::json!({
            "sub": "alice", "iat": 0, "exp": 1
        }))
        .unwrap();
        assert!(missing.roles.is_empty());

        let number: Claims = serde_json::from_value(serde_json::json!({
            "sub": "alice", "roles": 42, "iat": 0, "exp": 1
        }))
        .unwrap();
        assert!(number.roles.is_empty());

        // Non-string elements are skipped, not fatal.
        let mixed: Claims = serde_json::from_value(serde_json::json!({
            "sub": "alice", "roles": ["user", 7, null], "iat": 0, "exp": 1
        }))
        .unwrap();
        assert_eq!(mixed.roles, vec!["user".to_string()]);
    }

    #[test]
    fn test_missing_exp_is_malformed() {
        // Hand-build a token without an exp claim.
        #[derive(Serialize)]
        struct NoExp {
            sub: String,
            iat: i64,
        }
        let token = encode(
            &Header::default(),
            &NoExp {
                sub: "alice".to_string(),
                iat: 0,
            },
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();

        assert_eq!(
            codec().verify(&token, t0()),
            Err(VerifyError::Malformed)
        );
    }

    #[test]
    fn test_short_secret_falls_back_to_generated_key() {
        let config = AuthConfig {
            jwt_secret: Some("too-short".to_string()),
            token_ttl_hours: 4,
            cookie_secure: false,
            cookie_same_site: "lax".to_string(),
        };
        let codec = TokenCodec::from_config(&config);
        let token = codec.issue("alice", &[Role::User], t0()).unwrap();

        // Generated key still round-trips within the same process.
        assert!(codec.verify(&token, t0() + Duration::minutes(1)).is_ok());

        // A codec built from the configured short secret must not accept it.
        let from_short = TokenCodec::new(b"too-short", Duration::hours(4));
        assert_eq!(
            from_short.verify(&token, t0()),
            Err(VerifyError::BadSignature)
        );
    }
}
