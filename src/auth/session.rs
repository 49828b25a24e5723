use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{SecurityConfig, MAX_JWT_EXPIRY_HOURS};

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Admin username
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("JWT generation error: {0}")]
    Signing(String),
}

/// Issues and verifies HS256 bearer tokens signed with the server secret.
///
/// A token is valid while `now < exp`; there is no revocation and no
/// refresh, so a token dies only by expiring.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        let hours = config.jwt_expiry_hours.min(MAX_JWT_EXPIRY_HOURS) as i64;
        Self::new(config.jwt_secret.as_bytes(), Duration::hours(hours))
    }

    pub fn issue(&self, username: &str) -> Result<String, SessionError> {
        self.issue_at(username, Utc::now())
    }

    pub fn issue_at(&self, username: &str, now: DateTime<Utc>) -> Result<String, SessionError> {
        let claims = Claims {
            sub: username.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Signing(e.to_string()))
    }

    /// Returns the token's subject.
    pub fn verify(&self, token: &str) -> Result<String, SessionError> {
        self.verify_at(token, Utc::now())
    }

    /// Signature and structure are checked first, so a forged token reports
    /// `Invalid` even when its claimed expiry has passed.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, SessionError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| SessionError::Invalid)?;

        if now.timestamp() >= token_data.claims.exp {
            return Err(SessionError::Expired);
        }
        Ok(token_data.claims.sub)
    }
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("algorithm", &ALGORITHM)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> SessionIssuer {
        SessionIssuer::new(b"test-secret", Duration::hours(24))
    }

    #[test]
    fn fresh_token_verifies_to_subject() {
        let issuer = issuer();
        let token = issuer.issue("admin").unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), "admin");
    }

    #[test]
    fn token_expires_after_ttl() {
        let issuer = issuer();
        let issued = Utc::now();
        let token = issuer.issue_at("admin", issued).unwrap();

        let just_before = issued + Duration::hours(24) - Duration::seconds(1);
        assert_eq!(issuer.verify_at(&token, just_before).unwrap(), "admin");

        let at_expiry = issued + Duration::hours(24);
        assert_eq!(issuer.verify_at(&token, at_expiry), Err(SessionError::Expired));
        assert_eq!(
            issuer.verify_at(&token, issued + Duration::days(3)),
            Err(SessionError::Expired)
        );
    }

    #[test]
    fn foreign_secret_is_invalid() {
        let other = SessionIssuer::new(b"another-secret", Duration::hours(24));
        let token = other.issue("admin").unwrap();
        assert_eq!(issuer().verify(&token), Err(SessionError::Invalid));
    }

    #[test]
    fn swapped_signature_is_invalid_not_expired() {
        let issuer = issuer();
        let past = Utc::now() - Duration::days(7);
        let expired = issuer.issue_at("admin", past).unwrap();
        let other = SessionIssuer::new(b"another-secret", Duration::hours(24))
            .issue_at("admin", past)
            .unwrap();

        let mut parts: Vec<&str> = expired.split('.').collect();
        let foreign_sig = other.rsplit('.').next().unwrap();
        parts[2] = foreign_sig;
        let tampered = parts.join(".");

        assert_eq!(issuer.verify(&expired), Err(SessionError::Expired));
        assert_eq!(issuer.verify(&tampered), Err(SessionError::Invalid));
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let issuer = issuer();
        let token = issuer.issue("admin").unwrap();
        let other = issuer.issue("intruder").unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let other_payload = other.split('.').nth(1).unwrap();
        let tampered = format!("{}.{}.{}", parts[0], other_payload, parts[2]);
        assert_eq!(issuer.verify(&tampered), Err(SessionError::Invalid));
    }

    #[test]
    fn garbage_is_invalid() {
        let issuer = issuer();
        assert_eq!(issuer.verify(""), Err(SessionError::Invalid));
        assert_eq!(issuer.verify("not.a.jwt"), Err(SessionError::Invalid));
        assert_eq!(issuer.verify("abc"), Err(SessionError::Invalid));
    }
}
