use chrono::Utc;
use error_stack::{Report, Result, ResultExt};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config;
use crate::models::{PublicUser, Role, User};
use crate::types::UserId;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Identity carried inside an access token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Claims {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub fn for_user(user: &User, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            name: user.name.clone(),
            iat: now,
            exp: now.saturating_add(ttl),
        }
    }
}

impl From<Claims> for PublicUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}

#[derive(Debug, Error)]
#[error("Failed to encode as JWT")]
pub struct EncodeJwtError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeJwtError {
    #[error("Invalid token")]
    Invalid,
    #[error("Token has expired")]
    Expired,
}

/// Signing and verification keys derived from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 30;
        validation.validate_exp = true;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    #[must_use]
    pub fn from_config(config: &config::Auth) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.token_ttl())
    }

    /// Issues a fresh token for the user.
    pub fn issue(&self, user: &User) -> Result<String, EncodeJwtError> {
        self.encode(&Claims::for_user(user, self.ttl))
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, EncodeJwtError> {
        jsonwebtoken::encode(&Header::new(JWT_ALGORITHM), claims, &self.encoding)
            .change_context(EncodeJwtError)
            .attach_printable("could not encode login jwt claims")
    }

    pub fn decode(&self, token: &str) -> Result<Claims, DecodeJwtError> {
        match jsonwebtoken::decode::<Claims>(token.trim(), &self.decoding, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(error) => {
                let context = match error.kind() {
                    ErrorKind::ExpiredSignature => DecodeJwtError::Expired,
                    _ => DecodeJwtError::Invalid,
                };
                Err(Report::new(error).change_context(context))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        let now = Utc::now();
        User {
            id: UserId::new(1),
            email: "alice@example.com".into(),
            name: "Alice".into(),
            password_hash: String::new(),
            role: Role::Admin,
            created_at: now,
            updated_at: now,
        }
    }

    fn keys() -> TokenKeys {
        TokenKeys::new(b"super secret signing key", Duration::from_secs(86_400))
    }

    #[test]
    fn should_round_trip_claims() {
        let keys = keys();
        let token = keys.issue(&alice()).unwrap();
        let claims = keys.decode(&token).unwrap();

        assert_eq!(claims.id, UserId::new(1));
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.name, "Alice");
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn should_reject_foreign_signature() {
        let token = TokenKeys::new(b"another signing key!", Duration::from_secs(60))
            .issue(&alice())
            .unwrap();

        let error = keys().decode(&token).unwrap_err();
        assert_eq!(error.current_context(), &DecodeJwtError::Invalid);
    }

    #[test]
    fn should_reject_expired_token() {
        let keys = keys();
        let mut claims = Claims::for_user(&alice(), Duration::from_secs(60));
        claims.iat -= 7200;
        claims.exp -= 7200;

        let token = keys.encode(&claims).unwrap();
        let error = keys.decode(&token).unwrap_err();
        assert_eq!(error.current_context(), &DecodeJwtError::Expired);
    }

    #[test]
    fn should_reject_garbage() {
        let error = keys().decode("definitely.not.ajwt").unwrap_err();
        assert_eq!(error.current_context(), &DecodeJwtError::Invalid);
    }
}
