use serde::Deserialize;
use std::num::NonZeroU64;
use std::time::Duration;
use validator::{ValidationError, ValidationErrors};

use crate::util::Sensitive;

#[derive(Debug, Deserialize)]
pub struct Auth {
    /// Secret used to sign and verify access tokens (HS256).
    ///
    /// **Environment variables**:
    /// - `HELPDESK_AUTH_JWT_SECRET` or `JWT_SECRET`
    pub jwt_secret: Sensitive<String>,
    /// How long an issued token stays valid. Defaults to one day.
    ///
    /// **Environment variables**:
    /// - `HELPDESK_AUTH_TOKEN_TTL_SECS`
    #[serde(default = "Auth::default_token_ttl_secs")]
    pub token_ttl_secs: NonZeroU64,
}

impl Auth {
    const JWT_SECRET_MIN: usize = 12;
    const JWT_SECRET_MAX: usize = 1024;

    const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60 * 24;

    const fn default_token_ttl_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TOKEN_TTL_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TOKEN_TTL_SECS is accidentally set to 0"),
        }
    }

    #[must_use]
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs.get())
    }

    pub(super) fn check(&self, errors: &mut ValidationErrors) {
        let len = self.jwt_secret.chars().count();
        if !(Self::JWT_SECRET_MIN..=Self::JWT_SECRET_MAX).contains(&len) {
            let mut error = ValidationError::new("length");
            error.message = Some("Invalid JWT secret key".into());
            errors.add("auth.jwt_secret", error);
        }
    }
}
