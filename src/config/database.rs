use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use validator::{ValidationError, ValidationErrors};

use crate::util::Sensitive;

/// Configuration for connecting to the Postgres database
#[derive(Debug, Deserialize)]
pub struct Database {
    /// Connection URL connecting to the Postgres database.
    ///
    /// **Environment variables**:
    /// - `HELPDESK_DB_URL` or `DATABASE_URL`
    pub url: Sensitive<String>,
    /// Maximum amount of connections the pool may hold.
    ///
    /// **Environment variables**:
    /// - `HELPDESK_DB_POOL_SIZE`
    #[serde(default = "Database::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// Minimum idle database connections just to avoid wasting
    /// hardware resources from the database server.
    ///
    /// **Environment variables**:
    /// - `HELPDESK_DB_MIN_IDLE`
    #[serde(default)]
    pub min_idle: Option<NonZeroU32>,
    /// How long this server can wait until a connection from
    /// the pool is acquired before giving up.
    ///
    /// **Environment variables**:
    /// - `HELPDESK_DB_TIMEOUT_SECS`
    #[serde(default = "Database::default_timeout_secs")]
    pub timeout_secs: NonZeroU64,
    /// Forces all database connections to be encrypted with TLS.
    ///
    /// **Environment variables**:
    /// - `HELPDESK_DB_ENFORCE_TLS`
    #[serde(default)]
    pub enforce_tls: bool,
    /// Applies pending migrations before the server starts.
    ///
    /// **Environment variables**:
    /// - `HELPDESK_DB_RUN_MIGRATIONS`
    #[serde(default = "Database::default_run_migrations")]
    pub run_migrations: bool,
}

impl Database {
    const DEFAULT_POOL_SIZE: u32 = 5;
    const DEFAULT_TIMEOUT_SECS: u64 = 5;

    // Required by serde
    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }

    const fn default_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
        }
    }

    const fn default_run_migrations() -> bool {
        true
    }

    pub(super) fn check(&self, errors: &mut ValidationErrors) {
        if url::Url::parse(self.url.as_str()).is_err() {
            let mut error = ValidationError::new("url");
            error.message = Some("Invalid Postgres connection URL".into());
            errors.add("db.url", error);
        }

        if let Some(min_idle) = self.min_idle {
            if min_idle > self.pool_size {
                let mut error = ValidationError::new("range");
                error.message = Some("min_idle must not exceed pool_size".into());
                errors.add("db.min_idle", error);
            }
        }
    }
}
