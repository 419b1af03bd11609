use error_stack::{Report, ResultExt};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::{str::FromStr, time::Duration};

use crate::config;

mod error;
mod rows;
mod tickets;
mod users;

pub use self::error::*;
pub use self::tickets::PgTicketRepository;
pub use self::users::PgUserRepository;

pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;

static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Clone)]
pub struct Pool {
    pool: sqlx::PgPool,
}

impl Pool {
    /// Creates a lazily connected pool. No connection is made until
    /// the first query so the server can boot while Postgres is down.
    pub fn new(cfg: &config::Database) -> Result<Self> {
        let mut pool_opts = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(cfg.timeout_secs.get()))
            .max_connections(cfg.pool_size.get());

        if let Some(min_idle) = cfg.min_idle {
            pool_opts = pool_opts.min_connections(min_idle.get());
        }

        let mut connect_opts =
            PgConnectOptions::from_str(cfg.url.as_str()).change_context(Error::InvalidUrl)?;

        if cfg.enforce_tls {
            connect_opts = connect_opts.ssl_mode(PgSslMode::Require);
        }

        Ok(Self {
            pool: pool_opts.connect_lazy_with(connect_opts),
        })
    }
}

impl From<sqlx::PgPool> for Pool {
    fn from(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.pool, f)
    }
}

impl Pool {
    #[tracing::instrument(name = "db.connect", skip(self))]
    pub async fn get(&self) -> Result<PoolConnection> {
        if let Some(inner) = self.pool.try_acquire() {
            Ok(inner)
        } else {
            self.pool.acquire().await.into_db_error()
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn wait_until_healthy(&self) -> Result<()> {
        match self.pool.acquire().await {
            Ok(..) => Ok(()),
            Err(e) => Err(Report::new(e).change_context(Error::UnhealthyPool)),
        }
    }

    /// Applies every pending migration embedded in the binary.
    #[tracing::instrument(name = "db.migrate", skip(self))]
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .change_context(Error::Migration)?;

        tracing::info!(migrations = MIGRATOR.iter().count(), "database is up to date");
        Ok(())
    }
}
