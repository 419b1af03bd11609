use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::auth::TokenKeys;
use crate::config;
use crate::database::{self, PgTicketRepository, PgUserRepository, ReportExt};
use crate::repositories::{TicketRepository, UserRepository};
use crate::services::{AuthService, TicketService};

/// Shared state of the server, constructed once at startup and
/// handed to every request handler.
#[derive(Debug, Clone)]
pub struct App {
    pub config: Arc<config::Server>,
    pub auth: AuthService,
    pub tickets: TicketService,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    #[tracing::instrument(skip_all)]
    pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
        let pool = database::Pool::new(&cfg.db).change_context(AppError)?;

        let healthy = match pool.wait_until_healthy().await {
            Ok(..) => true,
            // the pool reconnects lazily, requests will fail with 503 until then
            Err(error) if error.is_unhealthy() => {
                tracing::warn!(?error, "database is not reachable yet");
                false
            }
            Err(error) => return Err(error.change_context(AppError)),
        };

        if cfg.db.run_migrations && healthy {
            pool.migrate().await.change_context(AppError)?;
        } else if cfg.db.run_migrations {
            tracing::warn!("database is unreachable, skipping migrations");
        }

        let users = Arc::new(PgUserRepository::new(pool.clone()));
        let tickets = Arc::new(PgTicketRepository::new(pool));

        Ok(Self::from_parts(cfg, users, tickets))
    }

    /// Wires the services on top of any repository implementation.
    #[must_use]
    pub fn from_parts(
        cfg: config::Server,
        users: Arc<dyn UserRepository>,
        tickets: Arc<dyn TicketRepository>,
    ) -> Self {
        let keys = Arc::new(TokenKeys::from_config(&cfg.auth));
        Self {
            auth: AuthService::new(users, keys),
            tickets: TicketService::new(tickets),
            config: Arc::new(cfg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(App: Send, Sync, Clone);

    #[tokio::test]
    async fn should_boot_without_database() {
        let mut cfg = crate::test_utils::test_config();
        // nothing listens on port 1, the connection is refused right away
        cfg.db.url = crate::util::Sensitive::new("postgres://127.0.0.1:1/helpdesk".into());
        cfg.db.run_migrations = true;

        let app = App::new(cfg).await;
        assert!(app.is_ok(), "{app:?}");
    }
}
