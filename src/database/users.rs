use async_trait::async_trait;

use super::rows::UserRow;
use super::{ErrorExt, Pool, Result};
use crate::models::{NewUser, User};
use crate::repositories::UserRepository;

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: Pool,
}

impl PgUserRepository {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[tracing::instrument(skip_all, name = "db.users.find_by_email")]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = self.pool.get().await?;
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *conn)
            .await
            .into_db_error()?
            .map(User::try_from)
            .transpose()
    }

    #[tracing::instrument(skip_all, name = "db.users.create")]
    async fn create(&self, user: NewUser) -> Result<User> {
        let mut conn = self.pool.get().await?;
        let row = sqlx::query_as::<_, UserRow>(
            r"INSERT INTO users (email, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *",
        )
        .bind(user.email)
        .bind(user.name)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&mut *conn)
        .await
        .into_db_error()?;

        User::try_from(row)
    }
}
