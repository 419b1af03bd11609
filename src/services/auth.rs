use error_stack::ResultExt;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use validator::Validate;

use crate::auth::{password, Claims, DecodeJwtError, TokenKeys};
use crate::database::ReportExt;
use crate::error::{ApiError, ErrorCategory, Result};
use crate::models::{NewUser, PublicUser, Role, User};
use crate::repositories::UserRepository;
use crate::types::form::auth::{AuthResponse, LoginUser, RegisterUser};
use crate::util::validation::normalize_email;

/// Registers and authenticates users, and issues or verifies
/// their access tokens.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenKeys>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenKeys>) -> Self {
        Self { users, tokens }
    }

    #[tracing::instrument(skip_all, name = "services.auth.register")]
    pub async fn register(&self, form: RegisterUser) -> Result<AuthResponse> {
        form.validate()?;

        let email = normalize_email(&form.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::new(ErrorCategory::UserAlreadyExists));
        }

        let password = form.password.into_inner();
        let password_hash = spawn_blocking(move || password::hash(&password))
            .await?
            .map_err(ApiError::internal)?;

        let new_user = NewUser {
            email,
            name: form.name.trim().to_string(),
            password_hash,
            role: Role::User,
        };

        let user = match self.users.create(new_user).await {
            Ok(user) => user,
            // Someone else took the email between the lookup and the insert.
            Err(error) if error.is_unique_violation() => {
                return Err(ApiError::new(ErrorCategory::UserAlreadyExists));
            }
            Err(error) => return Err(error.into()),
        };

        tracing::info!(user.id = %user.id, "registered new user");
        self.respond(&user)
    }

    #[tracing::instrument(skip_all, name = "services.auth.login")]
    pub async fn login(&self, form: LoginUser) -> Result<AuthResponse> {
        let email = normalize_email(&form.email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(ApiError::new(ErrorCategory::InvalidCredentials));
        };

        let password = form.password.into_inner();
        let password_hash = user.password_hash.clone();
        let matched = spawn_blocking(move || password::verify(&password, &password_hash))
            .await?
            .map_err(ApiError::internal)?;

        if !matched {
            return Err(ApiError::new(ErrorCategory::InvalidCredentials));
        }

        self.respond(&user)
    }

    /// Checks the token signature and expiry and returns the identity
    /// stored inside of it.
    #[tracing::instrument(skip_all, name = "services.auth.verify_token")]
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.tokens.decode(token).map_err(|error| {
            if error.current_context() == &DecodeJwtError::Expired {
                tracing::debug!("rejected expired token");
            }
            ApiError::new(ErrorCategory::Unauthorized)
        })
    }

    fn respond(&self, user: &User) -> Result<AuthResponse> {
        let token = self
            .tokens
            .issue(user)
            .attach_printable_lazy(|| format!("user id = {}", user.id))
            .map_err(ApiError::internal)?;

        Ok(AuthResponse {
            token: token.into(),
            user: PublicUser::from(user),
        })
    }
}
