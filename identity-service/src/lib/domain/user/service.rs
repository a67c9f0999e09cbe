use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Domain service implementation for registration, login and lookup.
///
/// Store calls and password hashing are each bounded by `operation_timeout`.
/// Hashing runs on the blocking pool so it never stalls the executor.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    operation_timeout: Duration,
    token_expiration_hours: Option<i64>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// Tokens are issued without expiration until
    /// [`with_token_expiration_hours`](Self::with_token_expiration_hours) says otherwise.
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            token_expiration_hours: None,
        }
    }

    pub fn with_operation_timeout(mut self, operation_timeout: Duration) -> Self {
        self.operation_timeout = operation_timeout;
        self
    }

    pub fn with_token_expiration_hours(mut self, expiration_hours: Option<i64>) -> Self {
        self.token_expiration_hours = expiration_hours;
        self
    }

    async fn bounded<T, F>(&self, operation: &'static str, future: F) -> Result<T, UserError>
    where
        F: Future<Output = Result<T, UserError>>,
    {
        tokio::time::timeout(self.operation_timeout, future)
            .await
            .unwrap_or(Err(UserError::Timeout(operation)))
    }

    async fn with_authenticator<T, F>(&self, operation: &'static str, f: F) -> Result<T, UserError>
    where
        F: FnOnce(&Authenticator) -> Result<T, UserError> + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);
        let task = tokio::task::spawn_blocking(move || f(&authenticator));

        match tokio::time::timeout(self.operation_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(UserError::Internal(format!(
                "{} task failed: {}",
                operation, join_error
            ))),
            Err(_) => Err(UserError::Timeout(operation)),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<UserProfile, UserError> {
        let existing = self
            .bounded("find user by email", self.repository.find_by_email(&command.email))
            .await?;
        if existing.is_some() {
            return Err(UserError::DuplicateEmail(command.email.to_string()));
        }

        let password = command.password;
        let password_hash = self
            .with_authenticator("hash password", move |authenticator| {
                authenticator
                    .hash_password(password.expose())
                    .map_err(UserError::from)
            })
            .await?;

        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = self
            .bounded("create user", self.repository.create(user))
            .await?;

        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user.profile())
    }

    async fn login(&self, command: LoginCommand) -> Result<String, UserError> {
        let user = self
            .bounded("find user by email", self.repository.find_by_email(&command.email))
            .await?
            .ok_or_else(|| UserError::NotFound(command.email.to_string()))?;

        let claims = auth::Claims::for_subject(user.id, self.token_expiration_hours);
        let password = command.password;
        let stored_hash = user.password_hash;

        let result = self
            .with_authenticator("authenticate", move |authenticator| {
                authenticator
                    .authenticate(password.expose(), &stored_hash, &claims)
                    .map_err(UserError::from)
            })
            .await?;

        tracing::info!(user_id = %user.id, "User authenticated");

        Ok(result.access_token)
    }

    async fn get_user(&self, id: &UserId) -> Result<UserProfile, UserError> {
        self.bounded("find user by id", self.repository.find_profile_by_id(id))
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
