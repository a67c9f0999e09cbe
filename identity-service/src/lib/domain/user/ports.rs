use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated name, email and confirmed password
    ///
    /// # Returns
    /// Profile of the stored user
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `Store` - Persistence failed or timed out
    async fn register(&self, command: RegisterUserCommand) -> Result<UserProfile, UserError>;

    /// Verify credentials and issue an access token bound to the user id.
    ///
    /// # Arguments
    /// * `command` - Email and plaintext password
    ///
    /// # Returns
    /// Signed access token
    ///
    /// # Errors
    /// * `NotFound` - No user with this email
    /// * `InvalidCredentials` - Password does not match
    /// * `Password` / `Token` - Verification or signing failed
    /// * `Store` - Lookup failed or timed out
    async fn login(&self, command: LoginCommand) -> Result<String, UserError>;

    /// Retrieve a user's profile (never the password hash).
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Store` - Lookup failed or timed out
    async fn get_user(&self, id: &UserId) -> Result<UserProfile, UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Storage-level uniqueness rejected the email
    /// * `Store` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve the full user record, hash included, by email.
    ///
    /// # Errors
    /// * `Store` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve a user by identifier without selecting the password hash.
    ///
    /// # Errors
    /// * `Store` - Database operation failed
    async fn find_profile_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, UserError>;
}
