//! Admin authentication service.
//!
//! Password login issuing signed session tokens, super-admin-only
//! registration, and emailed password reset links.

mod error;
pub mod tokens;

pub use error::AuthError;
pub use tokens::{Claims, TokenPurpose, TokenService};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use dondra_core::Email;

use crate::db::RepositoryError;
use crate::db::admin_users::AdminUserRepository;
use crate::models::admin_user::{AdminRole, AdminUser};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginSession {
    pub user: AdminUser,
    pub token: String,
}

/// Admin authentication service.
pub struct AuthService<'a> {
    users: AdminUserRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
            tokens,
        }
    }

    /// Check credentials and issue a session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email, a
    /// malformed email, or a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some((user, password_hash)) = self.users.get_login(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        verify_password(password, &password_hash)?;

        let token = self.tokens.issue(user.id, user.role, TokenPurpose::Session)?;
        tracing::info!(admin_id = %user.id, "Admin logged in");

        Ok(LoginSession { user, token })
    }

    /// Resolve a session token to the admin it was issued to.
    ///
    /// The user is re-read on every call so deleted accounts lose access at
    /// once.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken`/`TokenExpired`/`WrongPurpose` for a
    /// bad token and `AuthError::UserNotFound` if the account is gone.
    pub async fn authenticate(&self, token: &str) -> Result<AdminUser, AuthError> {
        let claims = self.tokens.verify(token, TokenPurpose::Session)?;
        self.users
            .get_by_id(claims.user_id())
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Create an admin account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`, `AuthError::WeakPassword`, or
    /// `AuthError::UserAlreadyExists`.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: AdminRole,
    ) -> Result<AdminUser, AuthError> {
        let email = Email::parse(email)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&email, name.trim(), role, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(admin_id = %user.id, %role, "Admin registered");
        Ok(user)
    }

    /// Issue a reset token for `email`.
    ///
    /// Returns `None` for an unknown or malformed address so callers can
    /// answer without revealing which emails have accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or signing fails.
    pub async fn start_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<(AdminUser, String)>, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Ok(None);
        };
        let Some(user) = self.users.get_by_email(&email).await? else {
            return Ok(None);
        };

        let token = self
            .tokens
            .issue(user.id, user.role, TokenPurpose::PasswordReset)?;
        Ok(Some((user, token)))
    }

    /// # Errors
    ///
    /// Returns a token error if `token` is not a live reset token.
    pub fn check_reset_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens.verify(token, TokenPurpose::PasswordReset)
    }

    /// Set a new password using a reset token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` before touching the token, a token
    /// error for a bad token, or `AuthError::UserNotFound` if the account
    /// was deleted after the link was sent.
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), AuthError> {
        validate_password(password)?;
        let claims = self.check_reset_token(token)?;
        let password_hash = hash_password(password)?;

        self.users
            .update_password(claims.user_id(), &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(admin_id = %claims.user_id(), "Admin password reset");
        Ok(())
    }
}

/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` or `AuthError::PasswordHash`.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch and
/// `AuthError::PasswordHash` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}
