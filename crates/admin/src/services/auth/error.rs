//! Admin authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] dondra_core::EmailError),

    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Admin user not found.
    #[error("admin user not found")]
    UserNotFound,

    /// Admin user already exists.
    #[error("Email already registered")]
    UserAlreadyExists,

    /// Password does not meet requirements.
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// Token signature, format or claims are invalid.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token has expired.
    #[error("Invalid or expired token")]
    TokenExpired,

    /// A reset token was presented as a session token, or vice versa.
    #[error("Invalid or expired token")]
    WrongPurpose,

    /// Password hashing error.
    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// Token signing error.
    #[error("token creation failed: {0}")]
    TokenCreation(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
