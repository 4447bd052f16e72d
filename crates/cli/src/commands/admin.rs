//! Admin user management commands.
//!
//! Used to create the first super admin; later accounts can be registered
//! through the API by a super admin.

use dondra_admin::db::{AdminUserRepository, RepositoryError};
use dondra_admin::services::auth::{AuthError, hash_password};
use dondra_core::{AdminRole, AdminUserId, Email};
use thiserror::Error;

use super::{MissingDatabaseUrl, database_url};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingDatabaseUrl),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid role: {0}. Valid roles: super_admin, admin")]
    InvalidRole(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Admin user already exists with email: {0}")]
    UserExists(String),

    #[error("{0}")]
    Password(AuthError),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// Create a new admin user and return its ID.
///
/// # Errors
///
/// Returns error if the role, email or password is invalid, the email is
/// already registered, or the database is unreachable.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<AdminUserId, AdminError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email).map_err(|_| AdminError::InvalidEmail(email.to_owned()))?;
    let password_hash = hash_password(password).map_err(AdminError::Password)?;

    let database_url = database_url()?;
    tracing::info!("Connecting to database...");
    let pool = dondra_admin::db::create_pool(&database_url).await?;

    tracing::info!("Creating admin user: {} ({})", email.as_str(), role);
    let user = AdminUserRepository::new(&pool)
        .create(&email, name.trim(), role, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.as_str().to_owned()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email.as_str(),
        user.role
    );
    Ok(user.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_invalid_input_before_connecting() {
        assert!(matches!(
            create_user("owner@dondralanka.lk", "Owner", "viewer", "prawns-and-sprats").await,
            Err(AdminError::InvalidRole(_))
        ));
        assert!(matches!(
            create_user("not-an-email", "Owner", "admin", "prawns-and-sprats").await,
            Err(AdminError::InvalidEmail(_))
        ));
        assert!(matches!(
            create_user("owner@dondralanka.lk", "Owner", "admin", "short").await,
            Err(AdminError::Password(AuthError::WeakPassword { .. }))
        ));
    }
}
