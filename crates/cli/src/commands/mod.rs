//! CLI subcommands.

pub mod admin;
pub mod migrate;

use secrecy::SecretString;
use thiserror::Error;

/// The connection string was not found in the environment.
#[derive(Debug, Error)]
#[error("Missing environment variable: ADMIN_DATABASE_URL or DATABASE_URL")]
pub struct MissingDatabaseUrl;

/// `ADMIN_DATABASE_URL`, falling back to `DATABASE_URL`.
///
/// Loads `.env` first when present.
pub fn database_url() -> Result<SecretString, MissingDatabaseUrl> {
    dotenvy::dotenv().ok();

    std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MissingDatabaseUrl)
}
