//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_PUBLIC_URL` - Public URL of the back office, used in password reset links
//! - `JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//! - `CLOUDINARY_CLOUD_NAME` - Image host account
//! - `CLOUDINARY_UPLOAD_PRESET` - Unsigned upload preset
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_SECURE_COOKIES` - Mark the session cookie `Secure` (default: true)
//! - `ADMIN_CORS_ORIGIN` - Browser origin allowed to call the API
//! - `CLOUDINARY_BASE_URL` - Image host API root (default: <https://api.cloudinary.com>)
//! - `SMTP_HOST`, `SMTP_PORT` (587), `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_FROM` -
//!   password reset email; all but the port must be set together
//! - `STOREFRONT_REVALIDATE_URL` + `STOREFRONT_REVALIDATE_SECRET` - storefront
//!   cache revalidation after catalog edits
//! - `LOG_FORMAT` - `json` for structured logs
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct AdminConfig {
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public URL of the back office (reset links point here)
    pub public_url: Url,
    /// HS256 signing key for session and reset tokens
    pub jwt_secret: SecretString,
    pub secure_cookies: bool,
    pub cors_origin: Option<String>,
    pub cloudinary: CloudinaryConfig,
    /// `None` disables password reset email
    pub email: Option<EmailConfig>,
    /// `None` disables storefront revalidation
    pub storefront: Option<StorefrontHookConfig>,
    pub json_logs: bool,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("public_url", &self.public_url.as_str())
            .field("jwt_secret", &"[REDACTED]")
            .field("secure_cookies", &self.secure_cookies)
            .field("cors_origin", &self.cors_origin)
            .field("cloudinary", &self.cloudinary)
            .field("email", &self.email)
            .field("storefront", &self.storefront)
            .field("json_logs", &self.json_logs)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish_non_exhaustive()
    }
}

/// Unsigned-upload settings for the image host.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub base_url: Url,
}

/// Email (SMTP) configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

/// Where to tell the storefront that cached catalog pages are stale.
#[derive(Clone)]
pub struct StorefrontHookConfig {
    pub revalidate_url: Url,
    pub secret: SecretString,
}

impl std::fmt::Debug for StorefrontHookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontHookConfig")
            .field("revalidate_url", &self.revalidate_url.as_str())
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ADMIN_DATABASE_URL")?;
        let host = parse_env("ADMIN_HOST", "127.0.0.1")?;
        let port = parse_env("ADMIN_PORT", "3001")?;
        let public_url = parse_url("ADMIN_PUBLIC_URL", &get_required_env("ADMIN_PUBLIC_URL")?)?;

        let jwt_secret = get_required_env("JWT_SECRET")?;
        validate_secret(&jwt_secret, "JWT_SECRET")?;

        Ok(Self {
            database_url,
            host,
            port,
            public_url,
            jwt_secret: SecretString::from(jwt_secret),
            secure_cookies: parse_env("ADMIN_SECURE_COOKIES", "true")?,
            cors_origin: get_optional_env("ADMIN_CORS_ORIGIN"),
            cloudinary: CloudinaryConfig::from_env()?,
            email: EmailConfig::from_env()?,
            storefront: StorefrontHookConfig::from_env()?,
            json_logs: get_env_or_default("LOG_FORMAT", "text").eq_ignore_ascii_case("json"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Link emailed to an admin who asked to reset their password.
    #[must_use]
    pub fn password_reset_link(&self, token: &str) -> String {
        format!(
            "{}/admin/auth/reset-password?token={token}",
            self.public_url.as_str().trim_end_matches('/')
        )
    }
}

impl CloudinaryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("CLOUDINARY_BASE_URL", DEFAULT_CLOUDINARY_BASE_URL);

        Ok(Self {
            cloud_name: get_required_env("CLOUDINARY_CLOUD_NAME")?,
            upload_preset: get_required_env("CLOUDINARY_UPLOAD_PRESET")?,
            base_url: parse_url("CLOUDINARY_BASE_URL", &base_url)?,
        })
    }
}

impl EmailConfig {
    /// Returns `None` when `SMTP_HOST` is unset.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        let smtp_password = get_required_env("SMTP_PASSWORD")?;
        validate_secret_strength(&smtp_password, "SMTP_PASSWORD")?;

        Ok(Some(Self {
            smtp_host,
            smtp_port: parse_env("SMTP_PORT", "587")?,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: SecretString::from(smtp_password),
            from_address: get_required_env("SMTP_FROM")?,
        }))
    }
}

impl StorefrontHookConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let url = get_optional_env("STOREFRONT_REVALIDATE_URL");
        let secret = get_optional_env("STOREFRONT_REVALIDATE_SECRET");

        match (url, secret) {
            (Some(url), Some(secret)) => {
                validate_secret(&secret, "STOREFRONT_REVALIDATE_SECRET")?;
                Ok(Some(Self {
                    revalidate_url: parse_url("STOREFRONT_REVALIDATE_URL", &url)?,
                    secret: SecretString::from(secret),
                }))
            }
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_REVALIDATE_*".to_string(),
                "Both STOREFRONT_REVALIDATE_URL and STOREFRONT_REVALIDATE_SECRET must be set together"
                    .to_string(),
            )),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    get_optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(primary_key.to_string()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Signing secrets must also be long.
fn validate_secret(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_SECRET_LENGTH} characters (got {})",
                secret.len()
            ),
        ));
    }
    validate_secret_strength(secret, var_name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const TEST_JWT_SECRET: &str = "Qm8#tR2$wZ5!nB7@kL3^vX9&pD4*hF6%";

    /// A config for router and service tests. Nothing in it is ever dialed.
    pub(crate) fn test_config() -> AdminConfig {
        AdminConfig {
            database_url: SecretString::from("postgres://localhost/dondra_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            public_url: Url::parse("https://dondralanka.lk/").unwrap(),
            jwt_secret: SecretString::from(TEST_JWT_SECRET),
            secure_cookies: true,
            cors_origin: None,
            cloudinary: CloudinaryConfig {
                cloud_name: "dondra".to_string(),
                upload_preset: "catalog".to_string(),
                base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            },
            email: None,
            storefront: None,
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_shannon_entropy_bounds() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-jwt-key-goes-here-0123456789", "TEST");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));

        let result = validate_secret_strength("CHANGEME-a8f3k2m9x7", "TEST");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_checks_length_then_entropy() {
        assert!(validate_secret("aB3$xY9!", "JWT_SECRET").is_err());
        assert!(validate_secret(&"ab".repeat(20), "JWT_SECRET").is_err());
        assert!(validate_secret(TEST_JWT_SECRET, "JWT_SECRET").is_ok());
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        assert!(parse_url("X", "https://dondralanka.lk").is_ok());
        assert!(parse_url("X", "ftp://dondralanka.lk").is_err());
        assert!(parse_url("X", "not a url").is_err());
    }

    #[test]
    fn test_password_reset_link() {
        let config = test_config();
        assert_eq!(
            config.password_reset_link("abc.def"),
            "https://dondralanka.lk/admin/auth/reset-password?token=abc.def"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = test_config();
        config.email = Some(EmailConfig {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_username: "orders@dondralanka.lk".to_string(),
            smtp_password: SecretString::from("hunter2-but-longer"),
            from_address: "Dondra Lanka <orders@dondralanka.lk>".to_string(),
        });

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(TEST_JWT_SECRET));
        assert!(!debug_output.contains("hunter2"));
        assert!(!debug_output.contains("dondra_test"));
        assert!(debug_output.contains("smtp.gmail.com"));
    }

    #[test]
    fn test_socket_addr() {
        assert_eq!(test_config().socket_addr().to_string(), "127.0.0.1:3001");
    }
}
