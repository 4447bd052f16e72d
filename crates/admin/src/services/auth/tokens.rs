//! Signed bearer tokens.
//!
//! Two kinds share one HS256 key: 7-day session tokens issued at login and
//! 1-hour password reset tokens. The `purpose` claim keeps them from being
//! used in each other's place.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use dondra_core::{AdminRole, AdminUserId};

use super::AuthError;

/// Lifetime of a login session, in seconds.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Lifetime of a password reset link, in seconds.
pub const RESET_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Session,
    PasswordReset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin user ID.
    pub sub: i32,
    pub role: AdminRole,
    pub purpose: TokenPurpose,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub const fn user_id(&self) -> AdminUserId {
        AdminUserId::new(self.sub)
    }
}

/// Issues and verifies tokens with the configured secret.
#[derive(Clone)]
pub struct TokenService {
    secret: SecretString,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenService {
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if signing fails.
    pub fn issue(
        &self,
        user_id: AdminUserId,
        role: AdminRole,
        purpose: TokenPurpose,
    ) -> Result<String, AuthError> {
        let ttl = Duration::seconds(match purpose {
            TokenPurpose::Session => SESSION_TTL_SECS,
            TokenPurpose::PasswordReset => RESET_TTL_SECS,
        });
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.as_i32(),
            role,
            purpose,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Verify the signature and expiry, and that the token was issued for
    /// `purpose`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired`, `AuthError::WrongPurpose` or
    /// `AuthError::InvalidToken`.
    pub fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        if claims.purpose != purpose {
            return Err(AuthError::WrongPurpose);
        }
        Ok(claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(SecretString::from("Qm8#tR2$wZ5!nB7@kL3^vX9&pD4*hF6%"))
    }

    #[test]
    fn test_session_token_round_trip() {
        let tokens = service();
        let token = tokens
            .issue(AdminUserId::new(3), AdminRole::Admin, TokenPurpose::Session)
            .unwrap();

        let claims = tokens.verify(&token, TokenPurpose::Session).unwrap();
        assert_eq!(claims.user_id(), AdminUserId::new(3));
        assert_eq!(claims.role, AdminRole::Admin);
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_SECS);
    }

    #[test]
    fn test_purposes_are_not_interchangeable() {
        let tokens = service();
        let reset = tokens
            .issue(AdminUserId::new(3), AdminRole::Admin, TokenPurpose::PasswordReset)
            .unwrap();

        assert!(matches!(
            tokens.verify(&reset, TokenPurpose::Session),
            Err(AuthError::WrongPurpose)
        ));
        let claims = tokens.verify(&reset, TokenPurpose::PasswordReset).unwrap();
        assert_eq!(claims.exp - claims.iat, RESET_TTL_SECS);
    }

    #[test]
    fn test_rejects_foreign_signature_and_garbage() {
        let other = TokenService::new(SecretString::from("Zx4!cV7@bN1#mQ9$wE3%rT6^yU8&iO2*"));
        let token = other
            .issue(AdminUserId::new(1), AdminRole::SuperAdmin, TokenPurpose::Session)
            .unwrap();

        assert!(matches!(
            service().verify(&token, TokenPurpose::Session),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            service().verify("not.a.token", TokenPurpose::Session),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let tokens = service();
        let claims = Claims {
            sub: 1,
            role: AdminRole::Admin,
            purpose: TokenPurpose::Session,
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"Qm8#tR2$wZ5!nB7@kL3^vX9&pD4*hF6%"),
        )
        .unwrap();

        assert!(matches!(
            tokens.verify(&token, TokenPurpose::Session),
            Err(AuthError::TokenExpired)
        ));
    }
}
