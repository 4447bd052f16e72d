//! Admin user domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use dondra_core::{AdminUserId, Email};

// Re-export AdminRole from core for convenience
pub use dondra_core::AdminRole;

/// An admin user (domain type).
///
/// The password hash never leaves the repository layer except for login.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminUser {
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }
}

/// The authenticated admin, as returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentAdmin {
    pub id: AdminUserId,
    pub name: String,
    pub email: Email,
    pub role: AdminRole,
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl From<AdminUser> for CurrentAdmin {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_current_admin_json_shape() {
        let now = Utc::now();
        let user = AdminUser {
            id: AdminUserId::new(7),
            email: Email::parse("Kamal@DondraLanka.lk").unwrap(),
            name: "Kamal".to_string(),
            role: AdminRole::SuperAdmin,
            created_at: now,
            updated_at: now,
        };
        assert!(user.is_super_admin());

        let json = serde_json::to_value(CurrentAdmin::from(&user)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "Kamal",
                "email": "kamal@dondralanka.lk",
                "role": "super_admin",
            })
        );
    }
}
