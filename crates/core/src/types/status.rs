//! Status enums stored as Postgres enum types.

use serde::{Deserialize, Serialize};

/// Stock label shown on a product card.
///
/// Purely informational: nothing decrements stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "catalog.product_status", rename_all = "snake_case")
)]
pub enum ProductStatus {
    #[default]
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

/// Lifecycle flag on hot deals and news banners.
///
/// Only `Active` items can be live; the date window decides the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "catalog.promotion_status", rename_all = "snake_case")
)]
pub enum PromotionStatus {
    #[default]
    Active,
    Scheduled,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "catalog.price_list_status", rename_all = "snake_case")
)]
pub enum PriceListStatus {
    #[default]
    Active,
    Inactive,
}

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "admin.admin_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Can also register other admins.
    SuperAdmin,
    /// Manages the catalog and promotions.
    #[default]
    Admin,
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_status_uses_display_labels() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::OutOfStock).unwrap(),
            "\"Out of Stock\""
        );
        let parsed: ProductStatus = serde_json::from_str("\"Low Stock\"").unwrap();
        assert_eq!(parsed, ProductStatus::LowStock);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ProductStatus::default(), ProductStatus::InStock);
        assert_eq!(PromotionStatus::default(), PromotionStatus::Active);
        assert_eq!(PriceListStatus::default(), PriceListStatus::Active);
    }

    #[test]
    fn test_admin_role_round_trips_through_str() {
        for role in [AdminRole::SuperAdmin, AdminRole::Admin] {
            assert_eq!(role.to_string().parse::<AdminRole>().unwrap(), role);
        }
        assert!("viewer".parse::<AdminRole>().is_err());
    }
}
