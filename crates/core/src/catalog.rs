//! Catalog records shared by the storefront and back office.
//!
//! JSON uses camelCase field names. With the `postgres` feature each record
//! can be read straight from a row of the matching `catalog.*` table.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::promotion::{PromotionWindow, TimeLeft};
use crate::types::{
    CategoryId, HotDealId, NewsBannerId, Price, PriceListId, PriceListStatus, ProductId,
    ProductStatus, PromotionStatus,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Price,
    pub images: Vec<String>,
    pub status: ProductStatus,
    /// Free-form minimum order note, e.g. `"5"` (kg).
    pub min_order: Option<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[must_use]
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            images: self.images.clone(),
            price: self.price,
            status: self.status,
        }
    }
}

/// The subset of a product embedded in hot deal responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub images: Vec<String>,
    pub price: Price,
    pub status: ProductStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A time-boxed discount on one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct HotDeal {
    pub id: HotDealId,
    pub name: String,
    pub description: String,
    pub product_id: ProductId,
    pub original_price: Price,
    pub discounted_price: Price,
    /// Label shown on the card, e.g. `"20% OFF"`.
    pub discount: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: PromotionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HotDeal {
    #[must_use]
    pub const fn window(&self) -> PromotionWindow {
        PromotionWindow::new(self.start_date, self.end_date)
    }

    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.window().is_live(self.status, now)
    }
}

/// A hot deal joined with its product and a countdown label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotDealWithProduct {
    #[serde(flatten)]
    pub deal: HotDeal,
    pub product: ProductSummary,
    pub time_left: TimeLeft,
}

/// Join `deals` with their products, keeping the order of `deals`.
///
/// Deals whose product has been deleted are dropped rather than reported.
#[must_use]
pub fn attach_products(
    deals: Vec<HotDeal>,
    products: &[ProductSummary],
    now: DateTime<Utc>,
) -> Vec<HotDealWithProduct> {
    let by_id: HashMap<ProductId, &ProductSummary> =
        products.iter().map(|p| (p.id, p)).collect();

    deals
        .into_iter()
        .filter_map(|deal| {
            let product = (*by_id.get(&deal.product_id)?).clone();
            let time_left = deal.window().time_left(now);
            Some(HotDealWithProduct {
                deal,
                product,
                time_left,
            })
        })
        .collect()
}

/// A time-boxed promotional image for the storefront homepage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct NewsBanner {
    pub id: NewsBannerId,
    pub image_url: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: PromotionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewsBanner {
    #[must_use]
    pub const fn window(&self) -> PromotionWindow {
        PromotionWindow::new(self.start_date, self.end_date)
    }

    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.window().is_live(self.status, now)
    }
}

/// An uploaded price sheet image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PriceList {
    pub id: PriceListId,
    pub image_url: String,
    pub status: PriceListStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The price list the storefront should display.
///
/// The newest `Active` entry wins. If none is active the newest entry of any
/// status is shown so the page is never empty while one exists.
#[must_use]
pub fn current_price_list(lists: &[PriceList]) -> Option<&PriceList> {
    lists
        .iter()
        .filter(|list| list.status == PriceListStatus::Active)
        .max_by_key(|list| (list.created_at, list.id))
        .or_else(|| lists.iter().max_by_key(|list| (list.created_at, list.id)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn price(amount: i64) -> Price {
        Price::new(Decimal::new(amount, 0)).unwrap()
    }

    fn summary(id: i32) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            images: vec![],
            price: price(1000),
            status: ProductStatus::InStock,
        }
    }

    fn deal(id: i32, product: i32) -> HotDeal {
        HotDeal {
            id: HotDealId::new(id),
            name: format!("Deal {id}"),
            description: String::new(),
            product_id: ProductId::new(product),
            original_price: price(1000),
            discounted_price: price(800),
            discount: "20% OFF".to_owned(),
            start_date: now() - Duration::days(1),
            end_date: now() + Duration::days(2),
            status: PromotionStatus::Active,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn price_list(id: i32, status: PriceListStatus, age_days: i64) -> PriceList {
        PriceList {
            id: PriceListId::new(id),
            image_url: format!("https://img.example/{id}.jpg"),
            status,
            created_at: now() - Duration::days(age_days),
            updated_at: now(),
        }
    }

    #[test]
    fn test_attach_products_drops_orphans_and_keeps_order() {
        let deals = vec![deal(1, 10), deal(2, 99), deal(3, 11)];
        let joined = attach_products(deals, &[summary(11), summary(10)], now());

        let ids: Vec<i32> = joined.iter().map(|d| d.deal.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(joined[0].product.id, ProductId::new(10));
        assert_eq!(joined[0].time_left.to_string(), "2d 0h");
    }

    #[test]
    fn test_hot_deal_json_shape() {
        let joined = attach_products(vec![deal(5, 10)], &[summary(10)], now());
        let json = serde_json::to_value(&joined[0]).unwrap();

        assert_eq!(json["id"], 5);
        assert_eq!(json["originalPrice"], "1000");
        assert_eq!(json["product"]["name"], "Product 10");
        assert_eq!(json["timeLeft"], "2d 0h");
        assert_eq!(json["status"], "Active");
    }

    #[test]
    fn test_banner_liveness() {
        let mut banner = NewsBanner {
            id: NewsBannerId::new(1),
            image_url: "https://img.example/b.jpg".to_owned(),
            start_date: now() + Duration::hours(1),
            end_date: now() + Duration::days(1),
            status: PromotionStatus::Active,
            created_at: now(),
            updated_at: now(),
        };
        assert!(!banner.is_live(now()));

        banner.start_date = now() - Duration::hours(1);
        assert!(banner.is_live(now()));

        banner.status = PromotionStatus::Scheduled;
        assert!(!banner.is_live(now()));
    }

    #[test]
    fn test_current_price_list_prefers_newest_active() {
        let lists = vec![
            price_list(1, PriceListStatus::Active, 10),
            price_list(2, PriceListStatus::Inactive, 1),
            price_list(3, PriceListStatus::Active, 5),
        ];
        assert_eq!(current_price_list(&lists).unwrap().id, PriceListId::new(3));
    }

    #[test]
    fn test_current_price_list_falls_back_to_newest() {
        let lists = vec![
            price_list(1, PriceListStatus::Inactive, 10),
            price_list(2, PriceListStatus::Inactive, 1),
        ];
        assert_eq!(current_price_list(&lists).unwrap().id, PriceListId::new(2));
        assert!(current_price_list(&[]).is_none());
    }
}
