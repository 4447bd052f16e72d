//! Request bodies for catalog edits and the drafts they validate into.
//!
//! Inputs are deliberately loose (every field optional) so a missing field
//! produces a 400 with a readable message instead of a serde rejection.
//! Drafts are what the repositories write.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use dondra_core::slug::slugify;
use dondra_core::{
    Price, PriceError, PriceListStatus, ProductId, ProductStatus, PromotionStatus,
    PromotionWindow, dates,
};

/// A request body that failed validation. The message is shown to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Trimmed, non-blank text or `None`.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn price(value: Decimal, field: &str) -> Result<Price, ValidationError> {
    Price::new(value).map_err(|err| {
        ValidationError(match err {
            PriceError::Negative => format!("{field} cannot be negative"),
            PriceError::TooLarge => format!("{field} must be below 10,000,000,000"),
            PriceError::TooPrecise => format!("{field} cannot have more than 2 decimal places"),
        })
    })
}

/// A product reference given as a number or a numeric string.
fn product_ref(value: &serde_json::Value) -> Result<ProductId, ValidationError> {
    let id = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    id.and_then(|id| i32::try_from(id).ok())
        .filter(|id| *id > 0)
        .map(ProductId::new)
        .ok_or_else(|| ValidationError::new("Invalid product ID"))
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: Option<ProductStatus>,
    pub min_order: Option<String>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Price,
    pub images: Vec<String>,
    pub status: ProductStatus,
    pub min_order: Option<String>,
    pub is_featured: bool,
}

impl ProductInput {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first missing or invalid field.
    pub fn validate(self) -> Result<ProductDraft, ValidationError> {
        let name = present(self.name).ok_or_else(|| ValidationError::new("Name is required"))?;
        let description = present(self.description)
            .ok_or_else(|| ValidationError::new("Description is required"))?;
        let category =
            present(self.category).ok_or_else(|| ValidationError::new("Category is required"))?;
        let price = price(
            self.price
                .ok_or_else(|| ValidationError::new("Price is required"))?,
            "Price",
        )?;

        Ok(ProductDraft {
            name,
            description,
            category,
            price,
            images: self
                .images
                .into_iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
            status: self.status.unwrap_or_default(),
            min_order: present(self.min_order),
            is_featured: self.is_featured.unwrap_or(false),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductStatusInput {
    pub status: ProductStatus,
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: String,
    pub image: String,
    pub is_active: bool,
}

impl CategoryInput {
    /// The slug is always derived from the name.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name or image is missing, or the
    /// name has no letters or digits to build a slug from.
    pub fn validate(self) -> Result<CategoryDraft, ValidationError> {
        let name = present(self.name).ok_or_else(|| ValidationError::new("Name is required"))?;
        let image = present(self.image).ok_or_else(|| ValidationError::new("Image is required"))?;

        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(ValidationError::new(
                "Name must contain at least one letter or digit",
            ));
        }

        Ok(CategoryDraft {
            name,
            slug,
            image,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

// =============================================================================
// Hot deals
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotDealInput {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "productId")]
    pub product: Option<serde_json::Value>,
    pub original_price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
    pub discount: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_option")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::deserialize_option")]
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<PromotionStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotDealDraft {
    pub name: String,
    pub description: String,
    pub product_id: ProductId,
    pub original_price: Price,
    pub discounted_price: Price,
    pub discount: String,
    pub window: PromotionWindow,
    pub status: PromotionStatus,
}

impl HotDealInput {
    /// Checks shape only; whether the product exists is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a required field is missing, a price
    /// is negative, or the window ends before it starts.
    pub fn validate(self) -> Result<HotDealDraft, ValidationError> {
        let missing = || ValidationError::new("Missing required fields");

        let name = present(self.name).ok_or_else(missing)?;
        let product = self.product.ok_or_else(missing)?;
        let original_price = self.original_price.ok_or_else(missing)?;
        let discounted_price = self.discounted_price.ok_or_else(missing)?;
        let discount = present(self.discount).ok_or_else(missing)?;
        let start = self.start_date.ok_or_else(missing)?;
        let end = self.end_date.ok_or_else(missing)?;
        let product_id = product_ref(&product)?;

        Ok(HotDealDraft {
            name,
            description: present(self.description).unwrap_or_default(),
            product_id,
            original_price: price(original_price, "Original price")?,
            discounted_price: price(discounted_price, "Discounted price")?,
            discount,
            window: window(start, end)?,
            status: self.status.unwrap_or_default(),
        })
    }
}

fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<PromotionWindow, ValidationError> {
    let window = PromotionWindow::new(start, end);
    if !window.is_well_formed() {
        return Err(ValidationError::new(
            "End date must be on or after the start date",
        ));
    }
    Ok(window)
}

// =============================================================================
// News banners
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsBannerInput {
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_option")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::deserialize_option")]
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<PromotionStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsBannerDraft {
    pub image_url: String,
    pub window: PromotionWindow,
    pub status: PromotionStatus,
}

impl NewsBannerInput {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the image or either date is missing,
    /// or the window ends before it starts.
    pub fn validate(self) -> Result<NewsBannerDraft, ValidationError> {
        let image_url =
            present(self.image_url).ok_or_else(|| ValidationError::new("Image URL is required"))?;
        let start = self
            .start_date
            .ok_or_else(|| ValidationError::new("Start date is required"))?;
        let end = self
            .end_date
            .ok_or_else(|| ValidationError::new("End date is required"))?;

        Ok(NewsBannerDraft {
            image_url,
            window: window(start, end)?,
            status: self.status.unwrap_or_default(),
        })
    }
}

// =============================================================================
// Price lists
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListInput {
    pub image_url: Option<String>,
    pub status: Option<PriceListStatus>,
}

impl PriceListInput {
    /// The trimmed image URL and requested status.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `imageUrl` is missing or blank.
    pub fn validate(self) -> Result<(String, PriceListStatus), ValidationError> {
        let image_url =
            present(self.image_url).ok_or_else(|| ValidationError::new("Image URL is required"))?;
        Ok((image_url, self.status.unwrap_or_default()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn product_json(body: serde_json::Value) -> ProductInput {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_product_defaults_and_trimming() {
        let draft = product_json(serde_json::json!({
            "name": "  Balaya  ",
            "description": "Sun-dried skipjack tuna",
            "category": "Dry Fish",
            "price": 1850,
            "images": ["https://img/1.jpg", "  "],
        }))
        .validate()
        .unwrap();

        assert_eq!(draft.name, "Balaya");
        assert_eq!(draft.price.amount(), Decimal::from(1850));
        assert_eq!(draft.images, vec!["https://img/1.jpg".to_string()]);
        assert_eq!(draft.status, ProductStatus::InStock);
        assert!(!draft.is_featured);
        assert_eq!(draft.min_order, None);
    }

    #[test]
    fn test_product_rejects_blank_name_and_negative_price() {
        let err = product_json(serde_json::json!({
            "name": "   ",
            "description": "x",
            "category": "Dry Fish",
            "price": 10,
        }))
        .validate()
        .unwrap_err();
        assert_eq!(err.0, "Name is required");

        let err = product_json(serde_json::json!({
            "name": "Balaya",
            "description": "x",
            "category": "Dry Fish",
            "price": -1,
        }))
        .validate()
        .unwrap_err();
        assert_eq!(err.0, "Price cannot be negative");
    }

    #[test]
    fn test_product_price_must_fit_the_column() {
        let body = |price: serde_json::Value| {
            product_json(serde_json::json!({
                "name": "Balaya",
                "description": "x",
                "category": "Dry Fish",
                "price": price,
            }))
            .validate()
        };

        assert_eq!(
            body(serde_json::json!(10_000_000_000_i64)).unwrap_err().0,
            "Price must be below 10,000,000,000"
        );
        assert_eq!(
            body(serde_json::json!("12.345")).unwrap_err().0,
            "Price cannot have more than 2 decimal places"
        );
        assert!(body(serde_json::json!("9999999999.99")).is_ok());
    }

    #[test]
    fn test_product_status_uses_display_labels() {
        let draft = product_json(serde_json::json!({
            "name": "Katta",
            "description": "x",
            "category": "Dry Fish",
            "price": "900.50",
            "status": "Low Stock",
            "isFeatured": true,
            "minOrder": "5",
        }))
        .validate()
        .unwrap();
        assert_eq!(draft.status, ProductStatus::LowStock);
        assert!(draft.is_featured);
        assert_eq!(draft.min_order.as_deref(), Some("5"));
    }

    #[test]
    fn test_category_slug_is_derived() {
        let draft = CategoryInput {
            name: Some("Dry Fish & Sprats".to_string()),
            image: Some("https://img/c.jpg".to_string()),
            is_active: None,
        }
        .validate()
        .unwrap();
        assert_eq!(draft.slug, "dry-fish-sprats");
        assert!(draft.is_active);

        let err = CategoryInput {
            name: Some("!!!".to_string()),
            image: Some("https://img/c.jpg".to_string()),
            is_active: None,
        }
        .validate()
        .unwrap_err();
        assert!(err.0.contains("letter or digit"));
    }

    #[test]
    fn test_hot_deal_requires_fields() {
        let input: HotDealInput = serde_json::from_value(serde_json::json!({
            "name": "Weekend Special",
            "product": 4,
        }))
        .unwrap();
        assert_eq!(input.validate().unwrap_err().0, "Missing required fields");
    }

    #[test]
    fn test_hot_deal_accepts_plain_dates() {
        let input: HotDealInput = serde_json::from_value(serde_json::json!({
            "name": "Weekend Special",
            "product": 4,
            "originalPrice": 2000,
            "discountedPrice": 1600,
            "discount": "20% OFF",
            "startDate": "2026-03-01",
            "endDate": "2026-03-03T18:00:00Z",
        }))
        .unwrap();
        let draft = input.validate().unwrap();

        assert_eq!(draft.product_id, ProductId::new(4));
        assert_eq!(draft.description, "");
        assert_eq!(draft.status, PromotionStatus::Active);
        assert_eq!(
            draft.window.start(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_hot_deal_product_reference() {
        let deal = |product: serde_json::Value| {
            let input: HotDealInput = serde_json::from_value(serde_json::json!({
                "name": "Weekend Special",
                "product": product,
                "originalPrice": 2000,
                "discountedPrice": 1600,
                "discount": "20% OFF",
                "startDate": "2026-03-01",
                "endDate": "2026-03-03",
            }))
            .unwrap();
            input.validate()
        };

        assert_eq!(deal(serde_json::json!("7")).unwrap().product_id, ProductId::new(7));
        for bad in [
            serde_json::json!("65f0c2a9e4b0"),
            serde_json::json!(-3),
            serde_json::json!(1.5),
            serde_json::json!(4_294_967_296_i64),
            serde_json::json!({ "id": 4 }),
        ] {
            assert_eq!(deal(bad).unwrap_err().0, "Invalid product ID");
        }
    }

    #[test]
    fn test_windows_must_not_end_before_start() {
        let input: NewsBannerInput = serde_json::from_value(serde_json::json!({
            "imageUrl": "https://img/b.jpg",
            "startDate": "2026-03-05",
            "endDate": "2026-03-01",
        }))
        .unwrap();
        assert!(input.validate().unwrap_err().0.contains("End date"));

        let same_day: NewsBannerInput = serde_json::from_value(serde_json::json!({
            "imageUrl": "https://img/b.jpg",
            "startDate": "2026-03-05",
            "endDate": "2026-03-05",
        }))
        .unwrap();
        assert!(same_day.validate().is_ok());
    }

    #[test]
    fn test_price_list_requires_image() {
        let err = PriceListInput {
            image_url: Some("  ".to_string()),
            status: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.0, "Image URL is required");

        let (url, status) = PriceListInput {
            image_url: Some("https://img/p.jpg".to_string()),
            status: Some(PriceListStatus::Inactive),
        }
        .validate()
        .unwrap();
        assert_eq!(url, "https://img/p.jpg");
        assert_eq!(status, PriceListStatus::Inactive);
    }
}
