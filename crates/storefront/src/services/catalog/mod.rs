//! Cached catalog reads.
//!
//! Every read goes through a `moka` cache (TTL from config). Promotions are
//! cached as raw rows; whether a hot deal or banner is live, and its
//! countdown, are worked out per call from the caller's clock.

pub mod cache;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use dondra_core::slug::category_from_slug;
use dondra_core::{
    Category, HotDealId, HotDealWithProduct, NewsBanner, PriceList, Product, ProductId,
    attach_products, current_price_list,
};

use crate::db::{
    CategoryRepository, PriceListRepository, ProductRepository, PromotionRepository,
    RepositoryError,
};
use cache::{CacheKey, CacheScope, CacheValue};

const RECENT_LIMIT: i64 = 5;
const FEATURED_LIMIT: i64 = 3;

/// Default and ceiling for `?limit=` on category listings.
pub const CATEGORY_DEFAULT_LIMIT: i64 = 4;
pub const CATEGORY_MAX_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogServiceInner>,
}

struct CatalogServiceInner {
    pool: PgPool,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogService {
    #[must_use]
    pub fn new(pool: PgPool, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();

        Self {
            inner: Arc::new(CatalogServiceInner { pool, cache }),
        }
    }

    fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        let value = self.inner.cache.get(key).await;
        if value.is_some() {
            debug!(?key, "Cache hit");
        }
        value
    }

    async fn store(&self, key: CacheKey, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    /// Serve a product listing from cache, running `load` only on a miss.
    async fn product_list(
        &self,
        key: CacheKey,
        load: impl Future<Output = Result<Vec<Product>, RepositoryError>>,
    ) -> Result<Vec<Product>, RepositoryError> {
        if let Some(CacheValue::Products(products)) = self.cached(&key).await {
            return Ok(products);
        }

        let products = load.await?;
        self.store(key, CacheValue::Products(products.clone())).await;
        Ok(products)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, RepositoryError> {
        let repo = ProductRepository::new(self.pool());
        self.product_list(CacheKey::Products, repo.list()).await
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.cached(&key).await {
            return Ok(Some(*product));
        }

        let product = ProductRepository::new(self.pool()).get(id).await?;
        if let Some(product) = &product {
            self.store(key, CacheValue::Product(Box::new(product.clone())))
                .await;
        }
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn related(&self, id: ProductId) -> Result<Vec<Product>, RepositoryError> {
        let repo = ProductRepository::new(self.pool());
        self.product_list(CacheKey::Related(id), repo.related(id)).await
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn recent(&self) -> Result<Vec<Product>, RepositoryError> {
        let repo = ProductRepository::new(self.pool());
        self.product_list(CacheKey::Recent, repo.recent(RECENT_LIMIT))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn featured(&self) -> Result<Vec<Product>, RepositoryError> {
        let repo = ProductRepository::new(self.pool());
        self.product_list(CacheKey::Featured, repo.featured(FEATURED_LIMIT))
            .await
    }

    /// Products for a category page, matched by the slug's display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn in_category(&self, slug: &str, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let limit = limit.clamp(1, CATEGORY_MAX_LIMIT);
        let name = category_from_slug(slug);
        let key = CacheKey::Category {
            slug: slug.to_lowercase(),
            limit,
        };

        let repo = ProductRepository::new(self.pool());
        self.product_list(key, repo.in_category(&name, limit)).await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        if let Some(CacheValue::Categories(categories)) = self.cached(&CacheKey::Categories).await {
            return Ok(categories);
        }

        let categories = CategoryRepository::new(self.pool()).list_active().await?;
        self.store(
            CacheKey::Categories,
            CacheValue::Categories(categories.clone()),
        )
        .await;
        Ok(categories)
    }

    // =========================================================================
    // Promotions
    // =========================================================================

    /// Hot deals live at `now`, newest first, each with its product.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn live_hot_deals(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<HotDealWithProduct>, RepositoryError> {
        let (deals, products) = match self.cached(&CacheKey::HotDeals).await {
            Some(CacheValue::HotDeals { deals, products }) => (deals, products),
            _ => {
                let deals = PromotionRepository::new(self.pool())
                    .active_hot_deals()
                    .await?;
                let ids: Vec<ProductId> = deals.iter().map(|d| d.product_id).collect();
                let products = ProductRepository::new(self.pool()).summaries(&ids).await?;
                self.store(
                    CacheKey::HotDeals,
                    CacheValue::HotDeals {
                        deals: deals.clone(),
                        products: products.clone(),
                    },
                )
                .await;
                (deals, products)
            }
        };

        let live = deals.into_iter().filter(|deal| deal.is_live(now)).collect();
        Ok(attach_products(live, &products, now))
    }

    /// A single hot deal regardless of status, with its product.
    ///
    /// `None` when the deal or its product is gone.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn hot_deal(
        &self,
        id: HotDealId,
        now: DateTime<Utc>,
    ) -> Result<Option<HotDealWithProduct>, RepositoryError> {
        let key = CacheKey::HotDeal(id);
        let (deals, products) = match self.cached(&key).await {
            Some(CacheValue::HotDeals { deals, products }) => (deals, products),
            _ => {
                let Some(deal) = PromotionRepository::new(self.pool()).hot_deal(id).await? else {
                    return Ok(None);
                };
                let products = ProductRepository::new(self.pool())
                    .summaries(&[deal.product_id])
                    .await?;
                let deals = vec![deal];
                self.store(
                    key,
                    CacheValue::HotDeals {
                        deals: deals.clone(),
                        products: products.clone(),
                    },
                )
                .await;
                (deals, products)
            }
        };

        Ok(attach_products(deals, &products, now).into_iter().next())
    }

    /// News banners live at `now`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn live_news_banners(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<NewsBanner>, RepositoryError> {
        let banners = match self.cached(&CacheKey::NewsBanners).await {
            Some(CacheValue::NewsBanners(banners)) => banners,
            _ => {
                let banners = PromotionRepository::new(self.pool())
                    .active_news_banners()
                    .await?;
                self.store(
                    CacheKey::NewsBanners,
                    CacheValue::NewsBanners(banners.clone()),
                )
                .await;
                banners
            }
        };

        Ok(banners.into_iter().filter(|b| b.is_live(now)).collect())
    }

    // =========================================================================
    // Price list
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn current_price_list(&self) -> Result<Option<PriceList>, RepositoryError> {
        let candidates = match self.cached(&CacheKey::PriceList).await {
            Some(CacheValue::PriceLists(lists)) => lists,
            _ => {
                let lists = PriceListRepository::new(self.pool()).candidates().await?;
                self.store(CacheKey::PriceList, CacheValue::PriceLists(lists.clone()))
                    .await;
                lists
            }
        };

        Ok(current_price_list(&candidates).cloned())
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop cached entries backing the page at `path`.
    pub async fn revalidate(&self, path: &str) -> CacheScope {
        let scope = CacheScope::for_path(path);

        if scope == CacheScope::All {
            self.invalidate_all().await;
            return scope;
        }

        if let Err(e) = self
            .inner
            .cache
            .invalidate_entries_if(move |key, _| key.is_in(scope))
        {
            warn!(error = %e, ?scope, "Scoped invalidation failed, clearing whole cache");
            self.invalidate_all().await;
        }
        scope
    }

    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
