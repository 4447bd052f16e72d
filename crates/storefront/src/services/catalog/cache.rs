//! Cache keys, values, and revalidation scopes for catalog reads.

use dondra_core::{
    Category, HotDeal, HotDealId, NewsBanner, PriceList, Product, ProductId, ProductSummary,
};

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Related(ProductId),
    Recent,
    Featured,
    Category { slug: String, limit: i64 },
    Categories,
    HotDeals,
    HotDeal(HotDealId),
    NewsBanners,
    PriceList,
}

#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    Categories(Vec<Category>),
    HotDeals {
        deals: Vec<HotDeal>,
        products: Vec<ProductSummary>,
    },
    NewsBanners(Vec<NewsBanner>),
    PriceLists(Vec<PriceList>),
}

/// What a revalidation request throws away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope {
    All,
    Products,
    Categories,
    HotDeals,
    NewsBanners,
    PriceList,
}

impl CacheScope {
    /// Map a page path such as `/products/12` or `/admin/hot-deals` to the
    /// cache entries that back it. Unrecognised paths, including `/`, clear
    /// everything.
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
        if segments.peek() == Some(&"admin") {
            segments.next();
        }

        match segments.next() {
            Some("products" | "product") => Self::Products,
            Some("categories" | "category") => Self::Categories,
            Some("hot-deals") => Self::HotDeals,
            Some("news-banners" | "news") => Self::NewsBanners,
            Some("price-list") => Self::PriceList,
            _ => Self::All,
        }
    }
}

impl CacheKey {
    #[must_use]
    pub const fn is_in(&self, scope: CacheScope) -> bool {
        match scope {
            CacheScope::All => true,
            // Hot deals embed product summaries
            CacheScope::Products => matches!(
                self,
                Self::Products
                    | Self::Product(_)
                    | Self::Related(_)
                    | Self::Recent
                    | Self::Featured
                    | Self::Category { .. }
                    | Self::HotDeals
                    | Self::HotDeal(_)
            ),
            CacheScope::Categories => matches!(self, Self::Categories),
            CacheScope::HotDeals => matches!(self, Self::HotDeals | Self::HotDeal(_)),
            CacheScope::NewsBanners => matches!(self, Self::NewsBanners),
            CacheScope::PriceList => matches!(self, Self::PriceList),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_for_storefront_paths() {
        assert_eq!(CacheScope::for_path("/products/42"), CacheScope::Products);
        assert_eq!(CacheScope::for_path("/hot-deals"), CacheScope::HotDeals);
        assert_eq!(CacheScope::for_path("/price-list/"), CacheScope::PriceList);
        assert_eq!(CacheScope::for_path("/categories"), CacheScope::Categories);
        assert_eq!(CacheScope::for_path("/news-banners"), CacheScope::NewsBanners);
    }

    #[test]
    fn test_scope_strips_admin_prefix() {
        assert_eq!(CacheScope::for_path("/admin/products"), CacheScope::Products);
        assert_eq!(CacheScope::for_path("/admin"), CacheScope::All);
    }

    #[test]
    fn test_root_and_unknown_paths_clear_everything() {
        assert_eq!(CacheScope::for_path("/"), CacheScope::All);
        assert_eq!(CacheScope::for_path("/about-us"), CacheScope::All);
    }

    #[test]
    fn test_product_scope_reaches_hot_deals() {
        assert!(CacheKey::HotDeals.is_in(CacheScope::Products));
        assert!(CacheKey::HotDeal(HotDealId::new(1)).is_in(CacheScope::Products));
        assert!(!CacheKey::NewsBanners.is_in(CacheScope::Products));
        assert!(!CacheKey::Products.is_in(CacheScope::HotDeals));
    }
}
