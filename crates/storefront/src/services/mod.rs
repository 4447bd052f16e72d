//! Business logic services for the storefront.
//!
//! - [`catalog`] - cached catalog reads and live-promotion filtering

pub mod catalog;

pub use catalog::CatalogService;
