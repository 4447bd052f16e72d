//! Dondra Core - shared types for the Dondra Lanka storefront and back office.
//!
//! Used by:
//! - `storefront` - public catalog API
//! - `admin` - back office API
//! - `cli` - migrations and admin user management
//!
//! # Architecture
//!
//! Only types and pure functions live here: no I/O, no database access, no
//! HTTP clients. Database derives are gated behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - IDs, emails, prices and status enums
//! - [`catalog`] - products, categories, hot deals, news banners, price lists
//! - [`promotion`] - time-window activation for hot deals and news banners
//! - [`slug`] - category slugs
//! - [`dates`] - lenient date input for admin forms

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod dates;
pub mod promotion;
pub mod slug;
pub mod types;

pub use catalog::*;
pub use promotion::PromotionWindow;
pub use types::*;
