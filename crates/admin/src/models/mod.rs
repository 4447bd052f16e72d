//! Domain models for the back office.
//!
//! - [`admin_user`] - accounts and the identity attached to a request
//! - [`catalog`] - validated drafts built from create/update request bodies

pub mod admin_user;
pub mod catalog;

pub use admin_user::{AdminRole, AdminUser, CurrentAdmin};
pub use catalog::{
    CategoryDraft, CategoryInput, HotDealDraft, HotDealInput, NewsBannerDraft, NewsBannerInput,
    PriceListInput, ProductDraft, ProductInput, ValidationError,
};
