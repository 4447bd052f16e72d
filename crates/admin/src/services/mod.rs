//! Business logic and external integrations.

pub mod auth;
pub mod cloudinary;
pub mod email;
pub mod revalidate;

pub use auth::{AuthError, AuthService, TokenService};
pub use cloudinary::{CloudinaryClient, ImageHostError};
pub use email::{EmailError, EmailService};
pub use revalidate::StorefrontNotifier;
