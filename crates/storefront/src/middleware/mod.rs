//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS
//! 5. Security headers
//! 6. Rate limiting (revalidation endpoint only)

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use rate_limit::revalidate_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
