//! Middleware layer.
//!
//! Cross-cutting behavior wrapped around the router's service. Today that is
//! the cross-origin policy; per-request logging lives in `RouterService`.

pub mod cors;

pub use cors::Origins;
