//! HTTP API layer for canvass.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: auth, owner accounts, forms, public submission, stats
//! - **Extractors**: authenticated principal
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;

pub use endpoints::router;
