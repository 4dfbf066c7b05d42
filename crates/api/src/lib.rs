//! HTTP API layer for civita.
//!
//! - **Endpoints**: REST API for reports, alerts, auth, and administration
//! - **Extractors**: Bearer-token authentication
//! - **Middleware**: Auth, logging, CORS
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
