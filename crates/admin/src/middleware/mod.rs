//! HTTP middleware stack for the admin panel.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Authorization is not a layer: every protected handler takes the
//! [`RequireAdmin`] extractor, so an unguarded route cannot exist by
//! omission.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{RequireAdmin, clear_current_admin, set_current_admin};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
