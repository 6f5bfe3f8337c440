//! HTTP middleware for the back-office.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, request context)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Authentication is enforced per handler through [`RequireAdminAuth`] or
//! [`require_admin`].

pub mod auth;
pub mod session;

pub use auth::{
    RequireAdminAuth, clear_current_admin, current_admin, require_admin, set_current_admin,
};
pub use session::create_session_layer;
