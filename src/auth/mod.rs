//! Authentication
//!
//! Handles:
//! - Signup/login/logout endpoints
//! - Session management (HMAC-signed cookies)
//! - Authentication extractors

mod accounts;
mod middleware;
pub mod session;

pub use accounts::auth_router;
pub use middleware::{CurrentUser, MaybeUser, SESSION_COOKIE};
pub use session::{Session, create_session_token, verify_session_token};
