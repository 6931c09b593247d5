pub mod current_user;
pub mod metrics;
pub mod security_headers;
pub mod tracing;

pub use current_user::{CurrentUser, SessionKeys, UserClaims, SESSION_COOKIE};
