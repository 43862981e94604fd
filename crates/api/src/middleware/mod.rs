//! Request extractors for authentication and authorization.
//!
//! - [`auth::AuthUser`] -- validates the `Authorization: Bearer` header and
//!   exposes the caller's identity to handlers.
//! - [`rbac::RequireAdmin`] -- wraps [`auth::AuthUser`] and rejects callers
//!   without the admin flag.

pub mod auth;
pub mod rbac;

pub use auth::AuthUser;
pub use rbac::RequireAdmin;
