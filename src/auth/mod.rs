//! Authentication helpers
//!
//! Password hashing for user accounts and the shared-secret check guarding
//! the admin endpoints. There are no sessions or tokens: clients keep the
//! logged-in user's public fields themselves.

mod admin;
mod password;

pub use admin::{AdminSecret, ADMIN_SECRET_FIELD, ADMIN_SECRET_HEADER};
pub use password::PasswordHasher;
