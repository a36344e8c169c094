//! Shared-secret check for admin endpoints
//!
//! The secret arrives in the `x-admin-secret` header or, failing that, in an
//! `adminSecret` body field. It is a single static value from configuration.

use crate::error::AppError;
use axum::http::HeaderMap;
use tracing::warn;

pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";
pub const ADMIN_SECRET_FIELD: &str = "adminSecret";

#[derive(Debug, Clone)]
pub struct AdminSecret(String);

impl AdminSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Reject the request unless the header (or the body field) matches
    pub fn authorize(&self, headers: &HeaderMap, body_secret: Option<&str>) -> Result<(), AppError> {
        let supplied = headers
            .get(ADMIN_SECRET_HEADER)
            .and_then(|h| h.to_str().ok())
            .or(body_secret);

        match supplied {
            Some(secret) if secret == self.0 => Ok(()),
            Some(_) => {
                warn!("Rejected admin request with a wrong secret");
                Err(AppError::Unauthorized("unauthorized".to_string()))
            }
            None => {
                warn!("Rejected admin request without a secret");
                Err(AppError::Unauthorized("unauthorized".to_string()))
            }
        }
    }
}
