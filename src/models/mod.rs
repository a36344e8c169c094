//! Data models and DTOs (Data Transfer Objects)
//!
//! Read records (`Animal`, `User`, ...) are plain data returned by the store.
//! Writes go through separate input records (`NewAnimal`, `AnimalUpdate`, ...).

pub mod animal;
pub mod application;
pub mod feedback;
pub mod user;

// Re-export commonly used types
pub use animal::*;
pub use application::*;
pub use feedback::*;
pub use user::*;

use crate::error::AppError;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Parse a path or body identifier, rejecting malformed values with 400
pub fn parse_id(raw: &str, message: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::BadRequest(message.to_string()))
}

/// Trim a client-supplied string, mapping blank input to `None`
pub fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
pub fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Acknowledgement body for write-only endpoints
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            message: None,
            id: None,
        }
    }

    pub fn created(message: impl Into<String>, id: Uuid) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            id: Some(id),
        }
    }
}
