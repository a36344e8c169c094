//! Adoption applications

use crate::models::AnimalSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An adoption request as stored. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub animal_id: Uuid,
    /// Unset for anonymous applicants
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub animal_id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub message: Option<String>,
}

/// Application joined with the animal it references, if that still exists
#[derive(Debug, Clone, PartialEq)]
pub struct UserApplication {
    pub application: Application,
    pub animal: Option<AnimalSummary>,
}

/// Request body for `POST /api/apply`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub animal_id: Option<String>,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// One entry of the profile page's application list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub message: Option<String>,
    pub animal: Option<AnimalSummary>,
}

impl From<UserApplication> for ApplicationView {
    fn from(entry: UserApplication) -> Self {
        Self {
            id: entry.application.id,
            created_at: entry.application.created_at,
            message: entry.application.message,
            animal: entry.animal,
        }
    }
}

/// Body of `GET /api/users/{id}/applications`
#[derive(Debug, Serialize)]
pub struct UserApplicationsResponse {
    pub ok: bool,
    pub user: crate::models::UserView,
    pub applications: Vec<ApplicationView>,
}
