//! User profile handlers

use super::extract::AppJson;
use crate::error::{not_found_error, ApiResult};
use crate::models::{
    parse_id, ApplicationView, UpdateProfileRequest, UserApplicationsResponse, UserResponse,
    UserView,
};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{debug, info};

const INVALID_USER_ID: &str = "Invalid user ID format";

/// GET /api/users/{id}/applications
pub async fn user_applications(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserApplicationsResponse>> {
    debug!("Listing applications for user {}", id);
    let id = parse_id(&id, INVALID_USER_ID)?;

    let user = state
        .store
        .find_user(id)
        .await?
        .ok_or_else(|| not_found_error("User not found"))?;

    let applications = state
        .store
        .applications_for_user(id)
        .await?
        .into_iter()
        .map(ApplicationView::from)
        .collect();

    Ok(Json(UserApplicationsResponse {
        ok: true,
        user: UserView::from(user),
        applications,
    }))
}

/// PUT /api/users/{id}
///
/// Changes name, mobile and address. Email and password are fixed.
pub async fn update_profile(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    debug!("Updating profile for user {}", id);
    let id = parse_id(&id, INVALID_USER_ID)?;
    let update = req.into_update()?;

    let user = state
        .store
        .update_profile(id, update)
        .await?
        .ok_or_else(|| not_found_error("User not found"))?;

    info!("Profile updated for user {}", user.id);
    Ok(Json(UserResponse::new(user)))
}
