//! Adoption application handler

use super::extract::AppJson;
use crate::error::{not_found_error, validation_error, ApiResult};
use crate::models::{parse_id, trimmed, AckResponse, ApplyRequest, NewApplication};
use crate::state::SharedState;
use axum::{extract::State, Json};
use tracing::{debug, info};
use uuid::Uuid;

/// POST /api/apply
///
/// A known `userId` supplies the applicant's name and email; otherwise both
/// must be in the body. An unparseable or unknown `userId` is treated as
/// absent.
pub async fn apply(
    State(state): State<SharedState>,
    AppJson(req): AppJson<ApplyRequest>,
) -> ApiResult<Json<AckResponse>> {
    let animal_id = trimmed(req.animal_id).ok_or_else(|| validation_error("missing animalId"))?;
    let animal_id = parse_id(&animal_id, "invalid animalId")?;

    if state.store.find_animal(animal_id).await?.is_none() {
        return Err(not_found_error("animal not found"));
    }

    let user = match trimmed(req.user_id).and_then(|raw| Uuid::parse_str(&raw).ok()) {
        Some(user_id) => {
            let user = state.store.find_user(user_id).await?;
            if user.is_none() {
                debug!("Application references unknown user {}", user_id);
            }
            user
        }
        None => None,
    };

    let (user_id, name, email) = match user {
        Some(user) => (Some(user.id), Some(user.name), Some(user.email)),
        None => (
            None,
            trimmed(req.name),
            trimmed(req.email).map(|e| e.to_lowercase()),
        ),
    };
    let (Some(name), Some(email)) = (name, email) else {
        return Err(validation_error("missing user details"));
    };

    let application = state
        .store
        .create_application(NewApplication {
            animal_id,
            user_id,
            name,
            email,
            message: trimmed(req.message),
        })
        .await?;

    info!(
        "Application {} received for animal {}",
        application.id, application.animal_id
    );
    Ok(Json(AckResponse::created("Application received", application.id)))
}
