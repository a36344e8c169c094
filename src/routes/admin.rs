//! Admin catalog handlers
//!
//! Every handler checks the shared secret before touching the store or the
//! upload directory.

use super::extract::AdminForm;
use crate::error::{not_found_error, ApiResult};
use crate::models::{parse_id, Animal, AnimalUpdate, NewAnimal};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use tracing::{debug, info};

/// POST /api/admin/animals
pub async fn create_animal(
    State(state): State<SharedState>,
    headers: HeaderMap,
    form: AdminForm,
) -> ApiResult<Json<Animal>> {
    debug!("Creating animal");
    state.admin_secret.authorize(&headers, form.admin_secret())?;

    let mut animal = NewAnimal::from_fields(&form.fields, None)?;
    if let Some(photo) = &form.photo {
        animal.photo = Some(state.uploads.save(photo).await?);
    }

    let created = state.store.create_animal(animal).await?;
    info!("Animal created: {} (id: {})", created.name, created.id);
    Ok(Json(created))
}

/// PUT /api/admin/animals/{id}
///
/// Shallow merge: only submitted fields change.
pub async fn update_animal(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    form: AdminForm,
) -> ApiResult<Json<Animal>> {
    debug!("Updating animal {}", id);
    state.admin_secret.authorize(&headers, form.admin_secret())?;
    let id = parse_id(&id, "invalid id")?;

    let mut update = AnimalUpdate::from_fields(&form.fields, None)?;
    if let Some(photo) = &form.photo {
        // Don't leave a file behind for an id that doesn't exist
        if state.store.find_animal(id).await?.is_none() {
            return Err(not_found_error("animal not found"));
        }
        update.photo = Some(state.uploads.save(photo).await?);
    }

    let updated = state
        .store
        .update_animal(id, update)
        .await?
        .ok_or_else(|| not_found_error("animal not found"))?;

    info!("Animal updated: {} (id: {})", updated.name, updated.id);
    Ok(Json(updated))
}

/// POST /api/admin/animals/{id}/adopt
pub async fn toggle_adopted(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    form: AdminForm,
) -> ApiResult<Json<Animal>> {
    debug!("Toggling adoption for animal {}", id);
    state.admin_secret.authorize(&headers, form.admin_secret())?;
    let id = parse_id(&id, "invalid id")?;

    let animal = state
        .store
        .toggle_adopted(id)
        .await?
        .ok_or_else(|| not_found_error("animal not found"))?;

    info!("Animal {} marked adopted={}", animal.id, animal.adopted);
    Ok(Json(animal))
}
