//! Public animal catalog handlers

use crate::error::{not_found_error, ApiResult};
use crate::models::{parse_id, Animal, AnimalListQuery, AnimalType};
use crate::state::SharedState;
use crate::store::AnimalFilter;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

/// GET /api/animals[?type=dog|cat|other]
///
/// Newest first. The type must match exactly, so `Cat` or `parrot` match
/// nothing.
pub async fn list_animals(
    State(state): State<SharedState>,
    Query(query): Query<AnimalListQuery>,
) -> ApiResult<Json<Vec<Animal>>> {
    let kind = match query.kind.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(raw) => match raw.parse::<AnimalType>() {
            Ok(kind) if kind.as_str() == raw => Some(kind),
            _ => {
                debug!("Unknown animal type filter '{}'", raw);
                return Ok(Json(Vec::new()));
            }
        },
        None => None,
    };

    let animals = state.store.list_animals(AnimalFilter { kind }).await?;
    Ok(Json(animals))
}

/// GET /api/animals/{id}
pub async fn get_animal(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Animal>> {
    debug!("Fetching animal {}", id);
    let id = parse_id(&id, "invalid id")?;
    state
        .store
        .find_animal(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found_error("not found"))
}
