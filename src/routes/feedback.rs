//! Feedback and newsletter handlers

use super::extract::AppJson;
use crate::error::{validation_error, ApiResult};
use crate::models::{trimmed, AckResponse, FeedbackRequest};
use crate::state::SharedState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Default, Deserialize)]
pub struct NewsletterRequest {
    pub email: Option<String>,
}

/// POST /api/feedback
pub async fn submit_feedback(
    State(state): State<SharedState>,
    AppJson(req): AppJson<FeedbackRequest>,
) -> ApiResult<(StatusCode, Json<AckResponse>)> {
    let feedback = req.into_feedback()?;
    debug!("Storing feedback from {}", feedback.email);
    let feedback = state.store.create_feedback(feedback).await?;
    info!("Feedback {} received from {}", feedback.id, feedback.email);

    Ok((
        StatusCode::CREATED,
        Json(AckResponse::created("Thank you for your feedback!", feedback.id)),
    ))
}

/// POST /api/newsletter
///
/// Subscriptions are only logged, never stored.
pub async fn newsletter_signup(
    AppJson(req): AppJson<NewsletterRequest>,
) -> ApiResult<Json<AckResponse>> {
    let email = trimmed(req.email).ok_or_else(|| validation_error("missing email"))?;
    info!("Newsletter signup: {}", email);
    Ok(Json(AckResponse::ok()))
}
