//! Authentication route handlers
//!
//! Signup and login only. There are no sessions: the client keeps the
//! returned user record and sends its id where needed.

use super::extract::AppJson;
use crate::error::{ApiResult, AppError};
use crate::models::{LoginRequest, NewUser, SignupRequest, UserResponse};
use crate::state::SharedState;
use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, info, warn};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<SharedState>,
    AppJson(req): AppJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let signup = req.into_signup()?;
    debug!("Registering user: {}", signup.email);

    if state.store.find_user_by_email(&signup.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state.passwords.hash(&signup.password)?;
    // The store re-checks uniqueness so concurrent signups still conflict
    let user = state
        .store
        .create_user(NewUser {
            name: signup.name,
            email: signup.email,
            password_hash,
            mobile: signup.mobile,
            address: signup.address,
        })
        .await?;

    info!("User registered: {} (id: {})", user.email, user.id);
    Ok((StatusCode::CREATED, Json(UserResponse::new(user))))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password get the same answer.
pub async fn login(
    State(state): State<SharedState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<UserResponse>> {
    let (email, password) = req.into_credentials()?;
    debug!("Login attempt: {}", email);

    let Some(user) = state.store.find_user_by_email(&email).await? else {
        warn!("Login attempt for unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !state.passwords.verify(&password, &user.password_hash) {
        warn!("Login attempt with wrong password for user {}", user.id);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    info!("User logged in: {}", user.id);
    Ok(Json(UserResponse::new(user)))
}
