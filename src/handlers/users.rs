// handlers/users.rs - POST /api/users handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::registration::RegistrationCandidate;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/users - Register user
///
/// Expected Input:
/// ```json
/// { "name": "Ann", "email": "ann@x.com", "password": "secret1" }
/// ```
///
/// Responses:
/// - 200 `{ "token": "<jwt>" }`
/// - 400 `{ "errors": [{ "msg": "...", "param": "...", "location": "body" }] }`
///   for validation failures, `{ "errors": [{ "msg": "User already exists" }] }`
///   for a taken email
/// - 500 with an empty body for anything on the server side
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegistrationCandidate>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(candidate) = payload.map_err(|rejection| {
        tracing::debug!("Rejected registration body: {}", rejection.body_text());
        ApiError::invalid_json(rejection.body_text())
    })?;

    let registration = state.registration.register(candidate).await?;

    Ok(Json(TokenResponse {
        token: registration.token,
    }))
}
