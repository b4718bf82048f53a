use crate::error::AppError;
use crate::models::{LoginRequest, LoginResponse};
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info, warn};

pub async fn health() -> &'static str {
    "ok"
}

/// `POST /v1/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = payload?;

    let Some(user) = state.users.authenticate(&request.username, &request.password) else {
        warn!(username = %request.username, "Login failed");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };

    let token = state.tokens.issue(&user)?;
    info!(username = %user.username, role = %user.role, "Login");

    Ok(Json(LoginResponse {
        token,
        role: user.role,
        team_name: user.team_name,
    }))
}
