use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{AddUserRequest, UserResponse};
use crate::state::AppState;
use crate::users::Role;
use auction_types::errors::{AuctionError, ValidationError};
use auction_types::ids::TeamName;
use auction_types::player::{Player, PlayerIntake};
use auction_types::team::{Team, TeamIntake};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::info;

/// `POST /v1/admin/players`
pub async fn register_player(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<PlayerIntake>, JsonRejection>,
) -> Result<(StatusCode, Json<Player>), AppError> {
    user.require_admin()?;
    let Json(intake) = payload?;

    let player = state.with_engine(move |engine| engine.register_player(intake)).await?;
    info!(player_id = %player.id, name = %player.name, "Player registered");
    Ok((StatusCode::CREATED, Json(player)))
}

/// `POST /v1/admin/teams`
pub async fn register_team(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<TeamIntake>, JsonRejection>,
) -> Result<(StatusCode, Json<Team>), AppError> {
    user.require_admin()?;
    let Json(intake) = payload?;

    let team = state.with_engine(move |engine| engine.register_team(intake)).await?;
    info!(team = %team.team_name, purse = %team.purse, "Team registered");
    Ok((StatusCode::CREATED, Json(team)))
}

/// `POST /v1/admin/users`
///
/// A bidder account must name a team that is already registered.
pub async fn add_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<AddUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    user.require_admin()?;
    let Json(request) = payload?;

    let role: Role = request.role.parse().map_err(AuctionError::from)?;
    let team_name = match request.team_name.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(name) => Some(TeamName::new(name).map_err(AuctionError::from)?),
    };
    if let Some(team) = &team_name {
        let known = state.engine.snapshot().teams.iter().any(|t| &t.team_name == team);
        if !known {
            return Err(AuctionError::from(ValidationError::UnknownTeam {
                team: team.to_string(),
            })
            .into());
        }
    }

    let record = state
        .with_users(move |users| {
            users.add_user(&request.username, &request.password, role, team_name)
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            username: record.username,
            role: record.role,
            team_name: record.team_name,
        }),
    ))
}
