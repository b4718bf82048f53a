//! Auctioneer commands. Each answers with the events it produced.

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::CommandResponse;
use crate::state::AppState;
use auction_engine::{AuctionEngine, AuctionEvent};
use auction_types::errors::AuctionError;
use axum::{extract::State, Json};
use tracing::info;

async fn run(
    state: &AppState,
    user: &AuthenticatedUser,
    command: &'static str,
    op: fn(&AuctionEngine) -> Result<Vec<AuctionEvent>, AuctionError>,
) -> Result<Json<CommandResponse>, AppError> {
    user.require_auctioneer()?;
    let events = state.with_engine(op).await?;
    info!(username = %user.username, command, events = events.len(), "Auctioneer command");
    Ok(Json(CommandResponse::success(events)))
}

pub async fn start(State(state): State<AppState>, user: AuthenticatedUser) -> Result<Json<CommandResponse>, AppError> {
    run(&state, &user, "start", AuctionEngine::start_auction).await
}

pub async fn next(State(state): State<AppState>, user: AuthenticatedUser) -> Result<Json<CommandResponse>, AppError> {
    run(&state, &user, "next", AuctionEngine::advance_to_next_player).await
}

pub async fn pass(State(state): State<AppState>, user: AuthenticatedUser) -> Result<Json<CommandResponse>, AppError> {
    run(&state, &user, "pass", AuctionEngine::pass_current_player).await
}

pub async fn finalize(State(state): State<AppState>, user: AuthenticatedUser) -> Result<Json<CommandResponse>, AppError> {
    run(&state, &user, "finalize", AuctionEngine::finalize_sale).await
}

pub async fn round_two(State(state): State<AppState>, user: AuthenticatedUser) -> Result<Json<CommandResponse>, AppError> {
    run(&state, &user, "round2", AuctionEngine::start_round_two).await
}

pub async fn reset(State(state): State<AppState>, user: AuthenticatedUser) -> Result<Json<CommandResponse>, AppError> {
    run(&state, &user, "reset", AuctionEngine::reset_auction).await
}
