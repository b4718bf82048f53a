use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{BidResponse, PlaceBidRequest};
use crate::state::AppState;
use auction_types::errors::AuctionError;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;

/// `POST /v1/bids`
pub async fn place_bid(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<PlaceBidRequest>, JsonRejection>,
) -> Result<Json<BidResponse>, AppError> {
    let own_team = user.require_bidder()?.clone();
    let Json(request) = payload?;
    let (team, amount) = request.validate().map_err(AuctionError::from)?;

    if team != own_team {
        return Err(AppError::Forbidden(format!(
            "{} may only bid for {}",
            user.username, own_team
        )));
    }

    state.bid_limiter.check(&team)?;

    let event = state
        .with_engine({
            let team = team.clone();
            move |engine| engine.place_bid(&team, amount)
        })
        .await?;

    info!(username = %user.username, team = %team, amount = %amount, "Bid accepted");
    Ok(Json(BidResponse {
        status: "success",
        event,
    }))
}
