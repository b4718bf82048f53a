use crate::handlers::{admin, auction, bid, live, session};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let auction_routes = Router::new()
        .route("/start", post(auction::start))
        .route("/next", post(auction::next))
        .route("/pass", post(auction::pass))
        .route("/finalize", post(auction::finalize))
        .route("/round2", post(auction::round_two))
        .route("/reset", post(auction::reset));

    let admin_routes = Router::new()
        .route("/players", post(admin::register_player))
        .route("/teams", post(admin::register_team))
        .route("/users", post(admin::add_user));

    let api_routes = Router::new()
        .route("/login", post(session::login))
        .route("/live_state", get(live::live_state))
        .route("/ws", get(live::ws_handler))
        .route("/bids", post(bid::place_bid))
        .nest("/auction", auction_routes)
        .nest("/admin", admin_routes);

    Router::new()
        .route("/health", get(session::health))
        .nest("/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
