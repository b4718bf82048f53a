use crate::auth::TokenAuthority;
use crate::config::GatewayConfig;
use crate::error::AppError;
use crate::rate_limit::BidRateLimiter;
use crate::users::UserDirectory;
use auction_engine::AuctionEngine;
use auction_types::errors::AuctionError;
use persistence::StateStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AuctionEngine>,
    pub users: Arc<UserDirectory>,
    pub tokens: Arc<TokenAuthority>,
    pub bid_limiter: Arc<BidRateLimiter>,
}

impl AppState {
    /// Open the engine and user directory over `store`, seeding the
    /// bootstrap admin if one is configured and no users exist yet.
    pub fn open(store: Arc<dyn StateStore>, config: &GatewayConfig) -> Result<Self, AuctionError> {
        let engine = AuctionEngine::open(Arc::clone(&store), config.engine.clone())?;
        let users = UserDirectory::open(store)?;

        if let (Some(user), Some(password)) = (&config.admin_user, &config.admin_password) {
            users.bootstrap_admin(user, password)?;
        }

        Ok(Self {
            engine: Arc::new(engine),
            users: Arc::new(users),
            tokens: Arc::new(TokenAuthority::new(&config.jwt_secret, config.token_ttl)),
            bid_limiter: Arc::new(BidRateLimiter::new(
                config.bid_rate_capacity,
                config.bid_rate_refill,
            )),
        })
    }

    /// Run an engine operation off the async reactor; engine calls hold a
    /// lock across a synchronous store write.
    pub async fn with_engine<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&AuctionEngine) -> Result<T, AuctionError> + Send + 'static,
        T: Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        run_blocking(move || op(&engine)).await
    }

    pub async fn with_users<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&UserDirectory) -> Result<T, AuctionError> + Send + 'static,
        T: Send + 'static,
    {
        let users = Arc::clone(&self.users);
        run_blocking(move || op(&users)).await
    }
}

async fn run_blocking<T, F>(op: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AuctionError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(AppError::from)
}
