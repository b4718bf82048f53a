//! Types library for the live item auction
//!
//! Every record the auction persists or publishes is defined here, so the
//! engine, the store adapter, and the gateway agree on one wire shape.
//!
//! # Modules
//! - `ids`: Identifiers (PlayerId, TeamName)
//! - `numeric`: Non-negative integer money (`Amount`)
//! - `player`: Auctioned items and their intake form
//! - `team`: Bidding teams and their purses
//! - `state`: The singleton auction state and its status machine
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod player;
pub mod team;
pub mod state;
pub mod errors;
