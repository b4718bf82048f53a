pub mod admin;
pub mod auction;
pub mod bid;
pub mod live;
pub mod session;
