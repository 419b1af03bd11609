pub mod auth;
pub mod tickets;
