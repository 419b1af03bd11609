//! Request and response bodies of the REST API.

pub mod auth;
pub mod tickets;
