pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod repositories;
pub mod services;
pub mod types;
pub mod util;

pub use app::App;

#[cfg(test)]
pub(crate) mod test_utils;
