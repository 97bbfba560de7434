//! linkforge: a URL shortener with click tracking and a paginated request
//! log, served over HTTP with axum.

pub mod admin;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod log_store;
pub mod logs;
pub mod middleware_impls;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
pub mod store;
pub mod util;
