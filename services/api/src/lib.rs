//! YaMDb API service
//!
//! REST backend for the title catalog: categories, genres and titles managed
//! by admins, reviews and comments written by users, and accounts created
//! through confirmation-code signup. Everything is served under `/v1/`.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod permissions;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
