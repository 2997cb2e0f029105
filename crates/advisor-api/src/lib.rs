//! HTTP API for the ERP advisor: a localhost axum server exposing the
//! chat dispatcher behind bearer-token auth.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::load_or_generate_token;
pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
