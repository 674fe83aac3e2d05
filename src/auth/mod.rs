use crate::state::AppState;
use axum::Router;

pub mod cookie;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod token;

pub use services::AuthService;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
