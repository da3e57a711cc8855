use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

/// Routes mounted under `/api`.
pub fn router() -> Router<AppState> {
    handlers::history_routes()
}
