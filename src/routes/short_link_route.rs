use crate::config::AppState;
use crate::handlers::short_link_handler::*;
use axum::{routing::get, Router};

pub fn short_link_routes() -> Router<AppState> {
    Router::new().route("/{slug}", get(resolve_short_link_handler))
}
