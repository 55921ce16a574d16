use crate::config::AppState;
use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub mod auth_route;
pub mod ingredient_route;
pub mod recipe_route;
pub mod short_link_route;
pub mod user_route;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let cors = CorsLayer::new()
        // Allow `GET`, `POST`, `OPTIONS`, `PATCH`, `DELETE` methods
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
        ])
        // Allow requests from any origin
        .allow_origin(Any)
        // Allow any headers
        .allow_headers(Any);

    Router::new()
        .nest("/api/auth", auth_route::auth_routes(state.clone()))
        .nest(
            "/api/ingredients",
            ingredient_route::ingredient_routes(),
        )
        .nest("/api/recipes", recipe_route::recipe_routes(state.clone()))
        .nest("/api/users", user_route::user_routes(state.clone()))
        .nest("/s", short_link_route::short_link_routes())
        // Health check
        .route("/api/health", axum::routing::get(|| async { "OK" }))
        .layer(cors)
}
