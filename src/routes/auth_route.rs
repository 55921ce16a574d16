use crate::config::AppState;
use crate::handlers::auth_handler::*;
use crate::middleware::auth_middleware::jwt_middleware;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me_handler))
        .layer(middleware::from_fn_with_state(state, jwt_middleware));

    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .merge(protected)
}
