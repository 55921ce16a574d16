use crate::config::AppState;
use crate::handlers::user_handler::*;
use crate::middleware::auth_middleware::{jwt_middleware, optional_jwt_middleware};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn user_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_users_handler))
        .route("/{id}", get(get_user_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_jwt_middleware,
        ));

    let protected = Router::new()
        .route("/subscriptions", get(list_subscriptions_handler))
        .route(
            "/{id}/subscribe",
            post(subscribe_handler).delete(unsubscribe_handler),
        )
        .layer(middleware::from_fn_with_state(state, jwt_middleware));

    Router::new().merge(protected).merge(public)
}
