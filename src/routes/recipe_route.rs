use crate::config::AppState;
use crate::handlers::recipe_handler::*;
use crate::middleware::auth_middleware::{jwt_middleware, optional_jwt_middleware};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn recipe_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_recipes_handler))
        .route("/{id}", get(get_recipe_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_jwt_middleware,
        ));

    let protected = Router::new()
        .route("/", post(create_recipe_handler))
        .route(
            "/{id}",
            axum::routing::patch(update_recipe_handler).delete(delete_recipe_handler),
        )
        .route(
            "/{id}/favorite",
            post(add_favorite_handler).delete(remove_favorite_handler),
        )
        .route(
            "/{id}/shopping_cart",
            post(add_to_cart_handler).delete(remove_from_cart_handler),
        )
        .route("/download_shopping_cart", get(download_shopping_cart_handler))
        .layer(middleware::from_fn_with_state(state, jwt_middleware));

    Router::new()
        .route("/{id}/get-link", get(get_link_handler))
        .merge(public)
        .merge(protected)
}
