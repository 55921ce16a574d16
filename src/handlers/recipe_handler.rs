use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension,
};

use crate::config::{AppState, Config};
use crate::models::auth_model::{CurrentUser, MaybeUser};
use crate::models::recipe_model::{RecipeFilterParams, RecipeWriteRequest, ShortLinkResponse};
use crate::services::recipe_service::RecipeService;
use crate::services::relation_service::{FavoriteSet, RelationService, ShoppingCartSet};
use crate::services::shopping_list_service::ShoppingListService;
use crate::services::short_link_service::ShortLinkService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::validated_wrapper::ValidatedJson;

pub async fn list_recipes_handler(
    State(state): State<AppState>,
    Extension(viewer): Extension<MaybeUser>,
    Query(params): Query<RecipeFilterParams>,
) -> impl IntoResponse {
    let viewer_id = viewer.0.map(|u| u.id);
    match RecipeService::list_recipes(&state.db, params, viewer_id).await {
        Ok(res) => ResponseBuilder::success(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn get_recipe_handler(
    State(state): State<AppState>,
    Extension(viewer): Extension<MaybeUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let viewer_id = viewer.0.map(|u| u.id);
    match RecipeService::get_recipe(&state.db, id, viewer_id).await {
        Ok(res) => ResponseBuilder::success(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn create_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<RecipeWriteRequest>,
) -> impl IntoResponse {
    match RecipeService::create_recipe(&state.db, user.id, payload).await {
        Ok(res) => ResponseBuilder::created(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn update_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<RecipeWriteRequest>,
) -> impl IntoResponse {
    match RecipeService::update_recipe(&state.db, id, user.id, payload).await {
        Ok(res) => ResponseBuilder::success(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn delete_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RecipeService::delete_recipe(&state.db, id, user.id).await {
        Ok(()) => ResponseBuilder::no_content().into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn add_favorite_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RelationService::add::<FavoriteSet>(&state.db, user.id, id).await {
        Ok(res) => ResponseBuilder::created(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn remove_favorite_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RelationService::remove::<FavoriteSet>(&state.db, user.id, id).await {
        Ok(()) => ResponseBuilder::no_content().into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn add_to_cart_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RelationService::add::<ShoppingCartSet>(&state.db, user.id, id).await {
        Ok(res) => ResponseBuilder::created(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn remove_from_cart_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RelationService::remove::<ShoppingCartSet>(&state.db, user.id, id).await {
        Ok(()) => ResponseBuilder::no_content().into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn download_shopping_cart_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    match ShoppingListService::build_document(&state.db, user.id).await {
        Ok(document) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"shopping_cart.txt\"",
                ),
            ],
            document,
        )
            .into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let cfg = Config::init();
    match ShortLinkService::get_or_create(&state.db, id, &cfg.base_url).await {
        Ok(url) => ResponseBuilder::success(ShortLinkResponse { short_link: url }).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}
