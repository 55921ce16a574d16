use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::config::AppState;
use crate::models::ingredient_model::IngredientFilterParams;
use crate::services::ingredient_service::IngredientService;
use crate::utils::api_response::ResponseBuilder;

pub async fn list_ingredients_handler(
    State(state): State<AppState>,
    Query(params): Query<IngredientFilterParams>,
) -> impl IntoResponse {
    match IngredientService::list_ingredients(&state.db, params.name).await {
        Ok(res) => ResponseBuilder::success(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn get_ingredient_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match IngredientService::get_ingredient(&state.db, id).await {
        Ok(res) => ResponseBuilder::success(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}
