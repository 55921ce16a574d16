use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension,
};

use crate::config::AppState;
use crate::models::auth_model::{CurrentUser, MaybeUser};
use crate::models::user_model::{RecipesLimitParam, SubscriptionParams, UserListParams};
use crate::services::subscription_service::SubscriptionService;
use crate::services::user_service::UserService;
use crate::utils::api_response::ResponseBuilder;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(viewer): Extension<MaybeUser>,
    Query(params): Query<UserListParams>,
) -> impl IntoResponse {
    let viewer_id = viewer.0.map(|u| u.id);
    match UserService::list_users(&state.db, params, viewer_id).await {
        Ok(res) => ResponseBuilder::success(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(viewer): Extension<MaybeUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let viewer_id = viewer.0.map(|u| u.id);
    match UserService::get_user(&state.db, id, viewer_id).await {
        Ok(res) => ResponseBuilder::success(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn subscribe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Query(params): Query<RecipesLimitParam>,
) -> impl IntoResponse {
    match SubscriptionService::subscribe(&state.db, user.id, id, params.recipes_limit).await {
        Ok(res) => ResponseBuilder::created(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn unsubscribe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match SubscriptionService::unsubscribe(&state.db, user.id, id).await {
        Ok(()) => ResponseBuilder::no_content().into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn list_subscriptions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<SubscriptionParams>,
) -> impl IntoResponse {
    match SubscriptionService::list_subscriptions(&state.db, user.id, params).await {
        Ok(res) => ResponseBuilder::success(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}
