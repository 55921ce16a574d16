use axum::{extract::State, response::IntoResponse, Extension};

use crate::config::AppState;
use crate::models::auth_model::{CurrentUser, LoginRequest, RegisterRequest};
use crate::services::auth_service::AuthService;
use crate::services::user_service::UserService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::validated_wrapper::ValidatedJson;

pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> impl IntoResponse {
    match AuthService::register(&state.db, payload).await {
        Ok(res) => ResponseBuilder::created(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> impl IntoResponse {
    match AuthService::login(&state.db, payload).await {
        Ok(res) => ResponseBuilder::success(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    match UserService::get_user(&state.db, user.id, None).await {
        Ok(res) => ResponseBuilder::success(res).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}
