use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::ErrorKind;
use sea_orm::EntityTrait;

use crate::config::AppState;
use crate::entities::user::Entity as User;
use crate::models::auth_model::{CurrentUser, MaybeUser};
use crate::utils::api_response::ResponseBuilder;
use crate::utils::jwt_utils::JwtUtils;

/// Rejects the request unless a valid bearer token maps to an existing user;
/// inserts `CurrentUser` for the handler.
pub async fn jwt_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    match authenticate(&state, req.headers()).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(rejection) => Ok(rejection),
    }
}

/// Public-route variant: never rejects, always inserts `MaybeUser` so handlers
/// can personalize flags when a token happens to be present.
pub async fn optional_jwt_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = authenticate(&state, req.headers()).await.ok();
    req.extensions_mut().insert(MaybeUser(user));
    Ok(next.run(req).await)
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, Response> {
    let auth_header = headers.get(header::AUTHORIZATION).ok_or_else(|| {
        ResponseBuilder::error(StatusCode::UNAUTHORIZED, "Authorization header is missing")
            .into_response()
    })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        ResponseBuilder::error(StatusCode::UNAUTHORIZED, "Invalid Authorization header format")
            .into_response()
    })?;

    if !auth_str.starts_with("Bearer ") {
        return Err(ResponseBuilder::error(
            StatusCode::UNAUTHORIZED,
            "Invalid token format. Missing 'Bearer ' prefix",
        )
        .into_response());
    }

    let token = &auth_str[7..];

    let token_data = JwtUtils::validate_jwt(token).map_err(|e| {
        let message = match e.kind() {
            ErrorKind::ExpiredSignature => "Token has expired",
            ErrorKind::InvalidToken => "Token is invalid",
            ErrorKind::InvalidSignature => "Invalid token signature",
            _ => "Authentication failed",
        };
        ResponseBuilder::error(StatusCode::UNAUTHORIZED, message).into_response()
    })?;

    let claims = token_data.claims;

    // Token subject must still exist
    let user = User::find_by_id(claims.sub)
        .one(state.db.as_ref())
        .await
        .map_err(|e| {
            tracing::error!("user lookup failed: {}", e);
            ResponseBuilder::error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
                .into_response()
        })?
        .ok_or_else(|| {
            ResponseBuilder::error(StatusCode::UNAUTHORIZED, "User not found").into_response()
        })?;

    Ok(CurrentUser {
        id: user.id,
        username: user.username,
        email: user.email,
    })
}
