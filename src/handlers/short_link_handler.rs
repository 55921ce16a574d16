use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::config::AppState;
use crate::services::short_link_service::ShortLinkService;
use crate::utils::api_response::ResponseBuilder;

/// External entry point for shared links: redirects to the canonical recipe
/// location built from the id.
pub async fn resolve_short_link_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match ShortLinkService::resolve(&state.db, &slug).await {
        Ok(recipe_id) => Redirect::to(&format!("/recipes/{}/", recipe_id)).into_response(),
        Err((status, msg)) => ResponseBuilder::error(status, &msg).into_response(),
    }
}
