use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user_model::UserResponse;

#[derive(Serialize, Deserialize, Validate)]
pub struct IngredientAmountRequest {
    pub id: i64,
    #[validate(range(min = 1, message = "Amount must be at least 1"))]
    pub amount: i32,
}

// Used for both create and update: the association set is always sent whole
// and replaced whole (delete-then-bulk-insert inside one transaction).
#[derive(Deserialize, Validate)]
pub struct RecipeWriteRequest {
    #[validate(length(min = 1, message = "At least one ingredient is required"))]
    #[validate(nested)]
    pub ingredients: Vec<IngredientAmountRequest>,

    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    #[validate(length(max = 200, message = "Name must be at most 200 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    pub image: String,

    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    pub text: String,

    #[validate(range(min = 1, message = "Cooking time must be at least 1 minute"))]
    pub cooking_time: i32,
}

#[derive(Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

// Minimal representation returned by the favorite/cart endpoints and nested
// under subscribed authors
#[derive(Debug, Serialize)]
pub struct RecipeShortResponse {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

#[derive(Serialize)]
pub struct RecipeListResponse {
    pub data: Vec<RecipeResponse>,
    pub meta: PaginationMeta,
}

#[derive(Serialize)]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

#[derive(Deserialize)]
pub struct RecipeFilterParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub author: Option<i64>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

#[derive(Serialize)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}
