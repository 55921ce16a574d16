use serde::{Deserialize, Serialize};

use crate::models::recipe_model::{PaginationMeta, RecipeShortResponse};

#[derive(Serialize)]
pub struct UserResponse {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

// Author representation returned by subscribe and the subscriptions listing:
// profile plus recent recipes (display-capped) and the full recipe count.
#[derive(Debug, Serialize)]
pub struct SubscribedAuthorResponse {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeShortResponse>,
    pub recipes_count: u64,
}

#[derive(Serialize)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    pub meta: PaginationMeta,
}

#[derive(Serialize)]
pub struct SubscriptionListResponse {
    pub data: Vec<SubscribedAuthorResponse>,
    pub meta: PaginationMeta,
}

#[derive(Deserialize)]
pub struct UserListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct SubscriptionParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    // Display-only cap on nested recipes, not a data constraint
    pub recipes_limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct RecipesLimitParam {
    pub recipes_limit: Option<u64>,
}
