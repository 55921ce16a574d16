use axum::http::StatusCode;
use sea_orm::*;

use crate::entities::{
    subscription,
    user::{self, Entity as User},
};
use crate::models::recipe_model::PaginationMeta;
use crate::models::user_model::{UserListParams, UserListResponse, UserResponse};

const DEFAULT_PAGE_SIZE: u64 = 6;
const MAX_PAGE_SIZE: u64 = 100;

pub struct UserService;

impl UserService {
    pub async fn list_users(
        db: &DatabaseConnection,
        params: UserListParams,
        viewer: Option<i64>,
    ) -> Result<UserListResponse, (StatusCode, String)> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let paginator = User::find()
            .order_by_asc(user::Column::Id)
            .paginate(db, limit);

        let total = paginator.num_items().await.map_err(|e| {
            tracing::error!("user count failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;
        let users = paginator.fetch_page(page - 1).await.map_err(|e| {
            tracing::error!("user page fetch failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;

        let mut data = Vec::with_capacity(users.len());
        for u in users {
            data.push(Self::map_to_response(db, u, viewer).await?);
        }

        Ok(UserListResponse {
            data,
            meta: PaginationMeta { total, page, limit },
        })
    }

    pub async fn get_user(
        db: &DatabaseConnection,
        user_id: i64,
        viewer: Option<i64>,
    ) -> Result<UserResponse, (StatusCode, String)> {
        let user = User::find_by_id(user_id)
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("user lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?
            .ok_or((StatusCode::NOT_FOUND, "User not found".to_string()))?;

        Self::map_to_response(db, user, viewer).await
    }

    async fn map_to_response(
        db: &DatabaseConnection,
        user: user::Model,
        viewer: Option<i64>,
    ) -> Result<UserResponse, (StatusCode, String)> {
        let is_subscribed = match viewer {
            Some(viewer_id) if viewer_id != user.id => subscription::Entity::find()
                .filter(subscription::Column::UserId.eq(viewer_id))
                .filter(subscription::Column::AuthorId.eq(user.id))
                .count(db)
                .await
                .map_err(|e| {
                    tracing::error!("subscription check failed: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
                })?
                > 0,
            _ => false,
        };

        Ok(UserResponse {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        })
    }
}
