use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Query as SeaQuery};
use sea_orm::*;

use crate::entities::{
    recipe::{self, Entity as Recipe},
    subscription::{self, Entity as Subscription},
    user::{self, Entity as User},
};
use crate::models::recipe_model::{PaginationMeta, RecipeShortResponse};
use crate::models::user_model::{SubscribedAuthorResponse, SubscriptionListResponse, SubscriptionParams};
use crate::utils::db_utils::is_unique_violation;

const DEFAULT_PAGE_SIZE: u64 = 6;
const MAX_PAGE_SIZE: u64 = 100;

pub struct SubscriptionService;

impl SubscriptionService {
    pub async fn subscribe(
        db: &DatabaseConnection,
        user_id: i64,
        author_id: i64,
        recipes_limit: Option<u64>,
    ) -> Result<SubscribedAuthorResponse, (StatusCode, String)> {
        // Rejected before any state change
        if user_id == author_id {
            return Err((
                StatusCode::BAD_REQUEST,
                "You cannot subscribe to yourself".to_string(),
            ));
        }

        let author = User::find_by_id(author_id)
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("author lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?
            .ok_or((StatusCode::NOT_FOUND, "Author not found".to_string()))?;

        let inserted = subscription::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            author_id: Set(author_id),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await;

        match inserted {
            Ok(_) => Self::build_author_response(db, author, recipes_limit).await,
            Err(e) if is_unique_violation(&e) => Err((
                StatusCode::BAD_REQUEST,
                "You are already subscribed to this author".to_string(),
            )),
            Err(e) => {
                tracing::error!("subscription insert failed: {}", e);
                Err((StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()))
            }
        }
    }

    pub async fn unsubscribe(
        db: &DatabaseConnection,
        user_id: i64,
        author_id: i64,
    ) -> Result<(), (StatusCode, String)> {
        User::find_by_id(author_id)
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("author lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?
            .ok_or((StatusCode::NOT_FOUND, "Author not found".to_string()))?;

        let res = Subscription::delete_many()
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::AuthorId.eq(author_id))
            .exec(db)
            .await
            .map_err(|e| {
                tracing::error!("subscription delete failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?;

        if res.rows_affected == 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                "You are not subscribed to this author".to_string(),
            ));
        }

        Ok(())
    }

    pub async fn list_subscriptions(
        db: &DatabaseConnection,
        user_id: i64,
        params: SubscriptionParams,
    ) -> Result<SubscriptionListResponse, (StatusCode, String)> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        // Stable order by username
        let paginator = User::find()
            .filter(
                user::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(subscription::Column::AuthorId)
                        .from(subscription::Entity)
                        .and_where(Expr::col(subscription::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(user::Column::Username)
            .paginate(db, limit);

        let total = paginator.num_items().await.map_err(|e| {
            tracing::error!("subscription count failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;
        let authors = paginator.fetch_page(page - 1).await.map_err(|e| {
            tracing::error!("subscription page fetch failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;

        let mut data = Vec::with_capacity(authors.len());
        for author in authors {
            data.push(Self::build_author_response(db, author, params.recipes_limit).await?);
        }

        Ok(SubscriptionListResponse {
            data,
            meta: PaginationMeta { total, page, limit },
        })
    }

    async fn build_author_response(
        db: &DatabaseConnection,
        author: user::Model,
        recipes_limit: Option<u64>,
    ) -> Result<SubscribedAuthorResponse, (StatusCode, String)> {
        let recipes_count = Recipe::find()
            .filter(recipe::Column::AuthorId.eq(author.id))
            .count(db)
            .await
            .map_err(|e| {
                tracing::error!("recipe count failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?;

        let mut recipe_query = Recipe::find()
            .filter(recipe::Column::AuthorId.eq(author.id))
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id);

        // Display-only cap, not a data constraint
        if let Some(limit) = recipes_limit {
            recipe_query = recipe_query.limit(limit);
        }

        let recipes = recipe_query.all(db).await.map_err(|e| {
            tracing::error!("author recipe fetch failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;

        Ok(SubscribedAuthorResponse {
            email: author.email,
            id: author.id,
            username: author.username,
            first_name: author.first_name,
            last_name: author.last_name,
            is_subscribed: true,
            recipes: recipes
                .into_iter()
                .map(|r| RecipeShortResponse {
                    id: r.id,
                    name: r.name,
                    image: r.image,
                    cooking_time: r.cooking_time,
                })
                .collect(),
            recipes_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    async fn seeded_db() -> (DatabaseConnection, i64, i64) {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let mut ids = Vec::new();
        for name in ["alice", "bob"] {
            let saved = user::ActiveModel {
                id: NotSet,
                username: Set(name.to_string()),
                email: Set(format!("{}@example.com", name)),
                first_name: Set(String::new()),
                last_name: Set(String::new()),
                password_hash: Set("x".to_string()),
                created_at: Set(Utc::now()),
            }
            .insert(&db)
            .await
            .unwrap();
            ids.push(saved.id);
        }

        (db, ids[0], ids[1])
    }

    fn author_row() -> user::Model {
        user::Model {
            id: 2,
            username: "chef".to_string(),
            email: "chef@example.com".to_string(),
            first_name: "Chef".to_string(),
            last_name: "Smith".to_string(),
            password_hash: "x".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn self_subscription_is_always_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = SubscriptionService::subscribe(&db, 1, 1, None).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(err.1, "You cannot subscribe to yourself");
    }

    #[tokio::test]
    async fn subscribing_twice_is_a_conflict_with_one_edge() {
        let (db, follower, author) = seeded_db().await;

        SubscriptionService::subscribe(&db, follower, author, None)
            .await
            .unwrap();
        let err = SubscriptionService::subscribe(&db, follower, author, None)
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(err.1, "You are already subscribed to this author");

        let edges = Subscription::find().count(&db).await.unwrap();
        assert_eq!(edges, 1);
    }

    #[tokio::test]
    async fn unsubscribing_when_not_subscribed_is_an_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![author_row()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = SubscriptionService::unsubscribe(&db, 1, 2).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(err.1, "You are not subscribed to this author");
    }

    #[tokio::test]
    async fn unsubscribing_from_unknown_author_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let err = SubscriptionService::unsubscribe(&db, 1, 99).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }
}
