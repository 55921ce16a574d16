use std::future::Future;

use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::*;

use crate::entities::{favorite, recipe, recipe::Entity as Recipe, shopping_cart_item};
use crate::models::recipe_model::RecipeShortResponse;
use crate::utils::db_utils::is_unique_violation;

/// Favorites and the shopping cart are the same shape: a per-user set of
/// recipe references with a uniqueness invariant. The set operations are
/// implemented once against this capability trait; the markers below bind it
/// to the concrete tables.
pub trait UserRecipeSet {
    const NOUN: &'static str;

    fn exists(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
    ) -> impl Future<Output = Result<bool, DbErr>> + Send + '_;

    fn insert(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
    ) -> impl Future<Output = Result<(), DbErr>> + Send + '_;

    fn remove(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
    ) -> impl Future<Output = Result<u64, DbErr>> + Send + '_;
}

pub struct FavoriteSet;

impl UserRecipeSet for FavoriteSet {
    const NOUN: &'static str = "favorites";

    fn exists(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
    ) -> impl Future<Output = Result<bool, DbErr>> + Send + '_ {
        async move {
            let count = favorite::Entity::find()
                .filter(favorite::Column::UserId.eq(user_id))
                .filter(favorite::Column::RecipeId.eq(recipe_id))
                .count(db)
                .await?;
            Ok(count > 0)
        }
    }

    fn insert(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
    ) -> impl Future<Output = Result<(), DbErr>> + Send + '_ {
        async move {
            favorite::ActiveModel {
                id: NotSet,
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                created_at: Set(Utc::now()),
            }
            .insert(db)
            .await?;
            Ok(())
        }
    }

    fn remove(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
    ) -> impl Future<Output = Result<u64, DbErr>> + Send + '_ {
        async move {
            let res = favorite::Entity::delete_many()
                .filter(favorite::Column::UserId.eq(user_id))
                .filter(favorite::Column::RecipeId.eq(recipe_id))
                .exec(db)
                .await?;
            Ok(res.rows_affected)
        }
    }
}

pub struct ShoppingCartSet;

impl UserRecipeSet for ShoppingCartSet {
    const NOUN: &'static str = "the shopping cart";

    fn exists(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
    ) -> impl Future<Output = Result<bool, DbErr>> + Send + '_ {
        async move {
            let count = shopping_cart_item::Entity::find()
                .filter(shopping_cart_item::Column::UserId.eq(user_id))
                .filter(shopping_cart_item::Column::RecipeId.eq(recipe_id))
                .count(db)
                .await?;
            Ok(count > 0)
        }
    }

    fn insert(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
    ) -> impl Future<Output = Result<(), DbErr>> + Send + '_ {
        async move {
            shopping_cart_item::ActiveModel {
                id: NotSet,
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                created_at: Set(Utc::now()),
            }
            .insert(db)
            .await?;
            Ok(())
        }
    }

    fn remove(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
    ) -> impl Future<Output = Result<u64, DbErr>> + Send + '_ {
        async move {
            let res = shopping_cart_item::Entity::delete_many()
                .filter(shopping_cart_item::Column::UserId.eq(user_id))
                .filter(shopping_cart_item::Column::RecipeId.eq(recipe_id))
                .exec(db)
                .await?;
            Ok(res.rows_affected)
        }
    }
}

pub struct RelationService;

impl RelationService {
    pub async fn add<S: UserRecipeSet>(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<RecipeShortResponse, (StatusCode, String)> {
        let recipe = Recipe::find_by_id(recipe_id)
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("recipe lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?
            .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;

        // The unique index is the authoritative duplicate check; a violation
        // means a concurrent or repeated add, never a crash.
        match S::insert(db, user_id, recipe_id).await {
            Ok(()) => Ok(Self::map_to_short(recipe)),
            Err(e) if is_unique_violation(&e) => Err((
                StatusCode::BAD_REQUEST,
                format!("Recipe \"{}\" is already in {}", recipe.name, S::NOUN),
            )),
            Err(e) => {
                tracing::error!("failed to add recipe {} to {}: {}", recipe_id, S::NOUN, e);
                Err((StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()))
            }
        }
    }

    pub async fn remove<S: UserRecipeSet>(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<(), (StatusCode, String)> {
        let recipe = Recipe::find_by_id(recipe_id)
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("recipe lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?
            .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;

        let deleted = S::remove(db, user_id, recipe_id).await.map_err(|e| {
            tracing::error!("failed to remove recipe {} from {}: {}", recipe_id, S::NOUN, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;

        if deleted == 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Recipe \"{}\" is not in {}", recipe.name, S::NOUN),
            ));
        }

        Ok(())
    }

    fn map_to_short(recipe: recipe::Model) -> RecipeShortResponse {
        RecipeShortResponse {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    // In-memory SQLite with the real schema, so the unique indexes fire
    async fn seeded_db() -> (DatabaseConnection, i64, i64) {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let owner = user::ActiveModel {
            id: NotSet,
            username: Set("alice".to_string()),
            email: Set("alice@example.com".to_string()),
            first_name: Set("Alice".to_string()),
            last_name: Set("Smith".to_string()),
            password_hash: Set("x".to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&db)
        .await
        .unwrap();

        let recipe = recipe::ActiveModel {
            id: NotSet,
            author_id: Set(owner.id),
            name: Set("Pancakes".to_string()),
            image: Set("http://example.com/pancakes.png".to_string()),
            text: Set("Mix and fry".to_string()),
            cooking_time: Set(20),
            created_at: Set(Utc::now()),
        }
        .insert(&db)
        .await
        .unwrap();

        (db, owner.id, recipe.id)
    }

    fn recipe_row() -> recipe::Model {
        recipe::Model {
            id: 7,
            author_id: 1,
            name: "Pancakes".to_string(),
            image: "http://example.com/pancakes.png".to_string(),
            text: "Mix and fry".to_string(),
            cooking_time: 20,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn add_returns_minimal_recipe_representation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipe_row()]])
            .append_query_results([vec![favorite::Model {
                id: 1,
                user_id: 3,
                recipe_id: 7,
                created_at: Utc::now(),
            }]])
            .into_connection();

        let res = RelationService::add::<FavoriteSet>(&db, 3, 7).await.unwrap();
        assert_eq!(res.id, 7);
        assert_eq!(res.name, "Pancakes");
        assert_eq!(res.cooking_time, 20);
    }

    #[tokio::test]
    async fn add_unknown_recipe_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<recipe::Model>::new()])
            .into_connection();

        let err = RelationService::add::<FavoriteSet>(&db, 3, 99).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn adding_the_same_pair_twice_is_a_conflict_with_one_row() {
        let (db, user_id, recipe_id) = seeded_db().await;

        RelationService::add::<FavoriteSet>(&db, user_id, recipe_id)
            .await
            .unwrap();
        let err = RelationService::add::<FavoriteSet>(&db, user_id, recipe_id)
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert!(err.1.contains("is already in favorites"));

        let rows = favorite::Entity::find().count(&db).await.unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn cart_duplicates_are_also_conflicts() {
        let (db, user_id, recipe_id) = seeded_db().await;

        RelationService::add::<ShoppingCartSet>(&db, user_id, recipe_id)
            .await
            .unwrap();
        let err = RelationService::add::<ShoppingCartSet>(&db, user_id, recipe_id)
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert!(err.1.contains("is already in the shopping cart"));

        let rows = shopping_cart_item::Entity::find().count(&db).await.unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn remove_absent_pair_reports_not_present() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipe_row()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = RelationService::remove::<ShoppingCartSet>(&db, 3, 7).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert!(err.1.contains("is not in the shopping cart"));
    }
}
