use std::collections::HashSet;

use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Query as SeaQuery};
use sea_orm::*;

use crate::entities::{
    favorite, ingredient,
    ingredient::Entity as Ingredient,
    recipe::{self, Entity as Recipe},
    recipe_ingredient::{self, Entity as RecipeIngredient},
    shopping_cart_item, subscription, user,
};
use crate::models::recipe_model::*;
use crate::models::user_model::UserResponse;
use crate::services::relation_service::{FavoriteSet, ShoppingCartSet, UserRecipeSet};

const DEFAULT_PAGE_SIZE: u64 = 6;
const MAX_PAGE_SIZE: u64 = 100;

pub struct RecipeService;

impl RecipeService {
    pub async fn create_recipe(
        db: &DatabaseConnection,
        author_id: i64,
        payload: RecipeWriteRequest,
    ) -> Result<RecipeResponse, (StatusCode, String)> {
        Self::check_ingredients(db, &payload.ingredients).await?;

        let txn = db.begin().await.map_err(|e| {
            tracing::error!("transaction start failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;

        let saved = recipe::ActiveModel {
            id: NotSet,
            author_id: Set(author_id),
            name: Set(payload.name),
            image: Set(payload.image),
            text: Set(payload.text),
            cooking_time: Set(payload.cooking_time),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            tracing::error!("failed to create recipe: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create recipe".to_string())
        })?;

        Self::insert_associations(&txn, saved.id, &payload.ingredients).await?;

        txn.commit().await.map_err(|e| {
            tracing::error!("transaction commit failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;

        Self::get_recipe(db, saved.id, Some(author_id)).await
    }

    pub async fn get_recipe(
        db: &DatabaseConnection,
        recipe_id: i64,
        viewer: Option<i64>,
    ) -> Result<RecipeResponse, (StatusCode, String)> {
        let (recipe, author_opt) = Recipe::find_by_id(recipe_id)
            .find_also_related(user::Entity)
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("recipe lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?
            .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;

        let author = author_opt.ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Recipe has no author".to_string(),
        ))?;

        Self::map_to_response(db, recipe, author, viewer).await
    }

    pub async fn list_recipes(
        db: &DatabaseConnection,
        params: RecipeFilterParams,
        viewer: Option<i64>,
    ) -> Result<RecipeListResponse, (StatusCode, String)> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let mut query = Recipe::find();

        if let Some(author_id) = params.author {
            query = query.filter(recipe::Column::AuthorId.eq(author_id));
        }

        // Flag filters only apply for an authenticated viewer
        if let (Some(true), Some(user_id)) = (params.is_favorited, viewer) {
            query = query.filter(
                recipe::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(favorite::Column::RecipeId)
                        .from(favorite::Entity)
                        .and_where(Expr::col(favorite::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            );
        }

        if let (Some(true), Some(user_id)) = (params.is_in_shopping_cart, viewer) {
            query = query.filter(
                recipe::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(shopping_cart_item::Column::RecipeId)
                        .from(shopping_cart_item::Entity)
                        .and_where(Expr::col(shopping_cart_item::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            );
        }

        // Newest first
        query = query
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id);

        let paginator = query.find_also_related(user::Entity).paginate(db, limit);
        let total = paginator.num_items().await.map_err(|e| {
            tracing::error!("recipe count failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;
        let pairs = paginator.fetch_page(page - 1).await.map_err(|e| {
            tracing::error!("recipe page fetch failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;

        let mut data = Vec::with_capacity(pairs.len());
        for (recipe, author_opt) in pairs {
            let author = author_opt.ok_or((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Recipe has no author".to_string(),
            ))?;
            data.push(Self::map_to_response(db, recipe, author, viewer).await?);
        }

        Ok(RecipeListResponse {
            data,
            meta: PaginationMeta { total, page, limit },
        })
    }

    pub async fn update_recipe(
        db: &DatabaseConnection,
        recipe_id: i64,
        user_id: i64,
        payload: RecipeWriteRequest,
    ) -> Result<RecipeResponse, (StatusCode, String)> {
        let recipe = Recipe::find_by_id(recipe_id)
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("recipe lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?
            .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;

        if recipe.author_id != user_id {
            return Err((
                StatusCode::FORBIDDEN,
                "You are not the author of this recipe".to_string(),
            ));
        }

        Self::check_ingredients(db, &payload.ingredients).await?;

        // Replace-all inside one transaction: partial failure leaves the prior
        // association set intact.
        let txn = db.begin().await.map_err(|e| {
            tracing::error!("transaction start failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;

        let mut active: recipe::ActiveModel = recipe.into();
        active.name = Set(payload.name);
        active.image = Set(payload.image);
        active.text = Set(payload.text);
        active.cooking_time = Set(payload.cooking_time);
        active.update(&txn).await.map_err(|e| {
            tracing::error!("failed to update recipe: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update recipe".to_string())
        })?;

        RecipeIngredient::delete_many()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                tracing::error!("failed to clear recipe ingredients: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update recipe".to_string())
            })?;

        Self::insert_associations(&txn, recipe_id, &payload.ingredients).await?;

        txn.commit().await.map_err(|e| {
            tracing::error!("transaction commit failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;

        Self::get_recipe(db, recipe_id, Some(user_id)).await
    }

    pub async fn delete_recipe(
        db: &DatabaseConnection,
        recipe_id: i64,
        user_id: i64,
    ) -> Result<(), (StatusCode, String)> {
        let recipe = Recipe::find_by_id(recipe_id)
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("recipe lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?
            .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;

        if recipe.author_id != user_id {
            return Err((
                StatusCode::FORBIDDEN,
                "You are not the author of this recipe".to_string(),
            ));
        }

        // Associations, favorites, cart rows and the short link cascade
        Recipe::delete_by_id(recipe_id).exec(db).await.map_err(|e| {
            tracing::error!("failed to delete recipe: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete recipe".to_string())
        })?;

        Ok(())
    }

    async fn check_ingredients(
        db: &DatabaseConnection,
        items: &[IngredientAmountRequest],
    ) -> Result<(), (StatusCode, String)> {
        if has_duplicate_ingredient_ids(items) {
            return Err((
                StatusCode::BAD_REQUEST,
                "Ingredients must not repeat".to_string(),
            ));
        }

        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        let found = Ingredient::find()
            .filter(ingredient::Column::Id.is_in(ids.clone()))
            .count(db)
            .await
            .map_err(|e| {
                tracing::error!("ingredient lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?;

        if found != ids.len() as u64 {
            return Err((
                StatusCode::BAD_REQUEST,
                "One or more ingredients do not exist".to_string(),
            ));
        }

        Ok(())
    }

    async fn insert_associations(
        txn: &DatabaseTransaction,
        recipe_id: i64,
        items: &[IngredientAmountRequest],
    ) -> Result<(), (StatusCode, String)> {
        let rows: Vec<recipe_ingredient::ActiveModel> = items
            .iter()
            .map(|item| recipe_ingredient::ActiveModel {
                id: NotSet,
                recipe_id: Set(recipe_id),
                ingredient_id: Set(item.id),
                amount: Set(item.amount),
            })
            .collect();

        RecipeIngredient::insert_many(rows).exec(txn).await.map_err(|e| {
            tracing::error!("failed to insert recipe ingredients: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save recipe ingredients".to_string())
        })?;

        Ok(())
    }

    pub(crate) async fn map_to_response(
        db: &DatabaseConnection,
        recipe: recipe::Model,
        author: user::Model,
        viewer: Option<i64>,
    ) -> Result<RecipeResponse, (StatusCode, String)> {
        let ingredient_rows = RecipeIngredient::find()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe.id))
            .find_also_related(Ingredient)
            .order_by_asc(recipe_ingredient::Column::Id)
            .all(db)
            .await
            .map_err(|e| {
                tracing::error!("recipe ingredient fetch failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?;

        let ingredients = ingredient_rows
            .into_iter()
            .filter_map(|(link, ing)| {
                ing.map(|ing| RecipeIngredientResponse {
                    id: ing.id,
                    name: ing.name,
                    measurement_unit: ing.measurement_unit,
                    amount: link.amount,
                })
            })
            .collect();

        let (is_favorited, is_in_shopping_cart, is_subscribed) = match viewer {
            Some(user_id) => {
                let fav = FavoriteSet::exists(db, user_id, recipe.id).await.map_err(|e| {
                    tracing::error!("favorite check failed: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
                })?;
                let cart = ShoppingCartSet::exists(db, user_id, recipe.id).await.map_err(|e| {
                    tracing::error!("cart check failed: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
                })?;
                let sub = subscription::Entity::find()
                    .filter(subscription::Column::UserId.eq(user_id))
                    .filter(subscription::Column::AuthorId.eq(author.id))
                    .count(db)
                    .await
                    .map_err(|e| {
                        tracing::error!("subscription check failed: {}", e);
                        (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
                    })?
                    > 0;
                (fav, cart, sub)
            }
            None => (false, false, false),
        };

        Ok(RecipeResponse {
            id: recipe.id,
            author: UserResponse {
                email: author.email,
                id: author.id,
                username: author.username,
                first_name: author.first_name,
                last_name: author.last_name,
                is_subscribed,
            },
            ingredients,
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        })
    }
}

pub fn has_duplicate_ingredient_ids(items: &[IngredientAmountRequest]) -> bool {
    let mut seen = HashSet::new();
    items.iter().any(|item| !seen.insert(item.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn item(id: i64, amount: i32) -> IngredientAmountRequest {
        IngredientAmountRequest { id, amount }
    }

    #[test]
    fn duplicate_ingredient_ids_are_detected() {
        assert!(!has_duplicate_ingredient_ids(&[item(1, 10), item(2, 20)]));
        assert!(has_duplicate_ingredient_ids(&[item(1, 10), item(1, 20)]));
        assert!(!has_duplicate_ingredient_ids(&[]));
    }

    #[tokio::test]
    async fn deleting_someone_elses_recipe_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipe::Model {
                id: 5,
                author_id: 1,
                name: "Soup".to_string(),
                image: "http://example.com/soup.png".to_string(),
                text: "Boil".to_string(),
                cooking_time: 30,
                created_at: Utc::now(),
            }]])
            .into_connection();

        let err = RecipeService::delete_recipe(&db, 5, 2).await.unwrap_err();
        assert_eq!(err.0, StatusCode::FORBIDDEN);
    }
}
