use axum::http::StatusCode;
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use sea_orm::*;

use crate::entities::{
    recipe::Entity as Recipe,
    short_link::{self, Entity as ShortLink},
};
use crate::utils::db_utils::is_unique_violation;

pub const SLUG_LENGTH: usize = 8;

// The token space makes a collision astronomically unlikely; the bound exists
// so a persistent storage problem surfaces instead of spinning.
const MAX_MINT_ATTEMPTS: usize = 5;

pub struct ShortLinkService;

impl ShortLinkService {
    /// Returns the recipe's shareable short URL, minting the slug on the first
    /// request. Subsequent requests return the same slug (stability contract
    /// for shared links).
    pub async fn get_or_create(
        db: &DatabaseConnection,
        recipe_id: i64,
        base_url: &str,
    ) -> Result<String, (StatusCode, String)> {
        Recipe::find_by_id(recipe_id)
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("recipe lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?
            .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;

        if let Some(existing) = Self::find_by_recipe(db, recipe_id).await? {
            return Ok(Self::short_url(base_url, &existing.slug));
        }

        for _ in 0..MAX_MINT_ATTEMPTS {
            let slug = Self::generate_slug();
            let attempt = short_link::ActiveModel {
                id: NotSet,
                recipe_id: Set(recipe_id),
                slug: Set(slug),
                created_at: Set(Utc::now()),
            }
            .insert(db)
            .await;

            match attempt {
                Ok(saved) => return Ok(Self::short_url(base_url, &saved.slug)),
                Err(e) if is_unique_violation(&e) => {
                    // Either a concurrent request minted this recipe's link
                    // first, or the random slug collided. Re-check against
                    // current storage state before retrying.
                    if let Some(existing) = Self::find_by_recipe(db, recipe_id).await? {
                        return Ok(Self::short_url(base_url, &existing.slug));
                    }
                }
                Err(e) => {
                    tracing::error!("short link insert failed: {}", e);
                    return Err((StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()));
                }
            }
        }

        Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Could not allocate a short link slug".to_string(),
        ))
    }

    /// Resolves a slug back to the owning recipe's id. The canonical location
    /// is constructed from the id by the caller, never stored denormalized.
    pub async fn resolve(db: &DatabaseConnection, slug: &str) -> Result<i64, (StatusCode, String)> {
        let link = ShortLink::find()
            .filter(short_link::Column::Slug.eq(slug))
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("short link lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?
            .ok_or((StatusCode::NOT_FOUND, "Short link not found".to_string()))?;

        Ok(link.recipe_id)
    }

    async fn find_by_recipe(
        db: &DatabaseConnection,
        recipe_id: i64,
    ) -> Result<Option<short_link::Model>, (StatusCode, String)> {
        ShortLink::find()
            .filter(short_link::Column::RecipeId.eq(recipe_id))
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("short link lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })
    }

    pub fn generate_slug() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SLUG_LENGTH)
            .map(char::from)
            .collect()
    }

    fn short_url(base_url: &str, slug: &str) -> String {
        format!("{}/s/{}", base_url.trim_end_matches('/'), slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::recipe;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn recipe_row() -> recipe::Model {
        recipe::Model {
            id: 42,
            author_id: 1,
            name: "Borscht".to_string(),
            image: "http://example.com/borscht.png".to_string(),
            text: "Simmer".to_string(),
            cooking_time: 90,
            created_at: Utc::now(),
        }
    }

    fn link_row(slug: &str) -> short_link::Model {
        short_link::Model {
            id: 1,
            recipe_id: 42,
            slug: slug.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn slug_is_fixed_length_alphanumeric() {
        let slug = ShortLinkService::generate_slug();
        assert_eq!(slug.len(), SLUG_LENGTH);
        assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn existing_link_is_returned_without_minting() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipe_row()]])
            .append_query_results([vec![link_row("Ab3dE6gH")]])
            .into_connection();

        let url = ShortLinkService::get_or_create(&db, 42, "http://localhost:3000")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:3000/s/Ab3dE6gH");
    }

    #[tokio::test]
    async fn first_request_mints_a_link() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipe_row()]])
            .append_query_results([Vec::<short_link::Model>::new()])
            .append_query_results([vec![link_row("Zz9Yx8Ww")]])
            .into_connection();

        let url = ShortLinkService::get_or_create(&db, 42, "http://localhost:3000")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:3000/s/Zz9Yx8Ww");
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<short_link::Model>::new()])
            .into_connection();

        let err = ShortLinkService::resolve(&db, "nope1234").await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn resolve_returns_owning_recipe() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![link_row("Ab3dE6gH")]])
            .into_connection();

        let recipe_id = ShortLinkService::resolve(&db, "Ab3dE6gH").await.unwrap();
        assert_eq!(recipe_id, 42);
    }
}
