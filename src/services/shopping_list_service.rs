use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Query as SeaQuery};
use sea_orm::*;

use crate::entities::{
    ingredient, recipe,
    recipe::Entity as Recipe,
    recipe_ingredient::{self, Entity as RecipeIngredient},
    shopping_cart_item, user,
};

/// One consolidated purchase line: a distinct (name, unit) pair with the
/// summed amount across every cart recipe referencing it.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ShoppingListRow {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

pub struct CartRecipe {
    pub name: String,
    pub author: String,
}

// Plain-text page height; a form feed starts the next page and the header is
// not repeated mid-list.
const PAGE_LINES: usize = 40;

pub struct ShoppingListService;

impl ShoppingListService {
    /// Collapses the user's cart into one summed row per distinct ingredient,
    /// ordered by name then unit so repeated exports are byte-identical.
    pub async fn aggregate(
        db: &DatabaseConnection,
        user_id: i64,
    ) -> Result<Vec<ShoppingListRow>, DbErr> {
        RecipeIngredient::find()
            .select_only()
            .column_as(ingredient::Column::Name, "name")
            .column_as(ingredient::Column::MeasurementUnit, "measurement_unit")
            .column_as(recipe_ingredient::Column::Amount.sum(), "total_amount")
            .join(JoinType::InnerJoin, recipe_ingredient::Relation::Ingredient.def())
            .join(JoinType::InnerJoin, recipe_ingredient::Relation::Recipe.def())
            .join(JoinType::InnerJoin, recipe::Relation::ShoppingCartItem.def())
            .filter(shopping_cart_item::Column::UserId.eq(user_id))
            .group_by(ingredient::Column::Name)
            .group_by(ingredient::Column::MeasurementUnit)
            .order_by_asc(ingredient::Column::Name)
            .order_by_asc(ingredient::Column::MeasurementUnit)
            .into_model::<ShoppingListRow>()
            .all(db)
            .await
    }

    /// Produces the downloadable document, or the explicit empty-cart signal.
    pub async fn build_document(
        db: &DatabaseConnection,
        user_id: i64,
    ) -> Result<String, (StatusCode, String)> {
        let rows = Self::aggregate(db, user_id).await.map_err(|e| {
            tracing::error!("shopping list aggregation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;

        if rows.is_empty() {
            return Err((StatusCode::BAD_REQUEST, "Shopping cart is empty".to_string()));
        }

        let recipes = Recipe::find()
            .filter(
                recipe::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(shopping_cart_item::Column::RecipeId)
                        .from(shopping_cart_item::Entity)
                        .and_where(Expr::col(shopping_cart_item::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            )
            .find_also_related(user::Entity)
            .order_by_asc(recipe::Column::Name)
            .all(db)
            .await
            .map_err(|e| {
                tracing::error!("cart recipe listing failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?;

        let cart_recipes: Vec<CartRecipe> = recipes
            .into_iter()
            .map(|(r, author)| CartRecipe {
                name: r.name,
                author: author.map(|a| a.full_name()).unwrap_or_else(|| "unknown".to_string()),
            })
            .collect();

        let date = Utc::now().format("%d.%m.%Y").to_string();
        Ok(render_shopping_list(&rows, &cart_recipes, &date))
    }
}

/// Pure renderer: fixed inputs give byte-identical output.
pub fn render_shopping_list(rows: &[ShoppingListRow], recipes: &[CartRecipe], date: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("Shopping list from {}", date));
    lines.push(String::new());
    lines.push("Products:".to_string());

    for (i, row) in rows.iter().enumerate() {
        lines.push(format!(
            "{}. {} ({}) — {}",
            i + 1,
            capitalize_first(&row.name),
            row.measurement_unit,
            row.total_amount
        ));
    }

    lines.push(String::new());
    lines.push("Recipes:".to_string());
    for recipe in recipes {
        lines.push(format!("• {} (author: {})", recipe.name, recipe.author));
    }

    paginate_lines(&lines)
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn paginate_lines(lines: &[String]) -> String {
    lines
        .chunks(PAGE_LINES)
        .map(|page| page.join("\n"))
        .collect::<Vec<_>>()
        .join("\u{000C}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    fn row(name: &str, unit: &str, total: i64) -> ShoppingListRow {
        ShoppingListRow {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            total_amount: total,
        }
    }

    #[test]
    fn renders_summed_rows_in_given_order() {
        // Cart: Recipe A (flour:100g, egg:2) + Recipe B (flour:50g, milk:200ml)
        let rows = vec![row("egg", "шт", 2), row("flour", "g", 150), row("milk", "ml", 200)];
        let recipes = vec![
            CartRecipe { name: "Recipe A".to_string(), author: "Ivan Ivanov".to_string() },
            CartRecipe { name: "Recipe B".to_string(), author: "Ivan Ivanov".to_string() },
        ];

        let doc = render_shopping_list(&rows, &recipes, "23.08.2026");

        assert!(doc.starts_with("Shopping list from 23.08.2026"));
        let egg = doc.find("1. Egg (шт) — 2").unwrap();
        let flour = doc.find("2. Flour (g) — 150").unwrap();
        let milk = doc.find("3. Milk (ml) — 200").unwrap();
        assert!(egg < flour && flour < milk);
        assert!(doc.contains("• Recipe A (author: Ivan Ivanov)"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let rows = vec![row("flour", "g", 150), row("milk", "ml", 200)];
        let recipes = vec![CartRecipe { name: "Recipe B".to_string(), author: "bob".to_string() }];

        let first = render_shopping_list(&rows, &recipes, "01.01.2026");
        let second = render_shopping_list(&rows, &recipes, "01.01.2026");
        assert_eq!(first, second);
    }

    #[test]
    fn long_lists_break_into_pages_without_repeating_the_header() {
        let rows: Vec<ShoppingListRow> =
            (0..100).map(|i| row(&format!("item{:03}", i), "g", i + 1)).collect();
        let doc = render_shopping_list(&rows, &[], "01.01.2026");

        let pages: Vec<&str> = doc.split('\u{000C}').collect();
        assert!(pages.len() > 1);
        assert_eq!(doc.matches("Shopping list from").count(), 1);
        // every page stays within the page height
        for page in &pages {
            assert!(page.trim_start_matches('\n').lines().count() <= super::PAGE_LINES);
        }
    }

    #[test]
    fn names_are_capitalized() {
        assert_eq!(capitalize_first("flour"), "Flour");
        assert_eq!(capitalize_first("мука"), "Мука");
        assert_eq!(capitalize_first(""), "");
    }

    #[tokio::test]
    async fn empty_cart_yields_the_empty_signal_not_a_document() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();

        let err = ShoppingListService::build_document(&db, 1).await.unwrap_err();
        assert_eq!(err.0, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.1, "Shopping cart is empty");
    }

    #[tokio::test]
    async fn aggregate_maps_summed_rows() {
        let mock_row: BTreeMap<&str, Value> = BTreeMap::from([
            ("name", Value::from("flour")),
            ("measurement_unit", Value::from("g")),
            ("total_amount", Value::from(150i64)),
        ]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![mock_row]])
            .into_connection();

        let rows = ShoppingListService::aggregate(&db, 1).await.unwrap();
        assert_eq!(rows, vec![row("flour", "g", 150)]);
    }
}
