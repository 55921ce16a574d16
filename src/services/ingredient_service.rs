use std::collections::HashSet;

use axum::http::StatusCode;
use sea_orm::sea_query::{Expr, Func, LikeExpr, OnConflict};
use sea_orm::*;

use crate::entities::ingredient::{self, Entity as Ingredient};
use crate::models::ingredient_model::{IngredientRecord, IngredientResponse};

pub struct IngredientService;

impl IngredientService {
    /// Catalog listing with an optional case-insensitive starts-with filter,
    /// always sorted by name. Not paginated (the catalog is small and the
    /// frontend autocomplete needs it whole).
    pub async fn list_ingredients(
        db: &DatabaseConnection,
        name_prefix: Option<String>,
    ) -> Result<Vec<IngredientResponse>, (StatusCode, String)> {
        let mut query = Ingredient::find();

        if let Some(prefix) = name_prefix {
            // Explicit ESCAPE so the wildcard escaping holds on every backend
            let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((
                    ingredient::Entity,
                    ingredient::Column::Name,
                ))))
                .like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        let rows = query
            .order_by_asc(ingredient::Column::Name)
            .order_by_asc(ingredient::Column::MeasurementUnit)
            .all(db)
            .await
            .map_err(|e| {
                tracing::error!("ingredient listing failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?;

        Ok(rows.into_iter().map(Self::map_to_response).collect())
    }

    pub async fn get_ingredient(
        db: &DatabaseConnection,
        id: i64,
    ) -> Result<IngredientResponse, (StatusCode, String)> {
        let row = Ingredient::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("ingredient lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?
            .ok_or((StatusCode::NOT_FOUND, "Ingredient not found".to_string()))?;

        Ok(Self::map_to_response(row))
    }

    /// Bulk import used by the offline tool: skips records already present by
    /// normalized (name, unit) identity, inserts the rest in one transaction,
    /// returns the created count. All-or-nothing.
    pub async fn import_records(
        db: &DatabaseConnection,
        records: Vec<IngredientRecord>,
    ) -> Result<u64, DbErr> {
        let existing: HashSet<(String, String)> = Ingredient::find()
            .all(db)
            .await?
            .into_iter()
            .map(|m| normalized_key(&m.name, &m.measurement_unit))
            .collect();

        let fresh = dedup_new_records(&existing, records);
        if fresh.is_empty() {
            return Ok(0);
        }

        let rows: Vec<ingredient::ActiveModel> = fresh
            .into_iter()
            .map(|r| ingredient::ActiveModel {
                id: NotSet,
                name: Set(r.name.trim().to_string()),
                measurement_unit: Set(r.measurement_unit.trim().to_string()),
            })
            .collect();

        let txn = db.begin().await?;
        // The unique index stays authoritative under concurrent imports
        let created = Ingredient::insert_many(rows)
            .on_conflict(
                OnConflict::columns([ingredient::Column::Name, ingredient::Column::MeasurementUnit])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;

        Ok(created)
    }

    fn map_to_response(model: ingredient::Model) -> IngredientResponse {
        IngredientResponse {
            id: model.id,
            name: model.name,
            measurement_unit: model.measurement_unit,
        }
    }
}

/// Neutralizes LIKE metacharacters in user input; pairs with `ESCAPE '\'` on
/// the query.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub fn normalized_key(name: &str, unit: &str) -> (String, String) {
    (name.trim().to_lowercase(), unit.trim().to_lowercase())
}

/// Keeps records absent from `existing`, also collapsing duplicates within
/// the input file itself.
pub fn dedup_new_records(
    existing: &HashSet<(String, String)>,
    records: Vec<IngredientRecord>,
) -> Vec<IngredientRecord> {
    let mut seen = existing.clone();
    records
        .into_iter()
        .filter(|r| seen.insert(normalized_key(&r.name, &r.measurement_unit)))
        .collect()
}

pub fn records_from_json(content: &str) -> Result<Vec<IngredientRecord>, serde_json::Error> {
    serde_json::from_str(content)
}

/// Headerless CSV, one `name,measurement_unit` pair per line (the format the
/// public ingredient dumps ship in).
pub fn records_from_csv(content: &str) -> Result<Vec<IngredientRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(content.as_bytes());
    reader.deserialize().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, unit: &str) -> IngredientRecord {
        IngredientRecord {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        }
    }

    #[test]
    fn json_records_parse() {
        let content = r#"[
            {"name": "мука", "measurement_unit": "г"},
            {"name": "milk", "measurement_unit": "ml"}
        ]"#;
        let records = records_from_json(content).unwrap();
        assert_eq!(records, vec![record("мука", "г"), record("milk", "ml")]);
    }

    #[test]
    fn csv_records_parse() {
        let content = "мука,г\nmilk,ml\n";
        let records = records_from_csv(content).unwrap();
        assert_eq!(records, vec![record("мука", "г"), record("milk", "ml")]);
    }

    #[test]
    fn like_metacharacters_are_neutralized() {
        assert_eq!(escape_like("mu%ka"), "mu\\%ka");
        assert_eq!(escape_like("mu_ka"), "mu\\_ka");
        assert_eq!(escape_like("mu\\ka"), "mu\\\\ka");
        assert_eq!(escape_like("flour"), "flour");
    }

    #[test]
    fn identity_is_case_and_whitespace_normalized() {
        assert_eq!(normalized_key(" Flour ", "G"), normalized_key("flour", "g"));
        assert_ne!(normalized_key("flour", "g"), normalized_key("flour", "kg"));
    }

    #[test]
    fn import_skips_present_records_and_reports_the_rest() {
        // 500 records, 10 already present -> exactly 490 remain
        let existing: HashSet<(String, String)> =
            (0..10).map(|i| normalized_key(&format!("ingredient{}", i), "g")).collect();
        let records: Vec<IngredientRecord> =
            (0..500).map(|i| record(&format!("ingredient{}", i), "g")).collect();

        let fresh = dedup_new_records(&existing, records);
        assert_eq!(fresh.len(), 490);
        assert!(fresh.iter().all(|r| {
            let (name, _) = normalized_key(&r.name, &r.measurement_unit);
            name.trim_start_matches("ingredient").parse::<u32>().unwrap() >= 10
        }));
    }

    #[test]
    fn duplicates_within_the_file_collapse() {
        let records = vec![record("Flour", "g"), record(" flour ", "G"), record("milk", "ml")];
        let fresh = dedup_new_records(&HashSet::new(), records);
        assert_eq!(fresh.len(), 2);
    }
}
