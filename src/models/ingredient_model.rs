use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Deserialize)]
pub struct IngredientFilterParams {
    // Case-insensitive starts-with filter
    pub name: Option<String>,
}

// One record of the offline bulk-import file (JSON array or headerless CSV)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IngredientRecord {
    pub name: String,
    pub measurement_unit: String,
}
