//! Offline ingredient catalog loader.
//!
//! Usage: `import-ingredients <path/to/ingredients.{json,csv}>`
//!
//! Reads the whole file, skips records already present in the catalog and
//! inserts the rest in a single transaction. Any failure aborts with a
//! non-zero exit code and the catalog is left untouched.

use std::path::Path;
use std::process::exit;

use dotenvy::dotenv;
use foodgram_backend::config::Config;
use foodgram_backend::services::ingredient_service::{
    records_from_csv, records_from_json, IngredientService,
};
use sea_orm::Database;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: import-ingredients <path/to/ingredients.{{json,csv}}>");
            exit(1);
        }
    };

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("❌ Could not read {}: {}", path, e);
            exit(1);
        }
    };

    let extension = Path::new(&path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    let records = match extension.as_deref() {
        Some("json") => match records_from_json(&content) {
            Ok(records) => records,
            Err(e) => {
                eprintln!("❌ Invalid JSON in {}: {}", path, e);
                exit(1);
            }
        },
        Some("csv") => match records_from_csv(&content) {
            Ok(records) => records,
            Err(e) => {
                eprintln!("❌ Invalid CSV in {}: {}", path, e);
                exit(1);
            }
        },
        _ => {
            eprintln!("❌ Unsupported file format (expected .json or .csv): {}", path);
            exit(1);
        }
    };

    println!("📄 Parsed {} records from {}", records.len(), path);

    let cfg = Config::init();
    let db = match Database::connect(&cfg.database_url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to connect to Database: {}", e);
            exit(1);
        }
    };

    match IngredientService::import_records(&db, records).await {
        Ok(created) => println!("✅ Import complete: {} new ingredients", created),
        Err(e) => {
            eprintln!("❌ Import failed, nothing was written: {}", e);
            exit(1);
        }
    }
}
