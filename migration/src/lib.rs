pub use sea_orm_migration::prelude::*;

mod m20250512_000001_create_users;
mod m20250512_000002_create_recipe_tables;
mod m20250512_000003_create_short_links;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250512_000001_create_users::Migration),
            Box::new(m20250512_000002_create_recipe_tables::Migration),
            Box::new(m20250512_000003_create_short_links::Migration),
        ]
    }
}
