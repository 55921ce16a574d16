pub mod auth_handler;
pub mod ingredient_handler;
pub mod recipe_handler;
pub mod short_link_handler;
pub mod user_handler;
