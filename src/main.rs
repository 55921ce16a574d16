use dotenvy::dotenv;
use foodgram_backend::config::{AppState, Config};
use foodgram_backend::routes;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt::init();

    let cfg = Config::init();
    println!("🚀 Starting Foodgram Backend...");

    // 1. Database Connection
    println!("📡 Connecting to Database...");
    let db = Database::connect(&cfg.database_url)
        .await
        .expect("🔥 Failed to connect to Database!");
    println!("✅ Database Connected!");

    // 2. Schema Migrations
    println!("🗄️  Running Migrations...");
    Migrator::up(&db, None)
        .await
        .expect("🔥 Failed to run migrations!");
    println!("✅ Migrations Applied!");

    // 3. Build App State
    let state = AppState { db: Arc::new(db) };

    // 4. Initialize Router
    let app = routes::create_routes(state.clone()).with_state(state);

    // 5. Start Server
    let addr_str = format!("{}:{}", cfg.server_host, cfg.server_port);
    let addr: SocketAddr = addr_str.parse().expect("Invalid address");

    println!("🎯 Server ready! Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
