//! Integration tests for the maintenance rotation engine
//!
//! Each test runs against a fresh single-connection in-memory SQLite
//! database with the full schema applied.

mod http;
mod rotation;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use millwright::db;

pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    db::run_migrations(&pool).await.unwrap();
    pool
}

pub async fn add_plant(pool: &SqlitePool, owner: &str, name: &str, order: i64) -> i64 {
    db::insert_plant(
        pool,
        owner,
        name,
        "1 Test Street",
        -8.0476,
        -34.877,
        order,
        chrono::Utc::now(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_init_database_creates_file_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("data.db");

    let pool = db::init_database(db_path.to_str().unwrap()).await.unwrap();
    assert!(db_path.exists());

    // Second run is a no-op thanks to IF NOT EXISTS
    db::run_migrations(&pool).await.unwrap();
    let plants = db::list_plants(&pool, "owner").await.unwrap();
    assert!(plants.is_empty());
}
