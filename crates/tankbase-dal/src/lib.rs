pub mod error;
pub mod tank;

pub use error::Error;
pub use sqlx::Error as SqlxError;
use sqlx::sqlite::SqlitePoolOptions;

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type Pool = sqlx::Pool<ChosenDB>;

pub async fn new_pool(database_url: &str) -> Result<Pool, Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Idempotent schema bootstrap, executed once on startup.
pub async fn ensure_schema(pool: &Pool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tanks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            nation TEXT NOT NULL,
            class TEXT NOT NULL,
            year INTEGER,
            description TEXT
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}
