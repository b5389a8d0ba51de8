use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::debug;

use crate::error::CoreError;

// Re-export the pool for use in other parts of the core crate
pub use sqlx::SqlitePool as DbPool;

const IN_MEMORY: &str = "sqlite::memory:";

/// Establishes a connection pool to the SQLite database and runs migrations.
///
/// # Arguments
///
/// * `db_path` - The path to the SQLite database file, or `sqlite::memory:`
///   for a throwaway in-memory database.
///
/// # Returns
///
/// A `Result` containing the `SqlitePool` or a `CoreError` if the connection fails
/// or migrations cannot be run.
pub async fn establish_connection(db_path: &str) -> Result<SqlitePool, CoreError> {
    let pool = if db_path == IN_MEMORY {
        // Every connection to `:memory:` is its own database, so keep exactly one.
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect(IN_MEMORY)
            .await?
    } else {
        // Create the database file and directory if they don't exist
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        if !Path::new(db_path).exists() {
            tokio::fs::File::create(db_path).await?;
        }

        SqlitePoolOptions::new()
            .max_connections(5)
            .connect(db_path)
            .await?
    };

    sqlx::migrate!("./migrations").run(&pool).await?;
    debug!(db_path, "database ready");

    Ok(pool)
}
