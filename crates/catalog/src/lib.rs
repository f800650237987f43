//! Task catalog and user directory.
//!
//! Tasks and categories scraped from the problemset, and the bot users with
//! their verification state. SQLite-backed via sqlx, with an in-memory
//! implementation for tests.

pub mod code;
pub mod error;
pub mod store;
pub mod store_memory;
pub mod store_sqlite;
pub mod types;

pub use {
    error::{Error, Result},
    store::{CatalogStore, UserDirectory},
    store_memory::InMemoryCatalog,
    store_sqlite::SqliteCatalog,
    types::{CatalogStats, Category, ParsedTask, TaskSummary, User},
};

/// Run database migrations for the catalog.
///
/// Creates the `users`, `categories`, `tasks` and `task_categories` tables.
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
