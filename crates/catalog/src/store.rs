//! Persistence traits for the catalog and the user directory.

use async_trait::async_trait;

use crate::{
    Result,
    types::{CatalogStats, Category, ParsedTask, TaskSummary, User},
};

/// Read side used by the conversation, write side used by ingestion.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Distinct task difficulties, ascending.
    async fn list_distinct_difficulties(&self) -> Result<Vec<i64>>;

    /// All categories, by ID.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn get_category(&self, id: i64) -> Result<Option<Category>>;

    /// Tasks with exactly one category, equal to `category_id`, at the given
    /// difficulty. Most solved first, at most `limit` rows.
    async fn find_tasks(
        &self,
        category_id: i64,
        difficulty: i64,
        limit: u32,
    ) -> Result<Vec<TaskSummary>>;

    /// Insert or update a task by number and replace its category links.
    async fn upsert_task(&self, task: &ParsedTask) -> Result<()>;

    async fn stats(&self) -> Result<CatalogStats>;
}

/// Bot users and their verification state.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_or_create(&self, chat_id: i64) -> Result<User>;

    /// Replace the user's verification code with a fresh one and return it.
    async fn regenerate_verification_code(&self, chat_id: i64) -> Result<String>;

    /// Mark the user holding `code` as verified and clear the code.
    ///
    /// Returns `None` when no unverified user holds that code.
    async fn verify_by_code(&self, code: &str) -> Result<Option<User>>;

    async fn list_users(&self) -> Result<Vec<User>>;
}
