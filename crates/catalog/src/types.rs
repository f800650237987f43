use serde::Serialize;

/// A bot user, identified by its chat ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub chat_id: i64,
    pub is_verified: bool,
    pub verification_code: Option<String>,
    pub created_at: i64,
}

/// A task category (problemset tag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Task fields shown in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TaskSummary {
    pub number: String,
    pub name: String,
    pub solved_count: i64,
}

/// A task as extracted from a problemset page, ready to upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTask {
    pub number: String,
    pub name: String,
    /// Category names; unknown names are created on upsert.
    pub categories: Vec<String>,
    /// `0` when the page shows no rating.
    pub difficulty: i64,
    /// `0` when the page shows no solved count.
    pub solved_count: i64,
}

/// Row counts, for the `db stats` command and refresh logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub tasks: i64,
    pub categories: i64,
    pub users: i64,
}
