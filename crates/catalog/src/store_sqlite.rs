//! SQLite-backed catalog and user directory using sqlx.

use std::{
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use {
    async_trait::async_trait,
    sqlx::{
        SqlitePool,
        sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    },
    tracing::debug,
};

use crate::{
    Error, Result,
    code::{generate_verification_code, normalize_code},
    store::{CatalogStore, UserDirectory},
    types::{CatalogStats, Category, ParsedTask, TaskSummary, User},
};

/// SQLite-backed persistence for tasks, categories and users.
pub struct SqliteCatalog {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    chat_id: i64,
    is_verified: bool,
    verification_code: Option<String>,
    created_at: i64,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            chat_id: r.chat_id,
            is_verified: r.is_verified,
            verification_code: r.verification_code,
            created_at: r.created_at,
        }
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

impl SqliteCatalog {
    /// Connect, creating the database file if needed, and run migrations.
    ///
    /// In-memory URLs get a single long-lived connection, since every SQLite
    /// connection would otherwise open its own empty database.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };
        let pool = pool_options.connect_with(options).await?;

        crate::run_migrations(&pool).await?;
        debug!(database_url, "catalog database ready");

        Ok(Self { pool })
    }

    /// Create a store using an existing pool (migrations must already be run).
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn list_distinct_difficulties(&self) -> Result<Vec<i64>> {
        let rows = sqlx::query_scalar::<_, i64>(
            "SELECT DISTINCT difficulty FROM tasks ORDER BY difficulty",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_tasks(
        &self,
        category_id: i64,
        difficulty: i64,
        limit: u32,
    ) -> Result<Vec<TaskSummary>> {
        let rows = sqlx::query_as::<_, TaskSummary>(
            r#"SELECT t.number, t.name, t.solved_count
               FROM tasks t
               JOIN task_categories tc ON tc.task_id = t.id
               WHERE tc.category_id = ?
                 AND t.difficulty = ?
                 AND (SELECT COUNT(*) FROM task_categories x WHERE x.task_id = t.id) = 1
               ORDER BY t.solved_count DESC, t.number
               LIMIT ?"#,
        )
        .bind(category_id)
        .bind(difficulty)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn upsert_task(&self, task: &ParsedTask) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let mut category_ids = Vec::with_capacity(task.categories.len());
        for name in &task.categories {
            sqlx::query("INSERT INTO categories (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
                .bind(name)
                .execute(&mut *tx)
                .await?;
            let id = sqlx::query_scalar::<_, i64>("SELECT id FROM categories WHERE name = ?")
                .bind(name)
                .fetch_one(&mut *tx)
                .await?;
            category_ids.push(id);
        }

        let task_id = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO tasks (number, name, difficulty, solved_count, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(number) DO UPDATE SET
                 name = excluded.name,
                 difficulty = excluded.difficulty,
                 solved_count = excluded.solved_count,
                 updated_at = excluded.updated_at
               RETURNING id"#,
        )
        .bind(&task.number)
        .bind(&task.name)
        .bind(task.difficulty)
        .bind(task.solved_count)
        .bind(now_secs())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM task_categories WHERE task_id = ?")
            .bind(task_id)
            .execute(&mut *tx)
            .await?;
        for category_id in category_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO task_categories (task_id, category_id) VALUES (?, ?)",
            )
            .bind(task_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn stats(&self) -> Result<CatalogStats> {
        let tasks = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;
        let categories = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        let users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(CatalogStats {
            tasks,
            categories,
            users,
        })
    }
}

#[async_trait]
impl UserDirectory for SqliteCatalog {
    async fn get_or_create(&self, chat_id: i64) -> Result<User> {
        sqlx::query(
            "INSERT INTO users (chat_id, is_verified, created_at) VALUES (?, 0, ?)
             ON CONFLICT(chat_id) DO NOTHING",
        )
        .bind(chat_id)
        .bind(now_secs())
        .execute(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, UserRow>(
            "SELECT chat_id, is_verified, verification_code, created_at FROM users WHERE chat_id = ?",
        )
        .bind(chat_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn regenerate_verification_code(&self, chat_id: i64) -> Result<String> {
        let code = generate_verification_code();
        let result = sqlx::query("UPDATE users SET verification_code = ? WHERE chat_id = ?")
            .bind(&code)
            .bind(chat_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::user_not_found(chat_id));
        }
        Ok(code)
    }

    async fn verify_by_code(&self, code: &str) -> Result<Option<User>> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;
        let chat_id = sqlx::query_scalar::<_, i64>(
            "SELECT chat_id FROM users WHERE verification_code = ? AND is_verified = 0 LIMIT 1",
        )
        .bind(&code)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(chat_id) = chat_id else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET is_verified = 1, verification_code = NULL WHERE chat_id = ?
             RETURNING chat_id, is_verified, verification_code, created_at",
        )
        .bind(chat_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT chat_id, is_verified, verification_code, created_at FROM users ORDER BY created_at, chat_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
