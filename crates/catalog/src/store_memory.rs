//! In-memory catalog for tests.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Mutex,
};

use async_trait::async_trait;

use crate::{
    Error, Result,
    code::{generate_verification_code, normalize_code},
    store::{CatalogStore, UserDirectory},
    types::{CatalogStats, Category, ParsedTask, TaskSummary, User},
};

#[derive(Debug, Clone)]
struct StoredTask {
    name: String,
    difficulty: i64,
    solved_count: i64,
    category_ids: BTreeSet<i64>,
}

#[derive(Default)]
struct Inner {
    categories: BTreeMap<i64, String>,
    tasks: BTreeMap<String, StoredTask>,
    users: HashMap<i64, User>,
    next_user_seq: i64,
}

impl Inner {
    fn category_id(&mut self, name: &str) -> i64 {
        if let Some((id, _)) = self.categories.iter().find(|(_, n)| n.as_str() == name) {
            return *id;
        }
        let id = self.categories.keys().next_back().copied().unwrap_or(0) + 1;
        self.categories.insert(id, name.to_string());
        id
    }
}

/// In-memory store backed by `BTreeMap`s. No persistence.
///
/// Mirrors [`crate::SqliteCatalog`] semantics, including category ID
/// assignment in insertion order and most-solved-first task listings.
#[derive(Default)]
pub struct InMemoryCatalog {
    inner: Mutex<Inner>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from parsed tasks.
    pub fn with_tasks(tasks: impl IntoIterator<Item = ParsedTask>) -> Self {
        let catalog = Self::new();
        {
            let mut inner = catalog.lock();
            for task in tasks {
                insert_task(&mut inner, &task);
            }
        }
        catalog
    }

    /// Register a category without any task, returning its ID.
    pub fn add_category(&self, name: &str) -> i64 {
        self.lock().category_id(name)
    }

    /// Insert a user that is already verified.
    pub fn add_verified_user(&self, chat_id: i64) {
        let mut inner = self.lock();
        inner.next_user_seq += 1;
        let created_at = inner.next_user_seq;
        inner.users.insert(chat_id, User {
            chat_id,
            is_verified: true,
            verification_code: None,
            created_at,
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn insert_task(inner: &mut Inner, task: &ParsedTask) {
    let category_ids = task
        .categories
        .iter()
        .map(|name| inner.category_id(name))
        .collect();
    inner.tasks.insert(task.number.clone(), StoredTask {
        name: task.name.clone(),
        difficulty: task.difficulty,
        solved_count: task.solved_count,
        category_ids,
    });
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list_distinct_difficulties(&self) -> Result<Vec<i64>> {
        let inner = self.lock();
        let set: BTreeSet<i64> = inner.tasks.values().map(|t| t.difficulty).collect();
        Ok(set.into_iter().collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let inner = self.lock();
        Ok(inner
            .categories
            .iter()
            .map(|(id, name)| Category {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let inner = self.lock();
        Ok(inner.categories.get(&id).map(|name| Category {
            id,
            name: name.clone(),
        }))
    }

    async fn find_tasks(
        &self,
        category_id: i64,
        difficulty: i64,
        limit: u32,
    ) -> Result<Vec<TaskSummary>> {
        let inner = self.lock();
        let mut found: Vec<TaskSummary> = inner
            .tasks
            .iter()
            .filter(|(_, t)| {
                t.difficulty == difficulty
                    && t.category_ids.len() == 1
                    && t.category_ids.contains(&category_id)
            })
            .map(|(number, t)| TaskSummary {
                number: number.clone(),
                name: t.name.clone(),
                solved_count: t.solved_count,
            })
            .collect();
        found.sort_by(|a, b| {
            b.solved_count
                .cmp(&a.solved_count)
                .then_with(|| a.number.cmp(&b.number))
        });
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn upsert_task(&self, task: &ParsedTask) -> Result<()> {
        insert_task(&mut self.lock(), task);
        Ok(())
    }

    async fn stats(&self) -> Result<CatalogStats> {
        let inner = self.lock();
        Ok(CatalogStats {
            tasks: inner.tasks.len() as i64,
            categories: inner.categories.len() as i64,
            users: inner.users.len() as i64,
        })
    }
}

#[async_trait]
impl UserDirectory for InMemoryCatalog {
    async fn get_or_create(&self, chat_id: i64) -> Result<User> {
        let mut inner = self.lock();
        if let Some(user) = inner.users.get(&chat_id) {
            return Ok(user.clone());
        }
        inner.next_user_seq += 1;
        let user = User {
            chat_id,
            is_verified: false,
            verification_code: None,
            created_at: inner.next_user_seq,
        };
        inner.users.insert(chat_id, user.clone());
        Ok(user)
    }

    async fn regenerate_verification_code(&self, chat_id: i64) -> Result<String> {
        let mut inner = self.lock();
        let user = inner
            .users
            .get_mut(&chat_id)
            .ok_or_else(|| Error::user_not_found(chat_id))?;
        let code = generate_verification_code();
        user.verification_code = Some(code.clone());
        Ok(code)
    }

    async fn verify_by_code(&self, code: &str) -> Result<Option<User>> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Ok(None);
        }
        let mut inner = self.lock();
        let user = inner
            .users
            .values_mut()
            .find(|u| !u.is_verified && u.verification_code.as_deref() == Some(code.as_str()));
        Ok(user.map(|u| {
            u.is_verified = true;
            u.verification_code = None;
            u.clone()
        }))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let inner = self.lock();
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by_key(|u| (u.created_at, u.chat_id));
        Ok(users)
    }
}
