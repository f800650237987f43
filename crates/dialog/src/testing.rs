//! Test doubles shared by the dialog tests.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use {
    async_trait::async_trait,
    cfbot_catalog::{
        CatalogStats, CatalogStore, Category, InMemoryCatalog, ParsedTask, TaskSummary,
    },
};

use crate::{Error, Result, gateway::Outbound};

/// Outbound that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingOutbound {
    sent: Mutex<Vec<(i64, String)>>,
    failing: Mutex<HashSet<i64>>,
}

impl RecordingOutbound {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every send to `chat_id` fail.
    pub fn fail_for(&self, chat_id: i64) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(chat_id);
    }

    /// Drain and return the texts sent to `chat_id`, oldest first.
    pub fn take_texts(&self, chat_id: i64) -> Vec<String> {
        let mut sent = self.sent.lock().unwrap_or_else(|e| e.into_inner());
        let (taken, kept): (Vec<_>, Vec<_>) = sent.drain(..).partition(|(id, _)| *id == chat_id);
        *sent = kept;
        taken.into_iter().map(|(_, text)| text).collect()
    }

    /// Every `(chat_id, text)` sent so far, in order.
    pub fn all(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Outbound for RecordingOutbound {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        if self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&chat_id)
        {
            return Err(Error::message(format!("send to {chat_id} failed")));
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((chat_id, text.to_string()));
        Ok(())
    }
}

/// Catalog whose every call fails.
pub struct FailingCatalog;

fn unavailable<T>() -> cfbot_catalog::Result<T> {
    Err(cfbot_catalog::Error::message("catalog unavailable"))
}

#[async_trait]
impl CatalogStore for FailingCatalog {
    async fn list_distinct_difficulties(&self) -> cfbot_catalog::Result<Vec<i64>> {
        unavailable()
    }

    async fn list_categories(&self) -> cfbot_catalog::Result<Vec<Category>> {
        unavailable()
    }

    async fn get_category(&self, _id: i64) -> cfbot_catalog::Result<Option<Category>> {
        unavailable()
    }

    async fn find_tasks(
        &self,
        _category_id: i64,
        _difficulty: i64,
        _limit: u32,
    ) -> cfbot_catalog::Result<Vec<TaskSummary>> {
        unavailable()
    }

    async fn upsert_task(&self, _task: &ParsedTask) -> cfbot_catalog::Result<()> {
        unavailable()
    }

    async fn stats(&self) -> cfbot_catalog::Result<CatalogStats> {
        unavailable()
    }
}

pub fn parsed_task(number: &str, difficulty: i64, categories: &[&str]) -> ParsedTask {
    ParsedTask {
        number: number.into(),
        name: format!("Task {number}"),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        difficulty,
        solved_count: 1,
    }
}

/// Difficulties `[800, 1200]`, categories `1) dp` and `2) greedy`, and one
/// single-category task `4A` at 800. The 1200 task has two categories, so it
/// never shows up in a listing.
pub fn scenario_catalog() -> InMemoryCatalog {
    InMemoryCatalog::with_tasks([
        ParsedTask {
            number: "4A".into(),
            name: "Watermelon".into(),
            categories: vec!["dp".into()],
            difficulty: 800,
            solved_count: 412_000,
        },
        parsed_task("5B", 1200, &["dp", "greedy"]),
    ])
}
