//! The task selection dialog.
//!
//! ```text
//!   Idle ──/tasks──▶ AwaitingDifficulty ──index──▶ AwaitingCategory ──id──▶ Idle
//!                      │  ▲ bad index                 │  bad id: stay
//!                      │  └────────────               │  no tasks: back to AwaitingDifficulty
//! ```
//!
//! Command-shaped text is always handled as a command, whatever the state, so
//! `/cancel` works from anywhere.

use std::sync::Arc;

use {
    cfbot_catalog::CatalogStore,
    tracing::{debug, info},
};

use crate::{
    Result,
    command::Command,
    gateway::Outbound,
    replies,
    session::SessionStore,
    state::DialogState,
};

/// Upper bound on tasks listed in one reply unless configured otherwise.
pub const DEFAULT_TASK_LIMIT: u32 = 10;

/// Advances each chat's [`DialogState`] on incoming text.
pub struct DialogEngine {
    catalog: Arc<dyn CatalogStore>,
    outbound: Arc<dyn Outbound>,
    sessions: Arc<dyn SessionStore>,
    task_limit: u32,
}

impl DialogEngine {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        outbound: Arc<dyn Outbound>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            catalog,
            outbound,
            sessions,
            task_limit: DEFAULT_TASK_LIMIT,
        }
    }

    #[must_use]
    pub fn with_task_limit(mut self, task_limit: u32) -> Self {
        self.task_limit = task_limit;
        self
    }

    /// Handle one text message from a verified chat.
    ///
    /// Bad input is answered and leaves the state as it was. Catalog and
    /// outbound failures are returned to the caller.
    pub async fn handle_text(&self, chat_id: i64, text: &str) -> Result<()> {
        if let Some(command) = Command::parse(text) {
            return self.handle_command(chat_id, command).await;
        }

        match self.sessions.get(chat_id) {
            None => {
                debug!(chat_id, "no active dialog, ignoring text");
                Ok(())
            },
            Some(DialogState::AwaitingDifficulty { difficulties }) => {
                self.select_difficulty(chat_id, &difficulties, text).await
            },
            Some(DialogState::AwaitingCategory { difficulty }) => {
                self.select_category(chat_id, difficulty, text).await
            },
        }
    }

    async fn handle_command(&self, chat_id: i64, command: Command) -> Result<()> {
        debug!(chat_id, ?command, "handling command");
        match command {
            Command::Tasks => self.start_selection(chat_id).await,
            Command::Cancel => {
                if let Some(previous) = self.sessions.remove(chat_id) {
                    debug!(chat_id, state = previous.name(), "dialog canceled");
                }
                self.send(chat_id, replies::CANCELED).await
            },
            Command::Help => self.send(chat_id, replies::HELP).await,
            Command::Unknown(name) => {
                debug!(chat_id, command = %name, "unknown command");
                self.send(chat_id, replies::COMMAND_NOT_FOUND).await
            },
        }
    }

    /// Send the difficulty list and wait for an index.
    async fn start_selection(&self, chat_id: i64) -> Result<()> {
        let difficulties = self.catalog.list_distinct_difficulties().await?;
        if difficulties.is_empty() {
            self.sessions.remove(chat_id);
            return self.send(chat_id, replies::NO_TASKS).await;
        }

        self.send(chat_id, &replies::difficulty_prompt(&difficulties))
            .await?;
        self.sessions
            .set(chat_id, DialogState::AwaitingDifficulty { difficulties });
        Ok(())
    }

    async fn select_difficulty(
        &self,
        chat_id: i64,
        difficulties: &[i64],
        text: &str,
    ) -> Result<()> {
        let Some(difficulty) = parse_selection(text, difficulties) else {
            return self.send(chat_id, replies::INCORRECT_DIFFICULTY).await;
        };

        self.send(chat_id, &replies::difficulty_set(difficulty))
            .await?;
        self.sessions
            .set(chat_id, DialogState::AwaitingCategory { difficulty });

        let categories = self.catalog.list_categories().await?;
        if categories.is_empty() {
            self.sessions.remove(chat_id);
            return self.send(chat_id, replies::NO_CATEGORIES).await;
        }

        self.send(chat_id, &replies::category_prompt(&categories))
            .await
    }

    async fn select_category(&self, chat_id: i64, difficulty: i64, text: &str) -> Result<()> {
        let category = match text.trim().parse::<i64>() {
            Ok(id) => self.catalog.get_category(id).await?,
            Err(_) => None,
        };
        let Some(category) = category else {
            debug!(chat_id, text, "category not found");
            return self.send(chat_id, replies::CATEGORY_NOT_FOUND).await;
        };

        let tasks = self
            .catalog
            .find_tasks(category.id, difficulty, self.task_limit)
            .await?;
        if tasks.is_empty() {
            self.send(chat_id, replies::NO_TASKS_TRY_AGAIN).await?;
            return self.start_selection(chat_id).await;
        }

        self.send(
            chat_id,
            &replies::task_list(difficulty, &category.name, &tasks),
        )
        .await?;
        self.sessions.remove(chat_id);
        info!(
            chat_id,
            difficulty,
            category = %category.name,
            count = tasks.len(),
            "task list delivered"
        );
        Ok(())
    }

    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        self.outbound.send_text(chat_id, text).await
    }
}

/// Resolve a 1-based index typed by the user. Only plain ASCII digits count.
fn parse_selection(text: &str, options: &[i64]) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: usize = text.parse().ok()?;
    index.checked_sub(1).and_then(|i| options.get(i)).copied()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            session::InMemorySessionStore,
            testing::{FailingCatalog, RecordingOutbound, parsed_task, scenario_catalog},
        },
        cfbot_catalog::InMemoryCatalog,
        rstest::rstest,
    };

    const CHAT: i64 = 42;

    struct Harness {
        engine: DialogEngine,
        outbound: Arc<RecordingOutbound>,
        sessions: Arc<InMemorySessionStore>,
    }

    fn harness(catalog: impl CatalogStore + 'static) -> Harness {
        let outbound = Arc::new(RecordingOutbound::default());
        let sessions = Arc::new(InMemorySessionStore::new());
        let engine = DialogEngine::new(
            Arc::new(catalog),
            Arc::clone(&outbound) as Arc<dyn Outbound>,
            Arc::clone(&sessions) as Arc<dyn SessionStore>,
        );
        Harness {
            engine,
            outbound,
            sessions,
        }
    }

    impl Harness {
        async fn say(&self, text: &str) -> Vec<String> {
            self.engine.handle_text(CHAT, text).await.unwrap();
            self.outbound.take_texts(CHAT)
        }

        fn state(&self) -> Option<DialogState> {
            self.sessions.get(CHAT)
        }
    }

    #[tokio::test]
    async fn full_flow_lists_tasks_and_returns_to_idle() {
        let h = harness(scenario_catalog());

        let sent = h.say("/tasks").await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("1) 800"));
        assert!(sent[0].contains("2) 1200"));
        assert_eq!(
            h.state(),
            Some(DialogState::AwaitingDifficulty {
                difficulties: vec![800, 1200]
            })
        );

        let sent = h.say("1").await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], "The task difficulty is set to 800.");
        assert!(sent[1].contains("1) dp"));
        assert!(sent[1].contains("2) greedy"));
        assert_eq!(
            h.state(),
            Some(DialogState::AwaitingCategory { difficulty: 800 })
        );

        let sent = h.say("1").await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("4A"));
        assert!(sent[0].contains("Watermelon"));
        assert!(h.state().is_none());
    }

    #[tokio::test]
    async fn out_of_range_index_keeps_difficulty_list() {
        let h = harness(scenario_catalog());
        h.say("/tasks").await;

        let sent = h.say("9").await;
        assert_eq!(sent, vec![replies::INCORRECT_DIFFICULTY]);
        assert_eq!(
            h.state(),
            Some(DialogState::AwaitingDifficulty {
                difficulties: vec![800, 1200]
            })
        );

        let sent = h.say("1").await;
        assert_eq!(sent[0], "The task difficulty is set to 800.");
    }

    #[rstest]
    #[case("0")]
    #[case("3")]
    #[case("abc")]
    #[case("-1")]
    #[case("+1")]
    #[case("1.0")]
    #[case("")]
    #[case("99999999999999999999999")]
    #[tokio::test]
    async fn invalid_difficulty_index_is_rejected(#[case] input: &str) {
        let h = harness(scenario_catalog());
        h.say("/tasks").await;
        let before = h.state();

        assert_eq!(h.say(input).await, vec![replies::INCORRECT_DIFFICULTY]);
        assert_eq!(h.state(), before);
    }

    #[rstest]
    #[case(1, 800)]
    #[case(2, 1200)]
    #[tokio::test]
    async fn valid_index_stores_difficulty(#[case] index: usize, #[case] expected: i64) {
        let h = harness(scenario_catalog());
        h.say("/tasks").await;

        h.say(&format!(" {index} ")).await;
        assert_eq!(
            h.state(),
            Some(DialogState::AwaitingCategory {
                difficulty: expected
            })
        );
    }

    #[rstest]
    #[case::idle(&[])]
    #[case::awaiting_difficulty(&["/tasks"])]
    #[case::awaiting_category(&["/tasks", "1"])]
    #[tokio::test]
    async fn cancel_resets_from_any_state(#[case] steps: &[&str]) {
        let h = harness(scenario_catalog());
        for step in steps {
            h.say(step).await;
        }

        assert_eq!(h.say("/cancel").await, vec![replies::CANCELED]);
        assert!(h.state().is_none());
    }

    #[tokio::test]
    async fn empty_catalog_sends_single_reply_without_session() {
        let h = harness(InMemoryCatalog::new());

        assert_eq!(h.say("/tasks").await, vec![replies::NO_TASKS]);
        assert!(h.state().is_none());
        assert_eq!(h.sessions.active(), 0);
    }

    #[tokio::test]
    async fn free_text_while_idle_is_ignored() {
        let h = harness(scenario_catalog());
        assert!(h.say("hello there").await.is_empty());
        assert!(h.state().is_none());
    }

    #[tokio::test]
    async fn unknown_command_does_not_touch_dialog() {
        let h = harness(scenario_catalog());
        h.say("/tasks").await;
        let before = h.state();

        assert_eq!(h.say("/foo").await, vec![replies::COMMAND_NOT_FOUND]);
        assert_eq!(h.state(), before);
    }

    #[tokio::test]
    async fn help_command() {
        let h = harness(scenario_catalog());
        assert_eq!(h.say("/start").await, vec![replies::HELP]);
        assert!(h.state().is_none());
    }

    #[tokio::test]
    async fn tasks_command_restarts_flow() {
        let h = harness(scenario_catalog());
        h.say("/tasks").await;
        h.say("2").await;

        let sent = h.say("/tasks").await;
        assert_eq!(sent.len(), 1);
        assert!(matches!(
            h.state(),
            Some(DialogState::AwaitingDifficulty { .. })
        ));
    }

    #[rstest]
    #[case("99")]
    #[case("dp")]
    #[case("")]
    #[tokio::test]
    async fn unknown_category_keeps_state(#[case] input: &str) {
        let h = harness(scenario_catalog());
        h.say("/tasks").await;
        h.say("1").await;

        assert_eq!(h.say(input).await, vec![replies::CATEGORY_NOT_FOUND]);
        assert_eq!(
            h.state(),
            Some(DialogState::AwaitingCategory { difficulty: 800 })
        );
    }

    #[tokio::test]
    async fn empty_task_listing_restarts_selection() {
        let h = harness(scenario_catalog());
        h.say("/tasks").await;
        h.say("2").await; // 1200: only multi-category tasks

        let sent = h.say("1").await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], replies::NO_TASKS_TRY_AGAIN);
        assert!(sent[1].starts_with("Select the required difficulty"));
        assert_eq!(
            h.state(),
            Some(DialogState::AwaitingDifficulty {
                difficulties: vec![800, 1200]
            })
        );
    }

    #[tokio::test]
    async fn no_categories_returns_to_idle() {
        let h = harness(InMemoryCatalog::with_tasks([parsed_task("1A", 800, &[])]));
        h.say("/tasks").await;

        let sent = h.say("1").await;
        assert_eq!(sent, vec![
            "The task difficulty is set to 800.".to_string(),
            replies::NO_CATEGORIES.to_string(),
        ]);
        assert!(h.state().is_none());
    }

    #[tokio::test]
    async fn task_limit_caps_listing() {
        let tasks = (0..15).map(|i| parsed_task(&format!("{i}A"), 800, &["dp"]));
        let mut h = harness(InMemoryCatalog::with_tasks(tasks));
        h.engine = h.engine.with_task_limit(3);
        h.say("/tasks").await;
        h.say("1").await;

        let sent = h.say("1").await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].lines().count(), 1 + 3);
    }

    #[tokio::test]
    async fn default_limit_is_ten() {
        let tasks = (0..15).map(|i| parsed_task(&format!("{i}A"), 800, &["dp"]));
        let h = harness(InMemoryCatalog::with_tasks(tasks));
        h.say("/tasks").await;
        h.say("1").await;

        let sent = h.say("1").await;
        assert_eq!(sent[0].lines().count(), 1 + 10);
    }

    #[tokio::test]
    async fn sessions_are_per_chat() {
        let h = harness(scenario_catalog());
        h.say("/tasks").await;

        h.engine.handle_text(7, "1").await.unwrap();
        assert!(h.outbound.take_texts(7).is_empty());
        assert!(h.sessions.get(7).is_none());
        assert!(h.state().is_some());
    }

    #[tokio::test]
    async fn catalog_failure_propagates_without_state_change() {
        let h = harness(FailingCatalog);

        assert!(h.engine.handle_text(CHAT, "/tasks").await.is_err());
        assert!(h.outbound.take_texts(CHAT).is_empty());
        assert!(h.state().is_none());
    }

    #[tokio::test]
    async fn outbound_failure_propagates_without_session() {
        let h = harness(scenario_catalog());
        h.outbound.fail_for(CHAT);

        assert!(h.engine.handle_text(CHAT, "/tasks").await.is_err());
        assert!(h.state().is_none());
    }

    #[test]
    fn parse_selection_bounds() {
        let options = [800, 1200, 1600];
        assert_eq!(parse_selection("1", &options), Some(800));
        assert_eq!(parse_selection("3", &options), Some(1600));
        assert_eq!(parse_selection("03", &options), Some(1600));
        assert_eq!(parse_selection("0", &options), None);
        assert_eq!(parse_selection("4", &options), None);
        assert_eq!(parse_selection("1", &[]), None);
    }
}
