/// Where a chat currently is in the task selection flow.
///
/// A chat with no stored state is idle and only reacts to commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    /// The numbered difficulty list was sent; expecting a 1-based index into
    /// `difficulties`.
    AwaitingDifficulty { difficulties: Vec<i64> },
    /// The difficulty is chosen and the category list was sent; expecting a
    /// category ID.
    AwaitingCategory { difficulty: i64 },
}

impl DialogState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingDifficulty { .. } => "awaiting_difficulty",
            Self::AwaitingCategory { .. } => "awaiting_category",
        }
    }
}
