/// Slash commands understood by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/tasks`: start the difficulty → category → task list flow.
    Tasks,
    /// `/cancel`: drop the current flow.
    Cancel,
    /// `/help` or `/start`.
    Help,
    /// Any other `/...` text.
    Unknown(String),
}

impl Command {
    /// Parse command-shaped text.
    ///
    /// Returns `None` unless the text starts with `/`. Only the first word is
    /// looked at; a `@botname` suffix (as sent in group chats) is stripped.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let word = text.strip_prefix('/')?.split_whitespace().next().unwrap_or("");
        let name = word.split_once('@').map_or(word, |(name, _)| name);
        Some(match name {
            "tasks" => Self::Tasks,
            "cancel" => Self::Cancel,
            "help" | "start" => Self::Help,
            other => Self::Unknown(other.to_string()),
        })
    }
}
