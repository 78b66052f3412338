//! Telegram Bot API channel.
//!
//! Uses long polling via `getUpdates` and `sendMessage` for responses.
//! Docs: <https://core.telegram.org/bots/api>

mod polling;
pub(crate) mod send;
pub(crate) mod types;


use std::sync::Arc;
use tarjimon_core::config::TelegramConfig;
use tokio::sync::Mutex;

/// Telegram's per-message text limit.
pub(crate) const MAX_MESSAGE_LEN: usize = 4096;

/// Telegram channel using the Bot API with long polling.
pub struct TelegramChannel {
    client: reqwest::Client,
    base_url: String,
    /// Commands shown in the client's autocomplete menu: (command, description).
    menu: Vec<(String, String)>,
    /// Tracks the last update_id to avoid reprocessing.
    last_update_id: Arc<Mutex<Option<i64>>>,
}

impl TelegramChannel {
    /// Create a new Telegram channel from config.
    pub fn new(config: &TelegramConfig) -> Self {
        let base_url = format!("https://api.telegram.org/bot{}", config.bot_token);
        Self {
            client: reqwest::Client::new(),
            base_url,
            menu: Vec::new(),
            last_update_id: Arc::new(Mutex::new(None)),
        }
    }

    /// Commands to register with `setMyCommands` when polling starts.
    /// Leading slashes are stripped.
    pub fn with_menu(mut self, menu: Vec<(String, String)>) -> Self {
        self.menu = menu
            .into_iter()
            .map(|(cmd, desc)| (cmd.trim_start_matches('/').to_string(), desc))
            .collect();
        self
    }
}
