//! Long-polling update loop and Channel trait implementation.

use super::types::{TgMessage, TgResponse, TgUpdate};
use super::TelegramChannel;
use async_trait::async_trait;
use std::time::Duration;
use tarjimon_core::{
    error::TarjimonError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

const POLL_TIMEOUT_SECS: u64 = 30;
const MAX_BACKOFF_SECS: u64 = 60;

/// Convert a Telegram message into an [`IncomingMessage`].
///
/// Returns `None` for non-text payloads and messages without a sender.
pub(crate) fn to_incoming(msg: TgMessage) -> Option<IncomingMessage> {
    let Some(text) = msg.text else {
        debug!("telegram: skipping non-text message {}", msg.message_id);
        return None;
    };
    let user = msg.from?;

    let sender_name = if let Some(ref un) = user.username {
        format!("@{un}")
    } else if let Some(ref ln) = user.last_name {
        format!("{} {ln}", user.first_name)
    } else {
        user.first_name.clone()
    };

    Some(IncomingMessage {
        id: Uuid::new_v4(),
        channel: "telegram".to_string(),
        sender_id: user.id.to_string(),
        sender_name: Some(sender_name),
        text,
        timestamp: chrono::Utc::now(),
        reply_target: Some(msg.chat.id.to_string()),
        platform_message_id: Some(msg.message_id),
        is_group: matches!(msg.chat.chat_type.as_str(), "group" | "supergroup"),
    })
}

/// Retry delay for the update loop: doubles on each failure up to a minute.
#[derive(Debug)]
pub(crate) struct Backoff {
    secs: u64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self { secs: 1 }
    }
}

impl Backoff {
    /// The delay to wait now; the following one is twice as long.
    pub(crate) fn next_delay(&mut self) -> Duration {
        let delay = Duration::from_secs(self.secs);
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
        delay
    }

    pub(crate) fn reset(&mut self) {
        self.secs = 1;
    }
}

/// One `getUpdates` round trip. Blocks up to the long-poll timeout.
async fn fetch_updates(
    client: &reqwest::Client,
    base_url: &str,
    offset: Option<i64>,
) -> Result<Vec<TgUpdate>, TarjimonError> {
    let mut url = format!("{base_url}/getUpdates?timeout={POLL_TIMEOUT_SECS}");
    if let Some(off) = offset {
        url.push_str(&format!("&offset={off}"));
    }

    let resp = client
        .get(&url)
        .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 5))
        .send()
        .await
        .map_err(|e| TarjimonError::Channel(format!("telegram poll failed: {e}")))?;

    let body: TgResponse<Vec<TgUpdate>> = resp
        .json()
        .await
        .map_err(|e| TarjimonError::Channel(format!("telegram poll response unreadable: {e}")))?;

    if !body.ok {
        return Err(TarjimonError::Channel(format!(
            "telegram rejected getUpdates: {}",
            body.description.unwrap_or_default()
        )));
    }
    Ok(body.result.unwrap_or_default())
}

fn parse_chat_id(target: &str) -> Result<i64, TarjimonError> {
    target
        .parse()
        .map_err(|e| TarjimonError::Channel(format!("invalid telegram chat_id '{target}': {e}")))
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, TarjimonError> {
        self.register_commands().await;

        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let last_update_id = self.last_update_id.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff = Backoff::default();

            loop {
                let offset = (*last_update_id.lock().await).map(|id| id + 1);

                let updates = match fetch_updates(&client, &base_url, offset).await {
                    Ok(updates) => {
                        backoff.reset();
                        updates
                    }
                    Err(e) => {
                        let delay = backoff.next_delay();
                        error!("{e} (retry in {}s)", delay.as_secs());
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                };

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for incoming in updates
                    .into_iter()
                    .filter_map(|u| u.message)
                    .filter_map(to_incoming)
                {
                    if tx.send(incoming).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), TarjimonError> {
        let chat_id_str = message
            .reply_target
            .as_deref()
            .ok_or_else(|| TarjimonError::Channel("no reply_target on outgoing message".into()))?;
        let chat_id = parse_chat_id(chat_id_str)?;

        self.send_text(
            chat_id,
            &message.text,
            message.reply_to,
            message.keyboard.as_ref(),
        )
        .await
    }

    async fn stop(&self) -> Result<(), TarjimonError> {
        info!("Telegram channel stopped");
        Ok(())
    }
}
