//! Message sending: text with optional reply-to and keyboard, and command registration.

use super::{TelegramChannel, MAX_MESSAGE_LEN};
use crate::utils::split_message;
use serde_json::{json, Value};
use tarjimon_core::{error::TarjimonError, message::Keyboard};
use tracing::{info, warn};

/// Build a `sendMessage` request body.
pub(crate) fn message_body(
    chat_id: i64,
    text: &str,
    reply_to: Option<i64>,
    keyboard: Option<&Keyboard>,
) -> Value {
    let mut body = json!({
        "chat_id": chat_id,
        "text": text,
    });
    if let Some(message_id) = reply_to {
        body["reply_to_message_id"] = json!(message_id);
        // Deliver even if the original message was deleted meanwhile.
        body["allow_sending_without_reply"] = json!(true);
    }
    if let Some(kb) = keyboard {
        let rows: Vec<Vec<Value>> = kb
            .rows()
            .into_iter()
            .map(|row| row.into_iter().map(|text| json!({ "text": text })).collect())
            .collect();
        body["reply_markup"] = json!({
            "keyboard": rows,
            "resize_keyboard": true,
        });
    }
    body
}

impl TelegramChannel {
    /// Send a text message to a specific chat.
    ///
    /// Long texts are split; the first chunk carries the reply-to, the last
    /// one carries the keyboard.
    pub(crate) async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TarjimonError> {
        let chunks = split_message(text, MAX_MESSAGE_LEN);
        let last = chunks.len() - 1;
        let url = format!("{}/sendMessage", self.base_url);

        for (i, chunk) in chunks.into_iter().enumerate() {
            let body = message_body(
                chat_id,
                chunk,
                if i == 0 { reply_to } else { None },
                if i == last { keyboard } else { None },
            );

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| TarjimonError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                return Err(TarjimonError::Channel(format!(
                    "telegram send failed ({status}): {error_text}"
                )));
            }
        }

        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        if self.menu.is_empty() {
            return;
        }
        let commands: Vec<Value> = self
            .menu
            .iter()
            .map(|(command, description)| {
                json!({ "command": command, "description": description })
            })
            .collect();

        let url = format!("{}/setMyCommands", self.base_url);
        match self
            .client
            .post(&url)
            .json(&json!({ "commands": commands }))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }
}
