use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming text message from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel name (e.g. "telegram").
    pub channel: String,
    /// Platform-specific user ID. Preferences are keyed on this.
    pub sender_id: String,
    /// Human-readable sender name.
    pub sender_name: Option<String>,
    /// Message text content.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Platform-specific target for routing the response (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
    /// Platform message ID, used when answering as a reply.
    #[serde(default)]
    pub platform_message_id: Option<i64>,
    /// Whether this message comes from a group chat.
    #[serde(default)]
    pub is_group: bool,
}

/// An outgoing message to send back through a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Platform-specific target for routing (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
    /// Quote this platform message when delivering.
    #[serde(default)]
    pub reply_to: Option<i64>,
    /// Reply keyboard to attach, if any.
    #[serde(default)]
    pub keyboard: Option<Keyboard>,
}

impl OutgoingMessage {
    /// Plain message addressed to the chat `incoming` came from.
    pub fn to_chat(incoming: &IncomingMessage, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reply_target: incoming.reply_target.clone(),
            ..Default::default()
        }
    }

    /// Message that quotes `incoming` in the same chat.
    pub fn reply(incoming: &IncomingMessage, text: impl Into<String>) -> Self {
        Self {
            reply_to: incoming.platform_message_id,
            ..Self::to_chat(incoming, text)
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// A reply keyboard: one button per label, wrapped into rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyboard {
    pub buttons: Vec<String>,
    pub row_width: usize,
}

impl Keyboard {
    pub fn new(buttons: Vec<String>, row_width: usize) -> Self {
        Self {
            buttons,
            row_width: row_width.max(1),
        }
    }

    /// Button labels grouped into rows of at most `row_width`.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.buttons
            .chunks(self.row_width)
            .map(|row| row.to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incoming() -> IncomingMessage {
        IncomingMessage {
            id: Uuid::new_v4(),
            channel: "telegram".to_string(),
            sender_id: "42".to_string(),
            sender_name: None,
            text: "salom".to_string(),
            timestamp: Utc::now(),
            reply_target: Some("100".to_string()),
            platform_message_id: Some(7),
            is_group: false,
        }
    }

    #[test]
    fn test_reply_quotes_original() {
        let msg = OutgoingMessage::reply(&incoming(), "ok");
        assert_eq!(msg.reply_target.as_deref(), Some("100"));
        assert_eq!(msg.reply_to, Some(7));
        assert!(msg.keyboard.is_none());
    }

    #[test]
    fn test_to_chat_does_not_quote() {
        let msg = OutgoingMessage::to_chat(&incoming(), "ok");
        assert_eq!(msg.reply_target.as_deref(), Some("100"));
        assert_eq!(msg.reply_to, None);
    }

    #[test]
    fn test_keyboard_rows() {
        let kb = Keyboard::new(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            3,
        );
        assert_eq!(kb.rows(), vec![vec!["a", "b", "c"], vec!["d"]]);
    }

    #[test]
    fn test_keyboard_zero_width_clamped() {
        let kb = Keyboard::new(vec!["a".into(), "b".into()], 0);
        assert_eq!(kb.rows().len(), 2);
    }
}
