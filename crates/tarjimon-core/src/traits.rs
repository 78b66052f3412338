use crate::{
    error::TarjimonError,
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;

/// Source language value that asks the backend to detect the language.
pub const AUTO_DETECT: &str = "auto";

/// Translation backend trait.
///
/// Every translation engine (Google, LibreTranslate, ...) implements this
/// trait so the router can treat them uniformly.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Translate `text` from `source` (or [`AUTO_DETECT`]) into `target`.
    async fn translate(
        &self,
        source: &str,
        target: &str,
        text: &str,
    ) -> Result<String, TarjimonError>;
}

/// Messaging Channel trait.
///
/// Every messaging platform implements this trait to receive and send
/// messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming text messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, TarjimonError>;

    /// Send a message back through this channel. Honors `reply_to` and
    /// `keyboard` when set.
    async fn send(&self, message: OutgoingMessage) -> Result<(), TarjimonError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), TarjimonError>;
}
