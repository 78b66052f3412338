//! Test doubles for the translator and channel collaborators, plus log capture.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::io;
use std::sync::{Arc, Mutex};
use tarjimon_core::{
    error::TarjimonError,
    message::{IncomingMessage, OutgoingMessage},
    traits::{Channel, Translator},
};

/// How the mock translator answers.
#[derive(Clone, Copy)]
pub enum Behavior {
    /// Reply with "<text> [<target>]".
    Echo,
    /// Return a translator error.
    Fail,
    /// Panic inside `translate`.
    Panic,
}

/// Records every call as (source, target, text).
pub struct MockTranslator {
    pub calls: Arc<Mutex<Vec<(String, String, String)>>>,
    behavior: Behavior,
}

impl MockTranslator {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            behavior,
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(
        &self,
        source: &str,
        target: &str,
        text: &str,
    ) -> Result<String, TarjimonError> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_string(), target.to_string(), text.to_string()));
        match self.behavior {
            Behavior::Echo => Ok(format!("{text} [{target}]")),
            Behavior::Fail => Err(TarjimonError::Translator("connection reset".to_string())),
            Behavior::Panic => panic!("translator blew up"),
        }
    }
}

/// Channel that records sent messages instead of delivering them.
#[derive(Default)]
pub struct MockChannel {
    pub sent: Arc<Mutex<Vec<OutgoingMessage>>>,
    /// Every `send()` call, successful or not.
    pub attempts: Arc<AtomicUsize>,
    /// When true, `send()` returns an error (simulates delivery failure).
    pub fail_send: bool,
}

#[async_trait]
impl Channel for MockChannel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, TarjimonError> {
        let (_tx, rx) = tokio::sync::mpsc::channel(1);
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), TarjimonError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_send {
            return Err(TarjimonError::Channel("connection reset".to_string()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn stop(&self) -> Result<(), TarjimonError> {
        Ok(())
    }
}

/// A private-chat text message from `sender` (chat ID = sender ID).
pub fn incoming(sender: &str, text: &str) -> IncomingMessage {
    IncomingMessage {
        id: uuid::Uuid::new_v4(),
        channel: "mock".to_string(),
        sender_id: sender.to_string(),
        sender_name: None,
        text: text.to_string(),
        timestamp: chrono::Utc::now(),
        reply_target: Some(sender.to_string()),
        platform_message_id: Some(1),
        is_group: false,
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Collects INFO and above from the current thread while alive.
pub struct LogCapture {
    buf: SharedBuf,
    _guard: tracing::subscriber::DefaultGuard,
}

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8(self.buf.0.lock().unwrap().clone()).unwrap()
    }
}

pub fn capture_logs() -> LogCapture {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    LogCapture {
        buf,
        _guard: tracing::subscriber::set_default(subscriber),
    }
}
