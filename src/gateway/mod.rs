//! Gateway: the main event loop connecting channels to the router.
//!
//! Messages from one sender are handled strictly in arrival order; different
//! senders are handled concurrently. A panic while handling one message is
//! contained and answered with a generic error.

#[cfg(test)]
mod tests;

use crate::i18n;
use crate::router::Router;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tarjimon_core::{
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

type SenderQueues = HashMap<String, VecDeque<IncomingMessage>>;

/// The central gateway that routes messages between channels and the router.
pub struct Gateway {
    pub(super) router: Arc<Router>,
    pub(super) channels: HashMap<String, Arc<dyn Channel>>,
    /// Senders with a message in flight, and what they sent meanwhile.
    pub(super) active_senders: Mutex<SenderQueues>,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(router: Arc<Router>, channels: HashMap<String, Arc<dyn Channel>>) -> Self {
        Self {
            router,
            channels,
            active_senders: Mutex::new(HashMap::new()),
        }
    }

    /// Run the main event loop until Ctrl-C.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "Tarjimon gateway running | channels: {}",
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(msg) = channel_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        // Main event loop with graceful shutdown.
        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(incoming) => self.dispatch(incoming),
                    None => {
                        warn!("all channels closed");
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Queue behind an in-flight message from the same sender, or start a
    /// worker for this sender. Must be called in arrival order.
    pub(super) fn dispatch(self: &Arc<Self>, incoming: IncomingMessage) {
        let key = format!("{}:{}", incoming.channel, incoming.sender_id);

        {
            let mut active = self.lock_senders();
            if let Some(queue) = active.get_mut(&key) {
                debug!("queued message {} from {key} behind an in-flight one", incoming.id);
                queue.push_back(incoming);
                return;
            }
            active.insert(key.clone(), VecDeque::new());
        }

        let gw = Arc::clone(self);
        tokio::spawn(async move {
            gw.drain_sender(key, incoming).await;
        });
    }

    /// Handle `first`, then everything queued for `key` while it ran.
    async fn drain_sender(self: Arc<Self>, key: String, first: IncomingMessage) {
        let mut next = Some(first);
        while let Some(incoming) = next {
            self.handle_message(incoming).await;
            next = {
                let mut active = self.lock_senders();
                let queued = active.get_mut(&key).and_then(VecDeque::pop_front);
                if queued.is_none() {
                    active.remove(&key);
                }
                queued
            };
        }
    }

    /// Route one message and deliver its reply.
    pub(super) async fn handle_message(&self, incoming: IncomingMessage) {
        debug!(
            "handling message {} from {} ({}ms after arrival)",
            incoming.id,
            incoming.sender_id,
            (Utc::now() - incoming.timestamp).num_milliseconds()
        );
        let router = Arc::clone(&self.router);
        let msg = incoming.clone();
        let reply = match tokio::spawn(async move { router.handle(&msg).await }).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(
                    "handler fault for message {} from {}: {e}",
                    incoming.id, incoming.sender_id
                );
                OutgoingMessage::reply(&incoming, i18n::t("internal_error"))
            }
        };
        self.deliver(&incoming.channel, reply).await;
    }

    /// Send a reply through the channel the message came from.
    async fn deliver(&self, channel_name: &str, msg: OutgoingMessage) {
        match self.channels.get(channel_name) {
            Some(channel) => {
                if let Err(e) = channel.send(msg).await {
                    error!("failed to send message via {channel_name}: {e}");
                }
            }
            None => warn!("no channel named {channel_name}, dropping reply"),
        }
    }

    /// Graceful shutdown: stop channels.
    async fn shutdown(&self) {
        info!("Shutting down...");

        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {name}: {e}");
            }
        }

        info!(
            "Shutdown complete ({} users had a language set).",
            self.router.preference_count()
        );
    }

    fn lock_senders(&self) -> MutexGuard<'_, SenderQueues> {
        self.active_senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
