use super::*;
use crate::prefs::PreferenceStore;
use crate::testutil::{incoming, Behavior, MockChannel, MockTranslator};
use std::time::Duration;
use tarjimon_core::{config::CommandsConfig, language::LanguageCatalog};

fn gateway_with(behavior: Behavior, channel: MockChannel) -> Arc<Gateway> {
    let catalog = LanguageCatalog::default();
    let router = Router::new(
        Arc::new(PreferenceStore::new(catalog.default.clone())),
        Arc::new(MockTranslator::new(behavior)),
        catalog,
        CommandsConfig::default(),
    );
    let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();
    channels.insert("mock".to_string(), Arc::new(channel));
    Arc::new(Gateway::new(Arc::new(router), channels))
}

/// Wait until `sent` holds `n` messages (or give up after 2s).
async fn wait_for(sent: &Arc<std::sync::Mutex<Vec<OutgoingMessage>>>, n: usize) {
    for _ in 0..200 {
        if sent.lock().unwrap().len() >= n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_handle_message_delivers_reply() {
    let channel = MockChannel::default();
    let sent = channel.sent.clone();
    let gw = gateway_with(Behavior::Echo, channel);

    gw.handle_message(incoming("42", "hello")).await;

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].reply_target.as_deref(), Some("42"));
    assert!(sent[0].text.ends_with("hello [uz]"));
}

#[tokio::test]
async fn test_handler_panic_becomes_generic_error() {
    let channel = MockChannel::default();
    let sent = channel.sent.clone();
    let gw = gateway_with(Behavior::Panic, channel);

    gw.handle_message(incoming("42", "hello")).await;
    // The gateway keeps serving after a fault.
    gw.handle_message(incoming("42", "/setlang en")).await;

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].text, i18n::t("internal_error"));
    assert_eq!(sent[0].reply_to, Some(1));
    assert!(sent[1].text.contains("English"));
}

#[tokio::test]
async fn test_send_failure_is_contained() {
    let channel = MockChannel {
        fail_send: true,
        ..Default::default()
    };
    let attempts = channel.attempts.clone();
    let sent = channel.sent.clone();
    let gw = gateway_with(Behavior::Echo, channel);

    gw.handle_message(incoming("42", "hello")).await;
    gw.handle_message(incoming("42", "/setlang ru")).await;

    // Both replies were attempted and the second message still took effect.
    assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 2);
    assert!(sent.lock().unwrap().is_empty());
    assert_eq!(gw.router.preference_count(), 1);
}

#[tokio::test]
async fn test_unknown_channel_drops_reply() {
    let channel = MockChannel::default();
    let sent = channel.sent.clone();
    let gw = gateway_with(Behavior::Echo, channel);

    let mut msg = incoming("42", "hello");
    msg.channel = "nowhere".to_string();
    gw.handle_message(msg).await;

    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_dispatch_keeps_per_sender_order() {
    let channel = MockChannel::default();
    let sent = channel.sent.clone();
    let gw = gateway_with(Behavior::Echo, channel);

    gw.dispatch(incoming("42", "/setlang ru"));
    gw.dispatch(incoming("42", "hello"));
    gw.dispatch(incoming("7", "salom"));
    wait_for(&sent, 3).await;

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 3);
    let for_42: Vec<&str> = sent
        .iter()
        .filter(|m| m.reply_target.as_deref() == Some("42"))
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(for_42.len(), 2);
    assert!(for_42[0].contains("Russian"));
    assert!(for_42[1].ends_with("hello [ru]"));
    let for_7 = sent
        .iter()
        .find(|m| m.reply_target.as_deref() == Some("7"))
        .unwrap();
    assert!(for_7.text.ends_with("salom [uz]"));
}

#[tokio::test]
async fn test_dispatch_clears_idle_senders() {
    let channel = MockChannel::default();
    let sent = channel.sent.clone();
    let gw = gateway_with(Behavior::Echo, channel);

    gw.dispatch(incoming("42", "hello"));
    wait_for(&sent, 1).await;
    for _ in 0..200 {
        if gw.lock_senders().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(gw.lock_senders().is_empty());
}
