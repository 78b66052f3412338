//! Message router: classifies each inbound text and produces its reply.
//!
//! Rules are checked in order, first match wins:
//! 1. start command -> welcome + language keyboard
//! 2. set-language command -> validate code, store it
//! 3. keyboard label -> store the matching code
//! 4. anything else -> translate into the sender's language


use crate::i18n;
use crate::prefs::PreferenceStore;
use std::sync::Arc;
use tarjimon_core::{
    config::CommandsConfig,
    language::{Language, LanguageCatalog},
    message::{IncomingMessage, Keyboard, OutgoingMessage},
    traits::{Translator, AUTO_DETECT},
};
use tracing::{debug, error, info};

/// Buttons per keyboard row.
const KEYBOARD_ROW_WIDTH: usize = 3;

/// Classification of one inbound text.
#[derive(Debug, PartialEq)]
pub enum Route<'a> {
    Start,
    /// Set-language command with its (raw) first argument.
    SetLanguage(Option<&'a str>),
    /// Tapped keyboard button.
    KeyboardChoice(&'a Language),
    Translate,
}

/// How a language selection reached the router.
#[derive(Debug, Clone, Copy)]
enum Selection {
    Command,
    Keyboard,
}

impl Selection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Keyboard => "keyboard",
        }
    }
}

/// Strip an `@botname` suffix from a command (e.g. "/start@tarjimon_bot").
fn command_name(token: &str) -> &str {
    token.split('@').next().unwrap_or(token)
}

/// Stateless dispatcher over the preference store and translator.
pub struct Router {
    prefs: Arc<PreferenceStore>,
    translator: Arc<dyn Translator>,
    catalog: LanguageCatalog,
    commands: CommandsConfig,
}

impl Router {
    pub fn new(
        prefs: Arc<PreferenceStore>,
        translator: Arc<dyn Translator>,
        catalog: LanguageCatalog,
        commands: CommandsConfig,
    ) -> Self {
        Self {
            prefs,
            translator,
            catalog,
            commands,
        }
    }

    /// Classify `text` by literal match.
    pub fn classify<'a>(&'a self, text: &'a str) -> Route<'a> {
        let mut tokens = text.split_whitespace();
        if let Some(first) = tokens.next() {
            let cmd = command_name(first);
            if cmd == self.commands.start {
                return Route::Start;
            }
            if cmd == self.commands.set_language {
                return Route::SetLanguage(tokens.next());
            }
        }
        if let Some(lang) = self.catalog.from_label(text) {
            return Route::KeyboardChoice(lang);
        }
        Route::Translate
    }

    /// Handle one message. Always yields exactly one reply.
    pub async fn handle(&self, incoming: &IncomingMessage) -> OutgoingMessage {
        match self.classify(&incoming.text) {
            Route::Start => self.handle_start(incoming),
            Route::SetLanguage(arg) => self.handle_set_language(incoming, arg),
            Route::KeyboardChoice(lang) => {
                self.apply_selection(&incoming.sender_id, lang, Selection::Keyboard);
                OutgoingMessage::to_chat(incoming, i18n::language_chosen(&lang.label()))
            }
            Route::Translate => self.handle_translate(incoming).await,
        }
    }

    /// Users with an explicit language preference.
    pub fn preference_count(&self) -> usize {
        self.prefs.user_count()
    }

    /// The keyboard offered on start: one button per catalog language.
    pub fn language_keyboard(&self) -> Keyboard {
        Keyboard::new(self.catalog.labels(), KEYBOARD_ROW_WIDTH)
    }

    fn handle_start(&self, incoming: &IncomingMessage) -> OutgoingMessage {
        info!(
            "{} (user {}) started the bot in {} chat {}",
            incoming.sender_name.as_deref().unwrap_or("unknown"),
            incoming.sender_id,
            if incoming.is_group { "group" } else { "private" },
            incoming.reply_target.as_deref().unwrap_or("?")
        );
        OutgoingMessage::to_chat(incoming, i18n::t("welcome"))
            .with_keyboard(self.language_keyboard())
    }

    fn handle_set_language(
        &self,
        incoming: &IncomingMessage,
        arg: Option<&str>,
    ) -> OutgoingMessage {
        let Some(arg) = arg else {
            info!("user {}: set-language without a code", incoming.sender_id);
            let example = self
                .catalog
                .supported
                .iter()
                .map(|l| l.code.as_str())
                .find(|code| *code != self.catalog.default)
                .unwrap_or(self.catalog.default.as_str());
            return OutgoingMessage::reply(
                incoming,
                i18n::set_language_usage(&self.commands.set_language, example),
            );
        };

        let code = arg.to_lowercase();
        let Some(lang) = self.catalog.get(&code) else {
            info!(
                "user {}: rejected unsupported language code '{code}'",
                incoming.sender_id
            );
            return OutgoingMessage::reply(
                incoming,
                i18n::invalid_language(&self.catalog.codes()),
            );
        };

        self.apply_selection(&incoming.sender_id, lang, Selection::Command);
        OutgoingMessage::reply(incoming, i18n::language_changed(&lang.name))
    }

    /// The single state mutation shared by both selection paths.
    fn apply_selection(&self, sender_id: &str, lang: &Language, via: Selection) {
        self.prefs.set(sender_id, &lang.code);
        info!(
            "user {sender_id} set language to {} (via {})",
            lang.code,
            via.as_str()
        );
    }

    async fn handle_translate(&self, incoming: &IncomingMessage) -> OutgoingMessage {
        let target = self.prefs.get(&incoming.sender_id);

        match self
            .translator
            .translate(AUTO_DETECT, &target, &incoming.text)
            .await
        {
            Ok(translated) => {
                info!(
                    "translated message from {} into {target} via {}",
                    incoming.sender_id,
                    self.translator.name()
                );
                debug!("translation: {:?} -> {:?}", incoming.text, translated);
                let flag = self.catalog.flag(&target);
                OutgoingMessage::reply(incoming, i18n::translation(flag, &translated))
            }
            Err(e) => {
                error!(
                    "translation into {target} failed for {}: {e}",
                    incoming.sender_id
                );
                OutgoingMessage::reply(incoming, i18n::translation_failed(&e.to_string()))
            }
        }
    }
}
