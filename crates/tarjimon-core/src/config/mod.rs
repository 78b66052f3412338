mod channels;
mod defaults;


pub use channels::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TarjimonError;
use crate::language::LanguageCatalog;
use defaults::*;

/// Top-level Tarjimon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub languages: LanguageCatalog,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub translator: TranslatorConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log file path. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_file: default_log_file(),
        }
    }
}

/// Command tokens recognized by the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    #[serde(default = "default_start_command")]
    pub start: String,
    #[serde(default = "default_setlang_command")]
    pub set_language: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            start: default_start_command(),
            set_language: default_setlang_command(),
        }
    }
}

/// Translation backend config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default = "default_translator_backend")]
    pub backend: String,
    #[serde(default = "default_google_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            backend: default_translator_backend(),
            base_url: default_google_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Replace the Telegram token when one is supplied from the environment.
    pub fn apply_bot_token(&mut self, token: Option<String>) {
        let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
            return;
        };
        self.channel
            .telegram
            .get_or_insert_with(TelegramConfig::default)
            .bot_token = token;
    }

    /// Reject configurations the router cannot work with.
    pub fn validate(&self) -> Result<(), TarjimonError> {
        self.languages.validate()?;

        for (key, token) in [
            ("commands.start", &self.commands.start),
            ("commands.set_language", &self.commands.set_language),
        ] {
            if !token.starts_with('/') || token.len() < 2 || token.contains(char::is_whitespace) {
                return Err(TarjimonError::Config(format!(
                    "{key} must look like '/command', got '{token}'"
                )));
            }
        }
        if self.commands.start == self.commands.set_language {
            return Err(TarjimonError::Config(
                "commands.start and commands.set_language must differ".into(),
            ));
        }
        if self.translator.timeout_secs == 0 {
            return Err(TarjimonError::Config(
                "translator.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Where the loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// The file did not exist; every value is a default.
    Defaults,
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. Runs before logging
/// is set up, so the caller reports the returned [`ConfigSource`].
pub fn load(path: &str) -> Result<(Config, ConfigSource), TarjimonError> {
    let path = Path::new(path);
    if !path.exists() {
        let config = Config {
            channel: ChannelConfig {
                telegram: Some(TelegramConfig::default()),
            },
            ..Default::default()
        };
        return Ok((config, ConfigSource::Defaults));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| TarjimonError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| TarjimonError::Config(format!("failed to parse config: {}", e)))?;

    Ok((config, ConfigSource::File))
}
