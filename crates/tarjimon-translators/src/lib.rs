//! # tarjimon-translators
//!
//! Translation backend implementations for Tarjimon.

pub mod google;

pub use google::GoogleTranslator;

use std::time::Duration;
use tarjimon_core::{config::TranslatorConfig, error::TarjimonError, traits::Translator};

/// Build the configured translation backend.
pub fn build(cfg: &TranslatorConfig) -> Result<Box<dyn Translator>, TarjimonError> {
    match cfg.backend.as_str() {
        "google" => Ok(Box::new(GoogleTranslator::new(
            cfg.base_url.clone(),
            Duration::from_secs(cfg.timeout_secs),
        )?)),
        other => Err(TarjimonError::Config(format!(
            "unsupported translator backend: {other}"
        ))),
    }
}
