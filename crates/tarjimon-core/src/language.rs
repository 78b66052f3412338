//! Supported language catalog.
//!
//! The catalog is fixed at startup (built from the `[languages]` config
//! section) and never mutated afterwards.

use crate::error::TarjimonError;
use serde::{Deserialize, Serialize};

/// One supported translation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Short code passed to the translator (e.g. "en").
    pub code: String,
    /// Display name (e.g. "English").
    pub name: String,
    /// Display glyph, usually a flag emoji.
    pub flag: String,
}

impl Language {
    pub fn new(code: &str, name: &str, flag: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            flag: flag.to_string(),
        }
    }

    /// Keyboard button label: glyph, space, display name.
    pub fn label(&self) -> String {
        format!("{} {}", self.flag, self.name)
    }
}

/// The closed set of languages users may select, plus the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCatalog {
    /// Code used for users who never selected a language.
    #[serde(default = "default_language_code")]
    pub default: String,
    #[serde(default = "default_supported")]
    pub supported: Vec<Language>,
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self {
            default: default_language_code(),
            supported: default_supported(),
        }
    }
}

fn default_language_code() -> String {
    "uz".to_string()
}

fn default_supported() -> Vec<Language> {
    vec![
        Language::new("uz", "Uzbek", "\u{1f1fa}\u{1f1ff}"),
        Language::new("en", "English", "\u{1f1ec}\u{1f1e7}"),
        Language::new("ru", "Russian", "\u{1f1f7}\u{1f1fa}"),
    ]
}

impl LanguageCatalog {
    /// Look up a language by exact code.
    pub fn get(&self, code: &str) -> Option<&Language> {
        self.supported.iter().find(|l| l.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Match a keyboard button label exactly.
    pub fn from_label(&self, label: &str) -> Option<&Language> {
        self.supported.iter().find(|l| l.label() == label)
    }

    /// The default language entry.
    ///
    /// Only meaningful after [`validate`](Self::validate) succeeded.
    pub fn default_language(&self) -> Option<&Language> {
        self.get(&self.default)
    }

    /// Glyph for `code`, falling back to the default language's glyph.
    pub fn flag(&self, code: &str) -> &str {
        self.get(code)
            .or_else(|| self.default_language())
            .map(|l| l.flag.as_str())
            .unwrap_or_default()
    }

    /// All codes joined with ", " (e.g. "uz, en, ru").
    pub fn codes(&self) -> String {
        self.supported
            .iter()
            .map(|l| l.code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Button labels in catalog order.
    pub fn labels(&self) -> Vec<String> {
        self.supported.iter().map(Language::label).collect()
    }

    /// Check the catalog is usable: non-empty, lowercase unique codes,
    /// and a default that is one of them.
    pub fn validate(&self) -> Result<(), TarjimonError> {
        if self.supported.is_empty() {
            return Err(TarjimonError::Config(
                "languages.supported must not be empty".into(),
            ));
        }
        for (i, lang) in self.supported.iter().enumerate() {
            if lang.code.is_empty() || lang.code != lang.code.to_lowercase() {
                return Err(TarjimonError::Config(format!(
                    "language code '{}' must be non-empty lowercase",
                    lang.code
                )));
            }
            if self.supported[..i].iter().any(|l| l.code == lang.code) {
                return Err(TarjimonError::Config(format!(
                    "duplicate language code '{}'",
                    lang.code
                )));
            }
        }
        if !self.contains(&self.default) {
            return Err(TarjimonError::Config(format!(
                "default language '{}' is not in the supported list ({})",
                self.default,
                self.codes()
            )));
        }
        Ok(())
    }
}
