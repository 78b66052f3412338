//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Tarjimon".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_file() -> String {
    "bot.log".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_start_command() -> String {
    "/start".to_string()
}

pub fn default_setlang_command() -> String {
    "/setlang".to_string()
}

pub fn default_translator_backend() -> String {
    "google".to_string()
}

pub fn default_google_base_url() -> String {
    "https://translate.googleapis.com".to_string()
}

pub fn default_timeout_secs() -> u64 {
    15
}
