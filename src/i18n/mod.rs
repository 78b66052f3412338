//! Localized strings for bot replies.
//!
//! Uses a simple `t(key)` function for static strings and `format.rs`
//! helpers for strings with interpolation. Chat-facing prompts are in
//! Uzbek; command usage errors are in English.

mod format;

#[cfg(test)]
mod tests;

pub use format::*;

/// Return the static string for `key`, or `"???"` for unknown keys.
pub fn t(key: &str) -> &'static str {
    match key {
        "welcome" => {
            "Assalomu alaykum! Tarjimon botga xush kelibsiz.\nTarjima qilish tilini tanlang:"
        }
        "internal_error" => "\u{274c} An error occurred. Please try again.",
        "menu_start" => "Botni ishga tushirish va tilni tanlash",
        "menu_set_language" => "Tarjima tilini o'zgartirish",
        _ => "???",
    }
}
