//! Format helpers for strings with interpolation.

/// Usage hint for a set-language command without an argument.
pub fn set_language_usage(command: &str, example_code: &str) -> String {
    format!("\u{26a0}\u{fe0f} Please enter a language code!\nExample: {command} {example_code}")
}

/// Rejection of a code that is not in the catalog.
pub fn invalid_language(codes: &str) -> String {
    format!("\u{274c} Invalid language code! Supported languages:\n{codes}")
}

/// Confirmation for the typed set-language command.
pub fn language_changed(name: &str) -> String {
    format!("\u{2705} Translation language changed to {name}!")
}

/// Confirmation for a keyboard choice. `label` is the button text.
pub fn language_chosen(label: &str) -> String {
    format!("Tarjima qilish tili {label} o'zgartirildi")
}

/// Successful translation, prefixed with the target glyph.
pub fn translation(flag: &str, text: &str) -> String {
    format!("{flag} Tarjima:\n{text}")
}

/// Translation failure notice with the error detail.
pub fn translation_failed(detail: &str) -> String {
    format!("Xato yuz berdi: {detail}\nQayta urinib ko'ring.")
}
