use super::*;

#[test]
fn test_all_keys_are_defined() {
    for key in ["welcome", "internal_error", "menu_start", "menu_set_language"] {
        assert_ne!(t(key), "???", "missing string for key '{key}'");
    }
}

#[test]
fn test_unknown_key() {
    assert_eq!(t("no_such_key"), "???");
}

#[test]
fn test_set_language_usage_uses_command() {
    let msg = set_language_usage("/lang", "en");
    assert!(msg.ends_with("Example: /lang en"), "got: {msg}");
}

#[test]
fn test_invalid_language_lists_codes() {
    assert!(invalid_language("uz, en, ru").ends_with("\nuz, en, ru"));
}

#[test]
fn test_translation_prefix() {
    assert_eq!(
        translation("\u{1f1f7}\u{1f1fa}", "Привет"),
        "\u{1f1f7}\u{1f1fa} Tarjima:\nПривет"
    );
}

#[test]
fn test_translation_failed_embeds_detail() {
    let msg = translation_failed("translator error: timed out");
    assert!(msg.contains("translator error: timed out"));
    assert!(msg.contains("Qayta urinib"));
}
