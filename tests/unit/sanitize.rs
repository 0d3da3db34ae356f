use datawrapper_export::output::sanitize::{sanitize, MAX_NAME_LEN};

const SAMPLES: &[&str] = &[
    "GDP growth",
    "Prisons: 2019/20",
    "  . Leading and trailing . ",
    "What?*<>|\"quoted\"",
    "tab\there\nnewline",
    "...",
    "",
    "Ünïcödé – titles ✓",
    "a\\b/c",
];

#[test]
fn test_sanitize_is_idempotent() {
    for sample in SAMPLES {
        let once = sanitize(sample);
        assert_eq!(sanitize(&once), once, "not idempotent for {sample:?}");
    }

    let long = format!("{}. tail", "word ".repeat(80));
    let once = sanitize(&long);
    assert_eq!(sanitize(&once), once);
}

#[test]
fn test_sanitized_names_are_safe() {
    for sample in SAMPLES {
        let name = sanitize(sample);
        assert!(!name.contains(['\\', '/', ':', '*', '?', '"', '<', '>', '|']));
        assert!(!name.chars().any(char::is_control));
        assert!(!name.starts_with(['.', ' ']) && !name.ends_with(['.', ' ']));
        assert!(name.chars().count() <= MAX_NAME_LEN);
    }
}

#[test]
fn test_truncation_counts_characters() {
    let name = sanitize(&"ü".repeat(MAX_NAME_LEN + 10));
    assert_eq!(name.chars().count(), MAX_NAME_LEN);
}
