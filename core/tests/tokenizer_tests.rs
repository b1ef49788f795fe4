use sift_core::tokenizer::normalize;

#[test]
fn it_normalizes_and_stems() {
    let words = normalize("Running Runners RUN! The café's menu.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // Unicode normalization: a decomposed accent composes to the same term
    assert_eq!(normalize("cafe\u{301}"), normalize("café"));
}

#[test]
fn it_filters_stopwords() {
    let words = normalize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words.len(), 5);
}

#[test]
fn compatibility_forms_fold_together() {
    // fullwidth letters and the "ﬁ" ligature are NFKC-equivalent to ASCII
    assert_eq!(normalize("ＲＵＳＴ ﬁles"), normalize("rust files"));
}
