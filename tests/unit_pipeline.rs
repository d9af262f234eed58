// Unit tests for the text → label pipeline.
//
// Tests isolated pure pieces: normalize determinism and edge cases, the
// TF-IDF transform, the binary label mapping with stub classifiers, and the
// end-to-end path through the fixture model.

mod support;

use std::collections::HashSet;

use sentiscope::model::tfidf::TfIdfVectorizer;
use sentiscope::model::traits::{Label, Vectorizer};
use sentiscope::text::normalize::normalize;
use sentiscope::text::stopwords::bundled_english;

use support::{fixture_resources, fixture_stopwords, resources_with_code};

// ============================================================
// normalize: determinism and edge cases
// ============================================================

#[test]
fn normalize_is_deterministic() {
    let stops = bundled_english();
    let samples = [
        "This product is absolutely wonderful and works great",
        "Terrible!!! Broke after 2 days :( #fail",
        "",
        "MiXeD CaSe, punctuation... and\ttabs\nnewlines",
        "naïve café — résumé",
    ];
    for sample in samples {
        assert_eq!(normalize(sample, &stops), normalize(sample, &stops));
    }
}

#[test]
fn normalize_collapses_whitespace_runs() {
    let result = normalize("  good\t\tvalue \n\n here ", &HashSet::new());
    assert_eq!(result.as_str(), "good value here");
}

#[test]
fn normalize_stopwords_and_punctuation_only_is_empty() {
    let result = normalize("This, is... the!!! 123", &fixture_stopwords());
    assert!(result.is_empty());
    assert_eq!(result.as_str(), "");
}

#[test]
fn normalize_with_bundled_stopwords_keeps_content_words() {
    let result = normalize(
        "This product is absolutely wonderful and works great",
        &bundled_english(),
    );
    let tokens: Vec<&str> = result.tokens().collect();
    assert!(tokens.contains(&"wonderful"));
    assert!(tokens.contains(&"product"));
    assert!(!tokens.contains(&"this"));
    assert!(!tokens.contains(&"and"));
}

// ============================================================
// TF-IDF transform
// ============================================================

#[test]
fn tfidf_drops_out_of_vocabulary_terms() {
    let v = support::fixture_vectorizer();
    let x = v.transform("zebra quantum wonderful");
    assert_eq!(x.nnz(), 1);
    assert!((x.get(0) - 1.0).abs() < 1e-12, "lone term should be unit length");
}

#[test]
fn tfidf_empty_document_is_all_zero() {
    let v = support::fixture_vectorizer();
    let x = v.transform("");
    assert!(x.is_zero());
    assert_eq!(x.dim(), 6);
}

#[test]
fn tfidf_l2_normalizes_rows() {
    let v = TfIdfVectorizer::from_json(
        r#"{"vocabulary": {"good": 0, "value": 1}, "idf": [1.0, 2.0]}"#,
    )
    .unwrap();
    let x = v.transform("good value");
    let norm: f64 = x.entries().iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    assert!((norm - 1.0).abs() < 1e-12);
    // idf doubles the weight of "value" before normalization
    assert!((x.get(1) / x.get(0) - 2.0).abs() < 1e-12);
}

#[test]
fn tfidf_counts_bigrams_when_configured() {
    let v = TfIdfVectorizer::from_json(
        r#"{
            "vocabulary": {"not": 0, "good": 1, "not good": 2},
            "idf": [1.0, 1.0, 1.0],
            "ngram_range": [1, 2],
            "norm": null
        }"#,
    )
    .unwrap();
    let x = v.transform("not good");
    assert_eq!(x.get(0), 1.0);
    assert_eq!(x.get(1), 1.0);
    assert_eq!(x.get(2), 1.0);
}

#[test]
fn tfidf_sublinear_tf_dampens_repeats() {
    let v = TfIdfVectorizer::from_json(
        r#"{"vocabulary": {"great": 0}, "idf": [1.0], "sublinear_tf": true, "norm": null}"#,
    )
    .unwrap();
    let x = v.transform("great great great");
    assert!((x.get(0) - (1.0 + 3f64.ln())).abs() < 1e-12);
}

// ============================================================
// Label mapping with stub classifiers
// ============================================================

#[test]
fn code_zero_maps_to_negative() {
    let resources = resources_with_code(0);
    assert_eq!(resources.classify("anything at all"), Label::Negative);
}

#[test]
fn nonzero_codes_map_to_positive() {
    for code in [1, 2, 7, -1, i64::MAX] {
        let resources = resources_with_code(code);
        assert_eq!(
            resources.classify("anything at all"),
            Label::Positive,
            "code {code} should map to Positive"
        );
    }
}

#[test]
fn stub_sees_empty_normalized_text_without_failing() {
    let resources = resources_with_code(3);
    let result = resources.classify_detailed("the, and... !!!");
    assert!(result.normalized.is_empty());
    assert_eq!(result.code, 3);
    assert_eq!(result.label, Label::Positive);
}

// ============================================================
// End-to-end through the fixture model
// ============================================================

#[test]
fn wonderful_review_is_positive() {
    let resources = fixture_resources();
    let label = resources.classify("This product is absolutely wonderful and works great");
    assert_eq!(label, Label::Positive);
}

#[test]
fn terrible_review_is_negative() {
    let resources = fixture_resources();
    let label = resources.classify("The service was terrible, and the food was AWFUL.");
    assert_eq!(label, Label::Negative);
}

#[test]
fn stopword_only_text_still_gets_a_label() {
    let resources = fixture_resources();
    let result = resources.classify_detailed("This is the... and it was!");
    assert!(result.normalized.is_empty());
    // Empty vector leaves only the negative bias
    assert_eq!(result.label, Label::Negative);
}

#[test]
fn label_display_matches_card_text() {
    assert_eq!(Label::Positive.to_string(), "Positive");
    assert_eq!(Label::Negative.to_string(), "Negative");
}
