// Deterministic text normalization ahead of vectorization.
//
// Mirrors the preprocessing the model was trained with: letters only,
// lowercase, whitespace-split, stopwords removed, re-joined with single
// spaces. Anything that isn't an ASCII letter (digits, punctuation, accented
// characters, emoji) becomes a word boundary.

use std::collections::HashSet;
use std::fmt;

/// Space-joined, lowercase, stopword-free tokens. May be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedTokens(String);

impl NormalizedTokens {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize raw text against a stopword set.
///
/// Stopwords are expected in lowercase; comparison happens after lowercasing.
pub fn normalize(raw: &str, stopwords: &HashSet<String>) -> NormalizedTokens {
    let letters_only: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    let kept: Vec<&str> = letters_only
        .split_whitespace()
        .filter(|token| !stopwords.contains(*token))
        .collect();

    NormalizedTokens(kept.join(" "))
}
