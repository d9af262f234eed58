// Frozen sentiment model: vectorizer + classifier behind swappable traits.
//
// The default artifacts are a TF-IDF vectorizer and a linear classifier
// exported to JSON. Anything implementing the traits can stand in for them.

pub mod linear;
pub mod pipeline;
pub mod tfidf;
pub mod traits;
