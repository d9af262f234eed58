// Sentiscope: sentiment classification for reviews, web pages and posts
//
// This is the library root. Text goes through normalization and a frozen
// TF-IDF + linear model; pages are fetched through a headless browser whose
// lifetime is scoped to a single request.

pub mod analyzer;
pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod output;
pub mod resources;
pub mod text;
