// Text preprocessing: turns raw review/post text into model-ready tokens.

pub mod normalize;
pub mod stopwords;
