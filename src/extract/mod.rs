// Content extraction on top of browser sessions.

pub mod links;
pub mod node;

pub use links::{enumerate_hyperlinks, HyperlinkSet};
pub use node::extract_node_text;
