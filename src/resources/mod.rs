// Pipeline resources: artifact loading, the load-once cache, and download.

pub mod cache;
pub mod download;
pub mod loader;
