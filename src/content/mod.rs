//! Content Module
//!
//! Resolves requests to text through the cache, the route table and the
//! texts directory.

mod fetcher;
mod service;
mod source;

pub use fetcher::{fetch, list_texts, ContentAccess, TEXT_PATHS_KEY};
pub use service::ContentService;
pub use source::{FsSource, TextSource};
