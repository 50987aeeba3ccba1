//! Content Fetcher
//!
//! The cache-or-compute pattern: look a key up in the cache, fall back to a
//! producer on a miss and write the produced value back.
//!
//! Two keyspaces use it. File contents are cached under their path as
//! scalars; the directory listing is cached as a set under
//! [`TEXT_PATHS_KEY`]. Neither invalidates the other.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::cache::CacheHandle;
use crate::content::TextSource;
use crate::error::{ContentError, Result};

/// Set key of the cached directory listing.
pub const TEXT_PATHS_KEY: &str = "text-paths";

// == Fetch ==
/// Resolves `key` from the cache, else from `fallback`.
///
/// An absent key returns `Ok(None)` without touching either. A failing
/// fallback is returned as is; a failing write-back is only logged.
pub async fn fetch<F, Fut>(
    cache: &CacheHandle,
    key: Option<&str>,
    fallback: F,
) -> Result<Option<String>>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let Some(key) = key else {
        return Ok(None);
    };

    if let Some(text) = cache.string_get(key).await {
        return Ok(Some(text));
    }

    cache.record_fallback();
    let text = fallback(key.to_string()).await?;
    cache.string_set(key, &text).await;
    Ok(Some(text))
}

// == List Texts ==
/// Filenames under `dir` ending in `extension`, from the cache when it has
/// a non-empty listing.
pub async fn list_texts(
    cache: &CacheHandle,
    source: &dyn TextSource,
    dir: &str,
    extension: &str,
) -> Result<Vec<String>> {
    if let Some(texts) = cache
        .array_get(TEXT_PATHS_KEY)
        .await
        .filter(|texts| !texts.is_empty())
    {
        return Ok(texts);
    }

    cache.record_fallback();
    let texts: Vec<String> = source
        .list_dir(dir)
        .await
        .map_err(|source| ContentError::DiskRead {
            path: dir.to_string(),
            source,
        })?
        .into_iter()
        .filter(|name| name.ends_with(extension))
        .collect();

    debug!(dir, count = texts.len(), "Listed texts");
    for text in &texts {
        cache.array_add(TEXT_PATHS_KEY, text).await;
    }
    Ok(texts)
}

// == Content Access ==
/// Cache-or-disk reads bound to one request's cache handle.
#[derive(Clone)]
pub struct ContentAccess {
    cache: CacheHandle,
    source: Arc<dyn TextSource>,
    texts_dir: String,
    extension: String,
}

impl ContentAccess {
    pub fn new(
        cache: CacheHandle,
        source: Arc<dyn TextSource>,
        texts_dir: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            source,
            texts_dir: texts_dir.into(),
            extension: extension.into(),
        }
    }

    pub fn cache(&self) -> &CacheHandle {
        &self.cache
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Reads the text at `path` through the cache.
    pub async fn fetch(&self, path: &str) -> Result<Option<String>> {
        let source = Arc::clone(&self.source);
        fetch(&self.cache, Some(path), move |path| async move {
            source
                .read_text(&path)
                .await
                .map_err(|source| ContentError::DiskRead { path, source })
        })
        .await
    }

    /// The listing of the texts directory.
    pub async fn list_texts(&self) -> Result<Vec<String>> {
        list_texts(&self.cache, self.source.as_ref(), &self.texts_dir, &self.extension).await
    }

    /// Cache key and disk path of a listed file: `{texts_dir}/{filename}`.
    pub fn text_path(&self, filename: &str) -> String {
        format!("{}/{}", self.texts_dir.trim_end_matches('/'), filename)
    }
}
