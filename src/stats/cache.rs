use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for dataset download caching
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Get the platform-appropriate cache directory for fantasy-mvp
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("fantasy-mvp/http-cache"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/fantasy-mvp/http-cache",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the HTTP cache directory
pub fn clear_cache(cache_path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// A downloaded document plus the validators needed for a conditional
/// re-fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedDocument {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    pub body: Vec<u8>,
}

impl CachedDocument {
    pub fn is_revalidatable(&self) -> bool {
        self.etag.is_some() || self.last_modified.is_some()
    }
}

/// Look up a cached document by URL. Any read or decode failure is a miss.
pub fn read_cached(cache_path: &Path, url: &str) -> Option<CachedDocument> {
    let bytes = cacache::read_sync(cache_path, url).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Store a document under its URL.
pub fn write_cached(cache_path: &Path, url: &str, document: &CachedDocument) -> Result<()> {
    let serialized = serde_json::to_vec(document).context("Failed to serialize cache entry")?;
    cacache::write_sync(cache_path, url, serialized)
        .with_context(|| format!("Failed to write cache entry for {}", url))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> CachedDocument {
        CachedDocument {
            etag: Some("\"abc123\"".to_string()),
            last_modified: None,
            body: br#"[{"player":"x"}]"#.to_vec(),
        }
    }

    #[test]
    fn test_miss_on_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_cached(dir.path(), "https://example.com/data.json").is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://example.com/data.json";
        write_cached(dir.path(), url, &sample_document()).unwrap();

        let loaded = read_cached(dir.path(), url).unwrap();
        assert_eq!(loaded, sample_document());
        assert!(loaded.is_revalidatable());
        assert!(read_cached(dir.path(), "https://example.com/other.json").is_none());
    }

    #[test]
    fn test_clear_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("http-cache");
        let url = "https://example.com/data.json";
        write_cached(&cache_path, url, &sample_document()).unwrap();

        clear_cache(&cache_path).unwrap();
        assert!(read_cached(&cache_path, url).is_none());
        // Clearing a missing cache is fine
        clear_cache(&cache_path).unwrap();
    }
}
