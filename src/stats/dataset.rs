use super::cache::{self, CacheConfig, CachedDocument};
use super::types::PlayerSeason;
use crate::filter::LATEST_SEASON;
use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderName, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest::StatusCode;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// The loaded, immutable season list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<PlayerSeason>,
    reference_year: u16,
}

impl Dataset {
    pub fn new(records: Vec<PlayerSeason>) -> Self {
        let reference_year = records
            .iter()
            .map(|r| r.year)
            .max()
            .unwrap_or(LATEST_SEASON);
        Self {
            records,
            reference_year,
        }
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let records: Vec<PlayerSeason> =
            serde_json::from_slice(bytes).context("Failed to parse dataset JSON")?;
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[PlayerSeason] {
        &self.records
    }

    /// Newest season present; anchors relative year filters.
    pub fn reference_year(&self) -> u16 {
        self.reference_year
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Where the dataset JSON lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(expand_home(trimmed))
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::File(default_data_path())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Default dataset location (~/.local/share/fantasy-mvp/fantasy_data.json on Linux)
pub fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("fantasy-mvp").join("fantasy_data.json"))
        .unwrap_or_else(|| PathBuf::from("fantasy_data.json"))
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Load the dataset once. This is the only suspension point in the app.
pub async fn load_dataset(source: &DataSource, cache_config: &CacheConfig) -> Result<Dataset> {
    let bytes = match source {
        DataSource::File(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read dataset at {}", path.display()))?,
        DataSource::Url(url) => fetch_document(url, cache_config).await?,
    };

    let dataset = Dataset::from_json_slice(&bytes)
        .with_context(|| format!("Failed to load data from {}", source))?;
    info!(
        "Loaded {} player-seasons from {} (reference year {})",
        dataset.len(),
        source,
        dataset.reference_year()
    );
    Ok(dataset)
}

/// GET a document, revalidating against the disk cache when one is present.
async fn fetch_document(url: &str, cache_config: &CacheConfig) -> Result<Vec<u8>> {
    let cache_path = cache::get_cache_path();
    let cached = if cache_config.enabled {
        cache::read_cached(&cache_path, url)
    } else {
        None
    };

    let client = reqwest::Client::builder()
        .user_agent(concat!("fantasy-mvp/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    let mut request = client.get(url);
    if let Some(doc) = &cached {
        if let Some(etag) = &doc.etag {
            request = request.header(IF_NONE_MATCH, etag.as_str());
        }
        if let Some(last_modified) = &doc.last_modified {
            request = request.header(IF_MODIFIED_SINCE, last_modified.as_str());
        }
    }

    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;
    let status = response.status();

    if status == StatusCode::NOT_MODIFIED {
        if let Some(doc) = cached {
            debug!("Dataset not modified, using cached copy ({} bytes)", doc.body.len());
            return Ok(doc.body);
        }
        bail!("{} returned 304 Not Modified but nothing is cached", url);
    }
    if !status.is_success() {
        bail!("Failed to load data: {} returned {}", url, status);
    }

    let header = |name: HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let etag = header(ETAG);
    let last_modified = header(LAST_MODIFIED);

    let body = response
        .bytes()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))?
        .to_vec();

    if cache_config.enabled {
        let document = CachedDocument {
            etag,
            last_modified,
            body,
        };
        if document.is_revalidatable() {
            // Don't fail the load over a cache write
            if let Err(e) = cache::write_cached(&cache_path, url, &document) {
                warn!("{:#}", e);
            }
        }
        return Ok(document.body);
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Position;

    #[test]
    fn test_reference_year_is_newest_season() {
        let dataset = Dataset::new(vec![
            PlayerSeason::empty("A", Position::QB, 1999),
            PlayerSeason::empty("B", Position::QB, 2021),
            PlayerSeason::empty("C", Position::QB, 1975),
        ]);
        assert_eq!(dataset.reference_year(), 2021);
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn test_empty_dataset_falls_back_to_latest_season() {
        let dataset = Dataset::new(vec![]);
        assert!(dataset.is_empty());
        assert_eq!(dataset.reference_year(), LATEST_SEASON);
    }

    #[test]
    fn test_from_json_slice_rejects_malformed() {
        assert!(Dataset::from_json_slice(b"[{\"player\": 3}]").is_err());
        assert!(Dataset::from_json_slice(b"not json").is_err());
        assert!(Dataset::from_json_slice(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.com/d.json"),
            DataSource::Url("https://example.com/d.json".to_string())
        );
        assert_eq!(
            DataSource::parse("data/fantasy_data.json"),
            DataSource::File(PathBuf::from("data/fantasy_data.json"))
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fantasy_data.json");
        let records = vec![PlayerSeason::empty("A", Position::WR, 2010)];
        std::fs::write(&path, serde_json::to_vec(&records).unwrap()).unwrap();

        let dataset = load_dataset(&DataSource::File(path), &CacheConfig::default())
            .await
            .unwrap();
        assert_eq!(dataset.records(), records.as_slice());
        assert_eq!(dataset.reference_year(), 2010);
    }

    #[tokio::test]
    async fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::File(dir.path().join("missing.json"));
        let err = load_dataset(&source, &CacheConfig::default()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read dataset"));
    }
}
