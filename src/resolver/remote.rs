//! Remote Maven repository over HTTP.

use super::cache::DescriptorCache;
use super::{parse_descriptor, repository_path, DescriptorResolver};
use crate::error::{BomCheckError, ResolutionError, Result};
use crate::model::Coordinate;
use crate::pom::Descriptor;
use crate::utils::http::{build_client, get_text, FetchError, HttpSettings};
use reqwest::blocking::Client;

/// A remote repository such as `https://repo.maven.apache.org/maven2`.
pub struct RemoteRepository {
    base_url: String,
    client: Client,
    max_retries: u8,
    cache: Option<DescriptorCache>,
    bypass_cache: bool,
}

impl RemoteRepository {
    /// Create a repository client for `base_url`.
    pub fn new(base_url: impl Into<String>, settings: &HttpSettings) -> Result<Self> {
        let client = build_client(settings)
            .map_err(|e| BomCheckError::config(format!("cannot create HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            max_retries: settings.max_retries,
            cache: None,
            bypass_cache: false,
        })
    }

    /// Cache fetched descriptors. With `bypass`, cached entries are ignored but still refreshed.
    #[must_use]
    pub fn with_cache(mut self, cache: DescriptorCache, bypass: bool) -> Self {
        self.cache = Some(cache);
        self.bypass_cache = bypass;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the descriptor for `coordinate`.
    pub fn descriptor_url(&self, coordinate: &Coordinate) -> Option<String> {
        repository_path(coordinate).map(|path| format!("{}/{}", self.base_url, path))
    }
}

impl DescriptorResolver for RemoteRepository {
    fn resolve(&self, coordinate: &Coordinate) -> std::result::Result<Descriptor, ResolutionError> {
        let url = self
            .descriptor_url(coordinate)
            .ok_or_else(|| ResolutionError::invalid(coordinate, "coordinate has no version"))?;

        if !self.bypass_cache {
            if let Some(content) = self.cache.as_ref().and_then(|c| c.get(&url)) {
                tracing::debug!("Cache hit for {}", url);
                return parse_descriptor(coordinate, &content);
            }
        }

        tracing::debug!("Fetching {}", url);
        let content = get_text(&self.client, &url, self.max_retries).map_err(|e| match e {
            FetchError::NotFound => ResolutionError::not_found(coordinate),
            FetchError::Failed(message) => ResolutionError::fetch(coordinate, message),
        })?;

        let descriptor = parse_descriptor(coordinate, &content)?;
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(&url, &content) {
                tracing::debug!("Failed to cache {}: {}", url, e);
            }
        }
        Ok(descriptor)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
