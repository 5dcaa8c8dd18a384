//! File-based cache for fetched POM descriptors.

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Filesystem-safe cache file name for a descriptor URL.
pub fn cache_filename(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}.pom", hasher.finalize())
}

/// Raw POM text cached on disk with a time-to-live.
#[derive(Debug)]
pub struct DescriptorCache {
    cache_dir: PathBuf,
    ttl: Duration,
}

impl DescriptorCache {
    /// Create a cache, creating the directory if needed.
    pub fn new(cache_dir: PathBuf, ttl: Duration) -> Result<Self> {
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir)?;
        }
        Ok(Self { cache_dir, ttl })
    }

    /// Cached content for `url`, or None if absent or expired.
    pub fn get(&self, url: &str) -> Option<String> {
        let path = self.cache_dir.join(cache_filename(url));
        let metadata = fs::metadata(&path).ok()?;

        let age = metadata.modified().ok()?.elapsed().ok()?;
        if age > self.ttl {
            let _ = fs::remove_file(&path);
            return None;
        }

        fs::read_to_string(&path).ok()
    }

    /// Store content for `url`.
    pub fn set(&self, url: &str, content: &str) -> Result<()> {
        fs::write(self.cache_dir.join(cache_filename(url)), content)?;
        Ok(())
    }
}
