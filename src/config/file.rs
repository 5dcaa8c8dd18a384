//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::defaults::{
    DEFAULT_CACHE_TTL_HOURS, DEFAULT_CATALOG_SOURCE, DEFAULT_MAX_RETRIES, DEFAULT_RELEASE_MARKER,
    DEFAULT_TIMEOUT_SECS,
};
use super::types::{AppConfig, RepositoryConfig};
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".bomcheck.yaml",
    ".bomcheck.yml",
    "bomcheck.yaml",
    "bomcheck.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/bomcheck/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(path) =
        dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("bomcheck")))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml_ng::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml_ng::Error> for ConfigFileError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml_ng::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults override, so a CLI config
    /// built from defaults plus flags can be layered over file config.
    pub fn merge(&mut self, other: &Self) {
        // Check config
        if other.check.fail_on_violation {
            self.check.fail_on_violation = true;
        }
        for exclude in &other.check.excludes {
            if !self.check.excludes.contains(exclude) {
                self.check.excludes.push(exclude.clone());
            }
        }

        // Rules config (toggles can only be switched off)
        if !other.rules.release_policy {
            self.rules.release_policy = false;
        }
        if !other.rules.relocation {
            self.rules.relocation = false;
        }
        if !other.rules.managed_version {
            self.rules.managed_version = false;
        }
        if other.rules.release_marker != DEFAULT_RELEASE_MARKER {
            self.rules.release_marker.clone_from(&other.rules.release_marker);
        }
        if other.rules.relocation_match != crate::checks::RelocationMatch::default() {
            self.rules.relocation_match = other.rules.relocation_match;
        }
        if other.rules.relocations_file.is_some() {
            self.rules.relocations_file.clone_from(&other.rules.relocations_file);
        }

        // Catalog config
        if other.catalog.source != DEFAULT_CATALOG_SOURCE {
            self.catalog.source.clone_from(&other.catalog.source);
        }

        // Repository config
        let repos = &other.repositories;
        if repos.local.is_some() {
            self.repositories.local.clone_from(&repos.local);
        }
        if repos.remote != RepositoryConfig::default().remote {
            self.repositories.remote.clone_from(&repos.remote);
        }
        if repos.offline {
            self.repositories.offline = true;
        }
        if repos.timeout_secs != DEFAULT_TIMEOUT_SECS {
            self.repositories.timeout_secs = repos.timeout_secs;
        }
        if repos.max_retries != DEFAULT_MAX_RETRIES {
            self.repositories.max_retries = repos.max_retries;
        }
        if repos.cache_dir.is_some() {
            self.repositories.cache_dir.clone_from(&repos.cache_dir);
        }
        if repos.cache_ttl_hours != DEFAULT_CACHE_TTL_HOURS {
            self.repositories.cache_ttl_hours = repos.cache_ttl_hours;
        }
        if repos.bypass_cache {
            self.repositories.bypass_cache = true;
        }

        // Proxy config
        if other.proxy.is_some() {
            self.proxy.clone_from(&other.proxy);
        }

        // Output config - only override if explicitly set
        if other.output.format != crate::reports::ReportFormat::default() {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# bomcheck configuration
# Place this file at .bomcheck.yaml in your project root or ~/.config/bomcheck/

{}
",
        serde_yaml_ng::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# bomcheck configuration file
# ============================
#
# Place it at:
#   - .bomcheck.yaml in your project root
#   - ~/.config/bomcheck/bomcheck.yaml for global config
#
# CLI arguments always override file settings.

check:
  # Exit with code 1 when any dependency is non-conformant
  fail_on_violation: false
  # Dependencies that are never checked (exact groupId:artifactId)
  excludes: []
  #  - org.hibernate:hibernate-core

rules:
  release_policy: true
  relocation: true
  managed_version: true
  # Regular expression a conformant version must match
  release_marker: '-redhat-[0-9]+$'
  # substring or exact
  relocation_match: substring
  # Replacement relocation table (bundled table when omitted)
  # relocations_file: ./relocations.properties

catalog:
  # Stacks YAML file path or URL
  source: https://raw.github.com/jboss-jdf/jdf-stack/1.0.0.Final/stacks.yaml

repositories:
  # local: ~/.m2/repository
  remote:
    - https://maven.repository.redhat.com/ga
    - https://repo.maven.apache.org/maven2
  offline: false
  timeout_secs: 30
  max_retries: 2
  # cache_dir: ~/.cache/bomcheck/descriptors
  cache_ttl_hours: 24
  bypass_cache: false

# proxy:
#   host: proxy.example.com
#   port: 3128
#   username: user
#   password: secret

output:
  # summary or json
  format: summary
  # file: bomcheck-report.json
  no_color: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
