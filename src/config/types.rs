//! Configuration types for bomcheck.

use super::defaults::{
    DEFAULT_CACHE_TTL_HOURS, DEFAULT_CATALOG_SOURCE, DEFAULT_MAX_RETRIES, DEFAULT_RELEASE_MARKER,
    DEFAULT_REMOTE_REPOSITORIES, DEFAULT_TIMEOUT_SECS,
};
use crate::checks::{RelocationMatch, RuleKind};
use crate::error::{BomCheckError, Result};
use crate::model::ExcludeRule;
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// File values are loaded first and CLI flags are merged over them
/// (see [`AppConfig::merge`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Run outcome and dependency exclusion
    pub check: CheckConfig,
    /// Rule toggles and rule parameters
    pub rules: RulesConfig,
    /// Where the list of available BOMs comes from
    pub catalog: CatalogConfig,
    /// Artifact repositories used to resolve BOM and parent descriptors
    pub repositories: RepositoryConfig,
    /// HTTP proxy for remote catalog and repository access
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Fail the run when any violation is found.
    pub const fn fail_on_violation(mut self, fail: bool) -> Self {
        self.config.check.fail_on_violation = fail;
        self
    }

    /// Add a `group:artifact` exclude rule.
    pub fn exclude(mut self, rule: impl Into<String>) -> Self {
        self.config.check.excludes.push(rule.into());
        self
    }

    /// Set the BOM catalog source (file path or URL).
    pub fn catalog_source(mut self, source: impl Into<String>) -> Self {
        self.config.catalog.source = source.into();
        self
    }

    /// Use a relocation table file instead of the bundled one.
    pub fn relocations_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.rules.relocations_file = file;
        self
    }

    /// Set relocation key matching strictness.
    pub const fn relocation_match(mut self, mode: RelocationMatch) -> Self {
        self.config.rules.relocation_match = mode;
        self
    }

    /// Set the local repository root.
    pub fn local_repository(mut self, path: PathBuf) -> Self {
        self.config.repositories.local = Some(path);
        self
    }

    /// Replace the remote repository list.
    pub fn remote_repositories(mut self, urls: Vec<String>) -> Self {
        self.config.repositories.remote = urls;
        self
    }

    /// Never contact remote repositories or catalogs.
    pub const fn offline(mut self, offline: bool) -> Self {
        self.config.repositories.offline = offline;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Route remote traffic through a proxy.
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Run outcome and exclusion settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CheckConfig {
    /// Exit with code 1 when any dependency is non-conformant
    pub fail_on_violation: bool,
    /// Dependencies to skip, as exact `group:artifact` strings
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
}

impl CheckConfig {
    /// Parse the configured exclude strings.
    ///
    /// Normally called after validation, so failures here mean validation was skipped.
    pub fn exclude_rules(&self) -> Result<Vec<ExcludeRule>> {
        self.excludes
            .iter()
            .map(|s| {
                s.parse::<ExcludeRule>()
                    .map_err(|e| BomCheckError::config(format!("check.excludes: {e}")))
            })
            .collect()
    }
}

/// Rule toggles and parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RulesConfig {
    /// Require versions to carry the release marker
    pub release_policy: bool,
    /// Flag dependencies on relocated artifacts
    pub relocation: bool,
    /// Flag explicit versions already managed by an available BOM
    pub managed_version: bool,
    /// Regular expression a conformant version must match
    pub release_marker: String,
    /// How relocation keys are matched against group and artifact ids
    pub relocation_match: RelocationMatch,
    /// Relocation table file (bundled table when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relocations_file: Option<PathBuf>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            release_policy: true,
            relocation: true,
            managed_version: true,
            release_marker: DEFAULT_RELEASE_MARKER.to_string(),
            relocation_match: RelocationMatch::default(),
            relocations_file: None,
        }
    }
}

impl RulesConfig {
    /// Switch one rule off.
    pub fn disable(&mut self, rule: RuleKind) {
        match rule {
            RuleKind::ReleasePolicy => self.release_policy = false,
            RuleKind::Relocation => self.relocation = false,
            RuleKind::ManagedVersion => self.managed_version = false,
        }
    }
}

/// BOM catalog settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CatalogConfig {
    /// Stacks YAML file path or `http(s)://` URL
    pub source: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_CATALOG_SOURCE.to_string(),
        }
    }
}

/// Artifact repository settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Local repository root (`~/.m2/repository` when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<PathBuf>,
    /// Remote repository base URLs, consulted in order after the local one
    pub remote: Vec<String>,
    /// Skip all remote repositories
    pub offline: bool,
    /// Remote request timeout in seconds
    #[schemars(range(min = 1))]
    pub timeout_secs: u64,
    /// Retries for transient remote failures
    pub max_retries: u8,
    /// Descriptor cache directory (platform cache dir when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    /// Cache time-to-live in hours
    pub cache_ttl_hours: u64,
    /// Ignore cached descriptors and refetch
    pub bypass_cache: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            local: None,
            remote: DEFAULT_REMOTE_REPOSITORIES
                .iter()
                .map(ToString::to_string)
                .collect(),
            offline: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            cache_dir: None,
            cache_ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            bypass_cache: false,
        }
    }
}

impl RepositoryConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_hours.saturating_mul(3600))
    }

    /// Effective local repository root.
    #[must_use]
    pub fn local_root(&self) -> Option<PathBuf> {
        self.local
            .clone()
            .or_else(crate::resolver::LocalRepository::default_root)
    }

    /// Effective descriptor cache directory.
    #[must_use]
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.cache_dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join("bomcheck").join("descriptors")))
    }
}

/// HTTP proxy settings, passed through to the HTTP client unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProxyConfig {
    /// Proxy host name
    pub host: String,
    /// Proxy port
    pub port: u16,
    /// Username for proxy authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password for proxy authentication
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
        }
    }

    /// `http://host:port`
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_ttl_saturates() {
        let config = RepositoryConfig {
            cache_ttl_hours: u64::MAX,
            ..RepositoryConfig::default()
        };
        assert_eq!(config.cache_ttl(), Duration::from_secs(u64::MAX));

        let config = RepositoryConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(DEFAULT_CACHE_TTL_HOURS * 3600));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(!config.check.fail_on_violation);
        assert!(config.rules.release_policy);
        assert!(config.rules.relocation);
        assert!(config.rules.managed_version);
        assert_eq!(config.rules.release_marker, DEFAULT_RELEASE_MARKER);
        assert_eq!(config.rules.relocation_match, RelocationMatch::Substring);
        assert_eq!(config.repositories.max_retries, 2);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .fail_on_violation(true)
            .exclude("org.hibernate:hibernate-core")
            .catalog_source("stacks.yaml")
            .offline(true)
            .output_format(ReportFormat::Json)
            .build();
        assert!(config.check.fail_on_violation);
        assert_eq!(config.check.excludes, vec!["org.hibernate:hibernate-core"]);
        assert_eq!(config.catalog.source, "stacks.yaml");
        assert!(config.repositories.offline);
        assert_eq!(config.output.format, ReportFormat::Json);
    }

    #[test]
    fn test_exclude_rules_parse() {
        let config = AppConfig::builder().exclude("g:a").build();
        let rules = config.check.exclude_rules().unwrap();
        assert_eq!(rules, vec![ExcludeRule::new("g", "a")]);

        let bad = AppConfig::builder().exclude("nocolon").build();
        assert!(bad.check.exclude_rules().is_err());
    }

    #[test]
    fn test_yaml_partial_sections() {
        let yaml = "check:\n  fail_on_violation: true\nrules:\n  relocation_match: exact\n";
        let config: AppConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(config.check.fail_on_violation);
        assert_eq!(config.rules.relocation_match, RelocationMatch::Exact);
        assert!(config.rules.managed_version);
        assert_eq!(config.catalog.source, DEFAULT_CATALOG_SOURCE);
    }

    #[test]
    fn test_proxy_password_not_serialized() {
        let mut proxy = ProxyConfig::new("proxy.local", 3128);
        proxy.username = Some("user".to_string());
        proxy.password = Some("secret".to_string());
        let config = AppConfig::builder().proxy(proxy).build();
        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        assert!(yaml.contains("proxy.local"));
        assert!(!yaml.contains("secret"));
    }

    #[test]
    fn test_disable_rule() {
        let mut rules = RulesConfig::default();
        rules.disable(RuleKind::Relocation);
        assert!(rules.release_policy);
        assert!(!rules.relocation);
        assert!(rules.managed_version);
    }
}
