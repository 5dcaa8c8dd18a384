//! Configuration validation for bomcheck.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{
    AppConfig, CatalogConfig, CheckConfig, OutputConfig, ProxyConfig, RepositoryConfig,
    RulesConfig,
};
use crate::model::ExcludeRule;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Whether a catalog source or repository entry is an HTTP(S) URL.
pub(crate) fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.check.validate());
        errors.extend(self.rules.validate());
        errors.extend(self.catalog.validate());
        errors.extend(self.repositories.validate());
        errors.extend(self.output.validate());

        if let Some(ref proxy) = self.proxy {
            errors.extend(proxy.validate());
        }

        if self.repositories.offline && is_url(&self.catalog.source) {
            errors.push(ConfigError::new(
                "catalog.source",
                format!(
                    "Remote catalog '{}' cannot be fetched in offline mode; use a local stacks file",
                    self.catalog.source
                ),
            ));
        }

        errors
    }
}

impl Validatable for CheckConfig {
    fn validate(&self) -> Vec<ConfigError> {
        self.excludes
            .iter()
            .enumerate()
            .filter_map(|(i, raw)| {
                raw.parse::<ExcludeRule>()
                    .err()
                    .map(|e| ConfigError::new(format!("check.excludes[{i}]"), e.to_string()))
            })
            .collect()
    }
}

impl Validatable for RulesConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = regex::Regex::new(&self.release_marker) {
            errors.push(ConfigError::new(
                "rules.release_marker",
                format!("Invalid regular expression '{}': {e}", self.release_marker),
            ));
        }

        if let Some(ref file) = self.relocations_file {
            if !file.exists() {
                errors.push(ConfigError::new(
                    "rules.relocations_file",
                    format!("Relocation table not found: {}", file.display()),
                ));
            }
        }

        errors
    }
}

impl Validatable for CatalogConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let source = self.source.trim();

        if source.is_empty() {
            errors.push(ConfigError::new("catalog.source", "Catalog source is empty"));
        } else if !is_url(source) && !std::path::Path::new(source).exists() {
            errors.push(ConfigError::new(
                "catalog.source",
                format!("Catalog file not found: {source}"),
            ));
        }

        errors
    }
}

impl Validatable for RepositoryConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "repositories.timeout_secs",
                "Timeout must be at least 1 second",
            ));
        }

        for (i, url) in self.remote.iter().enumerate() {
            if !is_url(url) {
                errors.push(ConfigError::new(
                    format!("repositories.remote[{i}]"),
                    format!("Repository '{url}' must be an http:// or https:// URL"),
                ));
            }
        }

        errors
    }
}

impl Validatable for ProxyConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.host.trim().is_empty() {
            errors.push(ConfigError::new("proxy.host", "Proxy host is empty"));
        }
        if self.port == 0 {
            errors.push(ConfigError::new("proxy.port", "Proxy port must be non-zero"));
        }
        if self.password.is_some() && self.username.is_none() {
            errors.push(ConfigError::new(
                "proxy.password",
                "Proxy password given without a username",
            ));
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        errors
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_malformed_excludes_rejected() {
        let config = CheckConfig {
            fail_on_violation: false,
            excludes: vec![
                "org.hibernate:hibernate-core".to_string(),
                "nocolon".to_string(),
                ":artifact".to_string(),
                "group:".to_string(),
            ],
        };
        let errors = config.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["check.excludes[1]", "check.excludes[2]", "check.excludes[3]"]
        );
    }

    #[test]
    fn test_release_marker_must_compile() {
        let config = RulesConfig {
            release_marker: "-redhat-[0-9+$".to_string(),
            ..RulesConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "rules.release_marker");
    }

    #[test]
    fn test_missing_catalog_file() {
        let config = CatalogConfig {
            source: "/nonexistent/stacks.yaml".to_string(),
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_offline_with_remote_catalog() {
        let config = AppConfig::builder().offline(true).build();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "catalog.source"));
    }

    #[test]
    fn test_repository_validation() {
        let config = RepositoryConfig {
            timeout_secs: 0,
            remote: vec!["ftp://mirror".to_string()],
            ..RepositoryConfig::default()
        };
        assert_eq!(config.validate().len(), 2);
    }

    #[test]
    fn test_proxy_validation() {
        assert!(ProxyConfig::new("proxy.local", 3128).is_valid());
        assert!(!ProxyConfig::new("", 0).is_valid());

        let mut orphan_password = ProxyConfig::new("proxy.local", 3128);
        orphan_password.password = Some("secret".to_string());
        assert!(!orphan_password.is_valid());
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::new("test_field", "test error message");
        assert_eq!(error.to_string(), "test_field: test error message");
    }
}
