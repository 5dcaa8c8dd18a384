//! Configuration module for bomcheck.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bomcheck::config::AppConfig;
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .fail_on_violation(true)
//!     .exclude("org.hibernate:hibernate-core")
//!     .catalog_source("stacks.yaml")
//!     .build();
//!
//! // Load from file
//! use bomcheck::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.bomcheck.yaml` file in your project root or `~/.config/bomcheck/`:
//!
//! ```yaml
//! check:
//!   fail_on_violation: true
//!   excludes:
//!     - org.hibernate:hibernate-core
//! catalog:
//!   source: ./stacks.yaml
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    DEFAULT_CACHE_TTL_HOURS, DEFAULT_CATALOG_SOURCE, DEFAULT_MAX_RETRIES, DEFAULT_RELEASE_MARKER,
    DEFAULT_REMOTE_REPOSITORIES, DEFAULT_TIMEOUT_SECS,
};
pub use types::{
    AppConfig, AppConfigBuilder, CatalogConfig, CheckConfig, OutputConfig, ProxyConfig,
    RepositoryConfig, RulesConfig,
};
pub(crate) use validation::is_url;
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.bomcheck.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| crate::error::BomCheckError::config(format!("schema serialization: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_sections() {
        let schema = generate_json_schema().unwrap();
        for section in ["check", "rules", "catalog", "repositories", "output"] {
            assert!(schema.contains(section), "missing {section}");
        }
    }
}
