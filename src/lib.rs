//! **Dependency conformance checking for Maven projects.**
//!
//! `bomcheck` inspects the direct dependencies of a `pom.xml` and reports,
//! per dependency, every way it fails to conform:
//!
//! - **Release policy**: the version must carry a release marker such as
//!   `-redhat-1` (configurable regular expression).
//! - **Relocation**: the artifact has moved; the report names the
//!   replacement coordinates from a relocation table.
//! - **Managed version**: the project pins a version that an available BOM
//!   already manages; importing the BOM is preferred.
//!
//! Violations are data. A run produces a [`ConformanceReport`] and a
//! [`Verdict`]; only configuration problems (unreadable relocation table,
//! catalog or project) are errors.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`Coordinate`], [`BomReference`] and [`ExcludeRule`].
//! - **[`pom`]**: POM descriptor parsing and `${...}` interpolation.
//! - **[`resolver`]**: [`DescriptorResolver`] and its local, remote, chained
//!   and in-memory implementations.
//! - **[`catalog`]**: the BOM catalog (JBoss stacks YAML).
//! - **[`bom`]**: resolves catalog BOMs, their parents and imports into a
//!   [`ManagedDependencyIndex`].
//! - **[`relocation`]**: the relocation table.
//! - **[`checks`]**: the rules, exclusion filtering and report aggregation.
//! - **[`pipeline`]**: load → resolve → filter → check in one call.
//! - **[`reports`]**: summary and JSON renderers.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use bomcheck::config::AppConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::builder()
//!         .catalog_source("stacks.yaml")
//!         .offline(true)
//!         .build();
//!     let outcome = bomcheck::pipeline::run(&config, Path::new("pom.xml"))?;
//!
//!     for (dependency, issues) in outcome.report.iter() {
//!         println!("- {dependency}");
//!         for issue in issues {
//!             println!("    - {issue}");
//!         }
//!     }
//!     println!("{}", outcome.verdict);
//!     Ok(())
//! }
//! ```
//!
//! ## Checking Without a Repository
//!
//! Every collaborator is a value, so a check can run entirely in memory:
//!
//! ```
//! use bomcheck::checks::{CheckContext, RuleSet};
//! use bomcheck::config::RulesConfig;
//! use bomcheck::{Coordinate, ManagedDependencyIndex, RelocationTable};
//!
//! let rules = RuleSet::standard(&RulesConfig::default()).unwrap();
//! let table = RelocationTable::default();
//! let index = ManagedDependencyIndex::default();
//! let ctx = CheckContext { relocations: &table, index: &index, declared: &[] };
//!
//! let dep = Coordinate::versioned("org.slf4j", "slf4j-api", "1.7.2-redhat-1");
//! assert!(rules.check(&dep, &ctx).is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! - `remote` (default): remote repositories, remote catalogs and the
//!   descriptor cache. Adds `reqwest` and `sha2`.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools,
    clippy::module_name_repetitions
)]

pub mod bom;
pub mod catalog;
pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod pom;
pub mod project;
pub mod relocation;
pub mod reports;
pub mod resolver;
pub mod utils;

// Re-export main types for convenience
pub use bom::{BomResolution, BomResolver, ManagedDependencyIndex, ResolutionWarning};
pub use catalog::{BomCatalogProvider, CatalogSource, StacksCatalog, StaticCatalog};
pub use checks::{
    ConformanceIssue, ConformanceReport, ConformanceRule, ExcludedDependency, RuleKind, RuleSet,
};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use error::{BomCheckError, ErrorContext, ResolutionError, Result};
pub use model::{ArtifactKey, BomReference, Coordinate, ExcludeRule};
pub use pipeline::{CheckOutcome, Verdict};
pub use pom::Descriptor;
pub use project::{Project, ProjectLoader};
pub use relocation::RelocationTable;
pub use reports::{ReportFormat, ReportGenerator};
pub use resolver::{ChainedResolver, DescriptorResolver, InMemoryResolver, LocalRepository};
