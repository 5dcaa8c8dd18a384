//! Pipeline orchestration for conformance runs.
//!
//! A run is load → resolve → filter → check → report. Every stage takes
//! explicit inputs and returns a value; nothing is shared between runs.

mod check_stage;
mod load;
mod output;

pub use check_stage::check_project;
pub use load::{build_resolver, load_inputs, RunInputs};
pub use output::{should_use_color, write_output, OutputTarget};

use crate::bom::ResolutionWarning;
use crate::checks::{ConformanceReport, ExcludedDependency};
use crate::config::{AppConfig, Validatable};
use crate::error::{BomCheckError, Result};
use crate::project::{Project, ProjectLoader};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - no violations (or violations without --fail-on-violation)
    pub const SUCCESS: i32 = 0;
    /// Violations were found and --fail-on-violation is set
    pub const VIOLATIONS: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// No violations
    Pass,
    /// Violations reported, run still succeeds
    Warn,
    /// Violations reported and the run fails
    Fail,
}

impl Verdict {
    #[must_use]
    pub fn from_report(report: &ConformanceReport, fail_on_violation: bool) -> Self {
        if report.is_empty() {
            Self::Pass
        } else if fail_on_violation {
            Self::Fail
        } else {
            Self::Warn
        }
    }

    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Pass | Self::Warn => exit_codes::SUCCESS,
            Self::Fail => exit_codes::VIOLATIONS,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Warn => write!(f, "WARN"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Everything a report needs from one run.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub project: Project,
    pub report: ConformanceReport,
    pub excluded: Vec<ExcludedDependency>,
    /// Catalog lineages that could not be resolved
    pub resolution_warnings: Vec<ResolutionWarning>,
    /// Catalog entries ignored while reading the catalog
    pub catalog_skipped: Vec<String>,
    pub boms_total: usize,
    pub boms_resolved: usize,
    /// Dependencies that went through the rules
    pub checked: usize,
    pub verdict: Verdict,
}

impl CheckOutcome {
    /// All non-fatal diagnostics in display order.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.project
            .warnings
            .iter()
            .cloned()
            .chain(self.catalog_skipped.iter().cloned())
            .chain(self.resolution_warnings.iter().map(ToString::to_string))
            .collect()
    }

    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }
}

/// Run a full check of the project at `pom_path`.
///
/// Fails only on configuration-fatal problems: invalid settings, an
/// unreadable relocation table, catalog or project POM.
pub fn run(config: &AppConfig, pom_path: &Path) -> Result<CheckOutcome> {
    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(BomCheckError::validation(messages.join("; ")));
    }

    let inputs = load_inputs(config)?;
    let resolver = build_resolver(config)?;
    let project = ProjectLoader::new(&resolver).load(pom_path)?;
    tracing::info!(
        "Checking {} ({} dependencies) against {} rule(s)",
        project.coordinate,
        project.dependencies.len(),
        inputs.rules.len()
    );

    Ok(check_project(
        &project,
        &inputs,
        &resolver,
        config.check.fail_on_violation,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{ConformanceAggregator, ConformanceIssue, RuleKind};
    use crate::model::Coordinate;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::VIOLATIONS, 1);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_verdict_from_report() {
        let empty = ConformanceReport::default();
        assert_eq!(Verdict::from_report(&empty, true), Verdict::Pass);

        let mut aggregator = ConformanceAggregator::new();
        aggregator.record(
            &Coordinate::versioned("g", "a", "1"),
            ConformanceIssue::new(RuleKind::ReleasePolicy, "x"),
        );
        let report = aggregator.into_report();
        assert_eq!(Verdict::from_report(&report, false), Verdict::Warn);
        assert_eq!(Verdict::from_report(&report, true), Verdict::Fail);
        assert_eq!(Verdict::Warn.exit_code(), exit_codes::SUCCESS);
        assert_eq!(Verdict::Fail.exit_code(), exit_codes::VIOLATIONS);
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let config = AppConfig::builder().exclude("nocolon").build();
        let err = run(&config, Path::new("pom.xml")).unwrap_err();
        assert!(err.to_string().contains("nocolon"));
    }
}
