//! Conformance rules and their evaluation.
//!
//! Three independent rules run against every dependency that survives the
//! exclusion filter, always in this order:
//!
//! 1. [`ReleasePolicyRule`]: the version carries the release marker
//! 2. [`RelocationRule`]: the artifact has not been relocated
//! 3. [`ManagedVersionRule`]: an explicit version is not already BOM-managed
//!
//! Violations are data: they are collected into a [`ConformanceReport`] and
//! never returned as errors.

mod exclusion;
mod managed;
mod release;
mod relocation;
mod report;

pub use exclusion::{is_excluded, matching_rule, ExcludedDependency};
pub use managed::ManagedVersionRule;
pub use release::ReleasePolicyRule;
pub use relocation::{RelocationMatch, RelocationRule};
pub use report::{ConformanceAggregator, ConformanceReport};

use crate::bom::ManagedDependencyIndex;
use crate::config::RulesConfig;
use crate::error::Result;
use crate::model::{Coordinate, ExcludeRule};
use crate::relocation::RelocationTable;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which rule produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    ReleasePolicy,
    Relocation,
    ManagedVersion,
}

impl RuleKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReleasePolicy => "release-policy",
            Self::Relocation => "relocation",
            Self::ManagedVersion => "managed-version",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One violation found on one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConformanceIssue {
    pub rule: RuleKind,
    pub message: String,
}

impl ConformanceIssue {
    pub fn new(rule: RuleKind, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConformanceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Read-only inputs shared by all rules during one run.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub relocations: &'a RelocationTable,
    pub index: &'a ManagedDependencyIndex,
    /// The project's own dependency declarations, versions as written
    pub declared: &'a [Coordinate],
}

/// A single conformance check.
pub trait ConformanceRule: Send + Sync {
    /// The kind tag attached to this rule's issues.
    fn kind(&self) -> RuleKind;

    /// Name for logging.
    fn name(&self) -> &str {
        self.kind().name()
    }

    /// Issues for one dependency (possibly none).
    fn check(&self, dependency: &Coordinate, ctx: &CheckContext<'_>) -> Vec<ConformanceIssue>;
}

/// Outcome of evaluating a dependency list.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub report: ConformanceReport,
    pub excluded: Vec<ExcludedDependency>,
    /// Dependencies that went through the rules
    pub checked: usize,
}

/// An ordered set of rules.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn ConformanceRule>>,
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The enabled standard rules in their fixed order.
    pub fn standard(config: &RulesConfig) -> Result<Self> {
        let mut set = Self::new();
        if config.release_policy {
            set = set.with(ReleasePolicyRule::new(&config.release_marker)?);
        }
        if config.relocation {
            set = set.with(RelocationRule::new(config.relocation_match));
        }
        if config.managed_version {
            set = set.with(ManagedVersionRule);
        }
        Ok(set)
    }

    /// Append a rule; it runs after those already present.
    #[must_use]
    pub fn with(mut self, rule: impl ConformanceRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name())
    }

    /// All issues for one dependency, in rule order.
    #[must_use]
    pub fn check(&self, dependency: &Coordinate, ctx: &CheckContext<'_>) -> Vec<ConformanceIssue> {
        self.rules
            .iter()
            .flat_map(|rule| rule.check(dependency, ctx))
            .collect()
    }

    /// Filter out excluded dependencies, then check the rest.
    #[must_use]
    pub fn evaluate(
        &self,
        dependencies: &[Coordinate],
        excludes: &[ExcludeRule],
        ctx: &CheckContext<'_>,
    ) -> Evaluation {
        let mut aggregator = ConformanceAggregator::new();
        let mut excluded = Vec::new();
        let mut checked = 0;

        for dependency in dependencies {
            if let Some(rule) = matching_rule(dependency, excludes) {
                tracing::warn!(
                    "{} will not be checked. Marked as excluded: {}",
                    dependency,
                    rule
                );
                excluded.push(ExcludedDependency {
                    dependency: dependency.clone(),
                    rule: rule.clone(),
                });
                continue;
            }

            checked += 1;
            let issues = self.check(dependency, ctx);
            if !issues.is_empty() {
                tracing::debug!("{}: {} issue(s)", dependency, issues.len());
            }
            aggregator.record_all(dependency, issues);
        }

        Evaluation {
            report: aggregator.into_report(),
            excluded,
            checked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rule_order() {
        let set = RuleSet::standard(&RulesConfig::default()).unwrap();
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["release-policy", "relocation", "managed-version"]);
    }

    #[test]
    fn test_disabled_rules_skipped() {
        let config = RulesConfig {
            release_policy: false,
            managed_version: false,
            ..RulesConfig::default()
        };
        let set = RuleSet::standard(&config).unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["relocation"]);
    }

    #[test]
    fn test_evaluate_excludes_before_checking() {
        let set = RuleSet::standard(&RulesConfig::default()).unwrap();
        let table = RelocationTable::default();
        let index = ManagedDependencyIndex::default();
        let ctx = CheckContext {
            relocations: &table,
            index: &index,
            declared: &[],
        };
        let deps = vec![
            Coordinate::versioned("org.hibernate", "hibernate-core", "4.2.0.Final"),
            Coordinate::versioned("junit", "junit", "4.11"),
        ];
        let excludes = vec![ExcludeRule::new("org.hibernate", "hibernate-core")];

        let evaluation = set.evaluate(&deps, &excludes, &ctx);
        assert_eq!(evaluation.checked, 1);
        assert_eq!(evaluation.excluded.len(), 1);
        assert!(evaluation.report.issues_for(&deps[0]).is_empty());
        assert_eq!(evaluation.report.issues_for(&deps[1]).len(), 1);
    }

    #[test]
    fn test_rule_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&RuleKind::ManagedVersion).unwrap();
        assert_eq!(json, "\"managed-version\"");
    }
}
