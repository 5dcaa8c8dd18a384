//! Per-dependency issue collection.

use super::ConformanceIssue;
use crate::model::Coordinate;
use indexmap::IndexMap;

/// Issues per non-conformant dependency, in the order dependencies were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConformanceReport {
    issues: IndexMap<Coordinate, Vec<ConformanceIssue>>,
}

impl ConformanceReport {
    /// Issues recorded for `dependency` (empty when conformant).
    #[must_use]
    pub fn issues_for(&self, dependency: &Coordinate) -> &[ConformanceIssue] {
        self.issues
            .get(dependency)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &[ConformanceIssue])> {
        self.issues.iter().map(|(d, i)| (d, i.as_slice()))
    }

    /// Total issues across all dependencies.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.issues.values().map(Vec::len).sum()
    }

    /// Number of dependencies with at least one issue.
    #[must_use]
    pub fn non_conformant_count(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Accumulates issues while rules run.
///
/// Within one dependency, issues keep the order they were recorded in.
#[derive(Debug, Default)]
pub struct ConformanceAggregator {
    report: ConformanceReport,
}

impl ConformanceAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, dependency: &Coordinate, issue: ConformanceIssue) {
        self.report
            .issues
            .entry(dependency.clone())
            .or_default()
            .push(issue);
    }

    pub fn record_all(
        &mut self,
        dependency: &Coordinate,
        issues: impl IntoIterator<Item = ConformanceIssue>,
    ) {
        for issue in issues {
            self.record(dependency, issue);
        }
    }

    #[must_use]
    pub fn has_violations(&self) -> bool {
        !self.report.is_empty()
    }

    #[must_use]
    pub const fn report(&self) -> &ConformanceReport {
        &self.report
    }

    #[must_use]
    pub fn into_report(self) -> ConformanceReport {
        self.report
    }
}
