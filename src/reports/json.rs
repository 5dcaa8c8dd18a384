//! JSON report generator.

use super::{ReportError, ReportFormat, ReportGenerator};
use crate::checks::{ConformanceIssue, ExcludedDependency};
use crate::model::Coordinate;
use crate::pipeline::{CheckOutcome, Verdict};
use chrono::Utc;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, outcome: &CheckOutcome) -> Result<String, ReportError> {
        let report = JsonConformanceReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: env!("CARGO_PKG_NAME").to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                generated_at: Utc::now().to_rfc3339(),
                project: &outcome.project.coordinate,
            },
            summary: JsonSummary {
                verdict: outcome.verdict,
                dependencies_checked: outcome.checked,
                dependencies_excluded: outcome.excluded.len(),
                non_conformant: outcome.report.non_conformant_count(),
                issues: outcome.report.issue_count(),
                boms_total: outcome.boms_total,
                boms_resolved: outcome.boms_resolved,
            },
            dependencies: outcome
                .report
                .iter()
                .map(|(dependency, issues)| JsonDependency { dependency, issues })
                .collect(),
            excluded: &outcome.excluded,
            warnings: outcome.warnings(),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        json.map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

// JSON structures

#[derive(Serialize)]
struct JsonConformanceReport<'a> {
    metadata: JsonReportMetadata<'a>,
    summary: JsonSummary,
    dependencies: Vec<JsonDependency<'a>>,
    excluded: &'a [ExcludedDependency],
    warnings: Vec<String>,
}

#[derive(Serialize)]
struct JsonReportMetadata<'a> {
    tool: ToolInfo,
    generated_at: String,
    project: &'a Coordinate,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}

#[derive(Serialize)]
struct JsonSummary {
    verdict: Verdict,
    dependencies_checked: usize,
    dependencies_excluded: usize,
    non_conformant: usize,
    issues: usize,
    boms_total: usize,
    boms_resolved: usize,
}

#[derive(Serialize)]
struct JsonDependency<'a> {
    dependency: &'a Coordinate,
    issues: &'a [ConformanceIssue],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{ConformanceAggregator, ConformanceReport, RuleKind};
    use crate::project::Project;

    fn outcome(report: ConformanceReport, verdict: Verdict) -> CheckOutcome {
        CheckOutcome {
            project: Project::new(Coordinate::versioned("com.example", "app", "1"), Vec::new(), Vec::new()),
            report,
            excluded: Vec::new(),
            resolution_warnings: Vec::new(),
            catalog_skipped: vec!["Catalog entry 'x' lists no versions; skipped".to_string()],
            boms_total: 1,
            boms_resolved: 1,
            checked: 1,
            verdict,
        }
    }

    #[test]
    fn test_json_structure() {
        let dep = Coordinate::versioned("org.hibernate", "hibernate-core", "4.2.0.Final");
        let mut aggregator = ConformanceAggregator::new();
        aggregator.record(&dep, ConformanceIssue::new(RuleKind::ManagedVersion, "managed"));

        let json = JsonReporter::new()
            .generate(&outcome(aggregator.into_report(), Verdict::Warn))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["verdict"], "warn");
        assert_eq!(value["summary"]["issues"], 1);
        assert_eq!(value["metadata"]["project"]["artifact"], "app");
        assert_eq!(value["dependencies"][0]["dependency"]["group"], "org.hibernate");
        assert_eq!(value["dependencies"][0]["issues"][0]["rule"], "managed-version");
        assert_eq!(value["warnings"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_compact_output() {
        let json = JsonReporter::new()
            .pretty(false)
            .generate(&outcome(ConformanceReport::default(), Verdict::Pass))
            .unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"verdict\":\"pass\""));
    }
}
