//! Summary report generator for shell output.

use super::{ReportError, ReportFormat, ReportGenerator};
use crate::pipeline::{CheckOutcome, Verdict};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn verdict_line(&self, outcome: &CheckOutcome) -> String {
        let report = &outcome.report;
        let (label, color) = match outcome.verdict {
            Verdict::Pass => ("PASS", "green"),
            Verdict::Warn => ("WARN", "yellow"),
            Verdict::Fail => ("FAIL", "red"),
        };
        let detail = if report.is_empty() {
            "all checked dependencies conform".to_string()
        } else {
            format!(
                "{} in {}",
                plural(report.issue_count(), "issue", "issues"),
                plural(report.non_conformant_count(), "dependency", "dependencies")
            )
        };
        format!(
            "{} {} - {}",
            self.color("Result:", "bold"),
            self.color(label, color),
            detail
        )
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate(&self, outcome: &CheckOutcome) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        lines.push(self.color("Dependency Conformance Report", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
        lines.push(format!(
            "{}  {}",
            self.color("Project:", "cyan"),
            outcome.project.coordinate
        ));
        lines.push(format!(
            "{}  {}, {} excluded",
            self.color("Checked:", "cyan"),
            plural(outcome.checked, "dependency", "dependencies"),
            outcome.excluded.len()
        ));
        lines.push(format!(
            "{}     {}/{} resolved",
            self.color("BOMs:", "cyan"),
            outcome.boms_resolved,
            outcome.boms_total
        ));

        if !outcome.report.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Non-conformant dependencies:", "bold"));
            for (dependency, issues) in outcome.report.iter() {
                lines.push(String::new());
                lines.push(format!("- {}", self.color(&dependency.to_string(), "yellow")));
                for issue in issues {
                    lines.push(format!(
                        "    - {} {}",
                        issue.message,
                        self.color(&format!("[{}]", issue.rule), "dim")
                    ));
                }
            }
        }

        if !outcome.excluded.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Excluded:", "bold"));
            for excluded in &outcome.excluded {
                lines.push(format!(
                    "  - {} {}",
                    excluded.dependency,
                    self.color(&format!("(rule {})", excluded.rule), "dim")
                ));
            }
        }

        let warnings = outcome.warnings();
        if !warnings.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Warnings:", "bold"));
            for warning in &warnings {
                lines.push(format!("  {} {}", self.color("!", "yellow"), warning));
            }
        }

        lines.push(String::new());
        lines.push(self.verdict_line(outcome));

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{ConformanceAggregator, ConformanceIssue, ExcludedDependency, RuleKind};
    use crate::model::{Coordinate, ExcludeRule};
    use crate::project::Project;

    fn outcome() -> CheckOutcome {
        let dep = Coordinate::versioned("org.hibernate", "hibernate-core", "4.2.0.Final");
        let junit = Coordinate::versioned("junit", "junit", "4.11");
        let mut aggregator = ConformanceAggregator::new();
        aggregator.record(
            &dep,
            ConformanceIssue::new(RuleKind::ReleasePolicy, "This dependency isn't a Red Hat release"),
        );

        let mut project = Project::new(
            Coordinate::versioned("com.example", "app", "1"),
            vec![dep.clone(), junit.clone()],
            vec![dep],
        );
        project.warnings.push("Parent POM unavailable".to_string());

        CheckOutcome {
            project,
            report: aggregator.into_report(),
            excluded: vec![ExcludedDependency {
                dependency: junit,
                rule: ExcludeRule::new("junit", "junit"),
            }],
            resolution_warnings: Vec::new(),
            catalog_skipped: Vec::new(),
            boms_total: 2,
            boms_resolved: 2,
            checked: 1,
            verdict: Verdict::Fail,
        }
    }

    #[test]
    fn test_summary_layout() {
        let text = SummaryReporter::new().no_color().generate(&outcome()).unwrap();
        assert!(text.starts_with("Dependency Conformance Report"));
        assert!(text.contains("Project:  com.example:app:1"));
        assert!(text.contains("Checked:  1 dependency, 1 excluded"));
        assert!(text.contains("- org.hibernate:hibernate-core:4.2.0.Final"));
        assert!(text.contains("    - This dependency isn't a Red Hat release [release-policy]"));
        assert!(text.contains("  - junit:junit:4.11 (rule junit:junit)"));
        assert!(text.contains("  ! Parent POM unavailable"));
        assert!(text.ends_with("Result: FAIL - 1 issue in 1 dependency"));
    }

    #[test]
    fn test_no_color_has_no_escapes() {
        let text = SummaryReporter::new().no_color().generate(&outcome()).unwrap();
        assert!(!text.contains('\x1b'));
        let colored = SummaryReporter::new().generate(&outcome()).unwrap();
        assert!(colored.contains('\x1b'));
    }
}
