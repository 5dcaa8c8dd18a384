//! Check stage: resolve the catalog, then run the rules over the project.

use super::{CheckOutcome, RunInputs, Verdict};
use crate::bom::BomResolver;
use crate::checks::CheckContext;
use crate::project::Project;
use crate::resolver::DescriptorResolver;

/// Resolve every catalog BOM through `resolver` and check `project`.
///
/// Unresolvable BOM lineages end up as warnings on the outcome.
#[must_use]
pub fn check_project(
    project: &Project,
    inputs: &RunInputs,
    resolver: &dyn DescriptorResolver,
    fail_on_violation: bool,
) -> CheckOutcome {
    let resolution = BomResolver::new(resolver).resolve(&inputs.boms);

    let ctx = CheckContext {
        relocations: &inputs.relocations,
        index: &resolution.index,
        declared: &project.declared,
    };
    let evaluation = inputs
        .rules
        .evaluate(&project.dependencies, &inputs.excludes, &ctx);

    let verdict = Verdict::from_report(&evaluation.report, fail_on_violation);
    tracing::info!(
        "{} of {} checked dependencies non-conformant ({} issues), {} excluded: {}",
        evaluation.report.non_conformant_count(),
        evaluation.checked,
        evaluation.report.issue_count(),
        evaluation.excluded.len(),
        verdict
    );

    CheckOutcome {
        project: project.clone(),
        report: evaluation.report,
        excluded: evaluation.excluded,
        resolution_warnings: resolution.warnings,
        catalog_skipped: inputs.catalog_skipped.clone(),
        boms_total: inputs.boms.len(),
        boms_resolved: resolution.resolved,
        checked: evaluation.checked,
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{RuleKind, RuleSet};
    use crate::config::RulesConfig;
    use crate::model::{BomReference, Coordinate};
    use crate::relocation::RelocationTable;
    use crate::resolver::InMemoryResolver;

    #[test]
    fn test_missing_bom_becomes_warning() {
        let resolver = InMemoryResolver::new();
        let mut inputs = RunInputs::new(
            RelocationTable::default(),
            RuleSet::standard(&RulesConfig::default()).unwrap(),
        );
        inputs.boms = vec![BomReference::new(
            Coordinate::versioned("org.jboss.bom", "missing", "1.0"),
            "missing",
        )
        .unwrap()];

        let dep = Coordinate::versioned("org.slf4j", "slf4j-api", "1.7.2-redhat-1");
        let project = Project::new(
            Coordinate::versioned("com.example", "app", "1"),
            vec![dep.clone()],
            vec![dep],
        );

        let outcome = check_project(&project, &inputs, &resolver, true);
        assert_eq!(outcome.verdict, Verdict::Pass);
        assert_eq!(outcome.boms_total, 1);
        assert_eq!(outcome.boms_resolved, 0);
        assert_eq!(outcome.resolution_warnings.len(), 1);
        assert!(outcome.resolution_warnings[0].error.is_not_found());
    }

    #[test]
    fn test_violations_fail_only_when_requested() {
        let resolver = InMemoryResolver::new();
        let inputs = RunInputs::new(
            RelocationTable::default(),
            RuleSet::standard(&RulesConfig::default()).unwrap(),
        );
        let dep = Coordinate::versioned("org.slf4j", "slf4j-api", "1.7.2");
        let project = Project::new(
            Coordinate::versioned("com.example", "app", "1"),
            vec![dep.clone()],
            vec![dep.clone()],
        );

        let outcome = check_project(&project, &inputs, &resolver, false);
        assert_eq!(outcome.verdict, Verdict::Warn);
        assert_eq!(outcome.report.issues_for(&dep)[0].rule, RuleKind::ReleasePolicy);

        let outcome = check_project(&project, &inputs, &resolver, true);
        assert_eq!(outcome.verdict, Verdict::Fail);
    }
}
