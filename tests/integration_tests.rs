//! Integration tests for bomcheck
//!
//! These tests verify end-to-end behavior of BOM resolution, the
//! conformance rules and their aggregation, using in-memory descriptors.

use bomcheck::{
    bom::BomResolver,
    catalog::StaticCatalog,
    checks::{CheckContext, RuleKind, RuleSet},
    config::RulesConfig,
    error::ResolutionErrorKind,
    model::{ArtifactKey, BomReference, Coordinate, ExcludeRule},
    pipeline::{check_project, exit_codes, RunInputs, Verdict},
    project::Project,
    relocation::RelocationTable,
    resolver::InMemoryResolver,
    ManagedDependencyIndex,
};

// ============================================================================
// Test Fixtures
// ============================================================================

fn pom(coordinate: &str, parent: Option<&str>, managed: &[&str]) -> String {
    let coordinate: Coordinate = coordinate.parse().unwrap();
    let parent = parent.map_or_else(String::new, |p| {
        let p: Coordinate = p.parse().unwrap();
        format!(
            "<parent><groupId>{}</groupId><artifactId>{}</artifactId><version>{}</version></parent>",
            p.group,
            p.artifact,
            p.version().unwrap()
        )
    });
    let managed: String = managed
        .iter()
        .map(|m| {
            let m: Coordinate = m.parse().unwrap();
            format!(
                "<dependency><groupId>{}</groupId><artifactId>{}</artifactId><version>{}</version></dependency>",
                m.group,
                m.artifact,
                m.version().unwrap()
            )
        })
        .collect();
    format!(
        "<project>{parent}<groupId>{}</groupId><artifactId>{}</artifactId><version>{}</version>\
         <packaging>pom</packaging>\
         <dependencyManagement><dependencies>{managed}</dependencies></dependencyManagement></project>",
        coordinate.group,
        coordinate.artifact,
        coordinate.version().unwrap()
    )
}

fn bom(coordinate: &str) -> BomReference {
    BomReference::new(coordinate.parse().unwrap(), "test").unwrap()
}

fn hibernate() -> Coordinate {
    Coordinate::versioned("org.hibernate", "hibernate-core", "4.2.0.Final")
}

fn enterprise_resolver() -> InMemoryResolver {
    let mut resolver = InMemoryResolver::new();
    resolver
        .insert_pom(&pom(
            "org.jboss.bom:enterprise:1.0",
            None,
            &["org.hibernate:hibernate-core:4.2.0.Final-redhat-1"],
        ))
        .unwrap();
    resolver
}

fn inputs(excludes: Vec<ExcludeRule>) -> RunInputs {
    let catalog = StaticCatalog::new(vec![bom("org.jboss.bom:enterprise:1.0")]);
    RunInputs::new(
        RelocationTable::bundled().unwrap(),
        RuleSet::standard(&RulesConfig::default()).unwrap(),
    )
    .with_catalog(&catalog)
    .unwrap()
    .with_excludes(excludes)
}

fn project(dependency: Coordinate) -> Project {
    Project::new(
        Coordinate::versioned("com.example", "app", "1.0"),
        vec![dependency.clone()],
        vec![dependency],
    )
}

// ============================================================================
// End-to-end checks
// ============================================================================

mod end_to_end {
    use super::*;

    #[test]
    fn test_explicit_unreleased_managed_dependency() {
        let resolver = enterprise_resolver();
        let outcome = check_project(&project(hibernate()), &inputs(Vec::new()), &resolver, true);

        let issues = outcome.report.issues_for(&hibernate());
        let kinds: Vec<RuleKind> = issues.iter().map(|i| i.rule).collect();
        assert_eq!(kinds, vec![RuleKind::ReleasePolicy, RuleKind::ManagedVersion]);
        assert!(issues[1].message.contains("org.jboss.bom:enterprise:1.0"));
        assert_eq!(outcome.verdict, Verdict::Fail);
        assert_eq!(outcome.exit_code(), exit_codes::VIOLATIONS);
    }

    #[test]
    fn test_without_fail_on_violation_run_succeeds() {
        let resolver = enterprise_resolver();
        let outcome = check_project(&project(hibernate()), &inputs(Vec::new()), &resolver, false);
        assert_eq!(outcome.report.issue_count(), 2);
        assert_eq!(outcome.verdict, Verdict::Warn);
        assert_eq!(outcome.exit_code(), exit_codes::SUCCESS);
    }

    #[test]
    fn test_excluded_dependency_has_no_issues() {
        let resolver = enterprise_resolver();
        let excludes = vec!["org.hibernate:hibernate-core".parse().unwrap()];
        let outcome = check_project(&project(hibernate()), &inputs(excludes), &resolver, true);

        assert!(outcome.report.issues_for(&hibernate()).is_empty());
        assert_eq!(outcome.excluded.len(), 1);
        assert_eq!(outcome.checked, 0);
        assert_eq!(outcome.verdict, Verdict::Pass);
    }

    #[test]
    fn test_excluded_relocated_dependency_has_no_issues() {
        let resolver = enterprise_resolver();
        let servlet = Coordinate::versioned("javax.servlet", "servlet-api", "2.5");

        let flagged = check_project(&project(servlet.clone()), &inputs(Vec::new()), &resolver, true);
        assert_eq!(flagged.report.issues_for(&servlet).len(), 2);

        let excludes = vec![ExcludeRule::new("javax.servlet", "servlet-api")];
        let outcome = check_project(&project(servlet.clone()), &inputs(excludes), &resolver, true);
        assert!(outcome.report.issues_for(&servlet).is_empty());
        assert!(outcome.report.is_empty());
        assert_eq!(outcome.excluded[0].dependency, servlet);
        assert_eq!(outcome.verdict, Verdict::Pass);
    }

    #[test]
    fn test_managed_dependency_without_own_version() {
        let resolver = enterprise_resolver();
        let dependency = Coordinate::versioned("org.hibernate", "hibernate-core", "4.2.0.Final-redhat-1");
        let project = Project::new(
            Coordinate::versioned("com.example", "app", "1.0"),
            vec![dependency.clone()],
            vec![Coordinate::new("org.hibernate", "hibernate-core")],
        );

        let outcome = check_project(&project, &inputs(Vec::new()), &resolver, true);
        assert!(outcome.report.is_empty());
        assert_eq!(outcome.verdict, Verdict::Pass);
    }

    #[test]
    fn test_missing_version_is_release_violation() {
        let resolver = InMemoryResolver::new();
        let dependency = Coordinate::new("org.example", "lib");
        let outcome = check_project(&project(dependency.clone()), &inputs(Vec::new()), &resolver, false);

        let issues = outcome.report.issues_for(&dependency);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule, RuleKind::ReleasePolicy);
        assert!(issues[0].message.contains("no version"));
    }

    #[test]
    fn test_report_follows_declaration_order() {
        let resolver = InMemoryResolver::new();
        let first = Coordinate::versioned("z.group", "last-alphabetically", "1");
        let second = Coordinate::versioned("a.group", "first-alphabetically", "1");
        let project = Project::new(
            Coordinate::versioned("com.example", "app", "1.0"),
            vec![first.clone(), second.clone()],
            Vec::new(),
        );

        let outcome = check_project(&project, &inputs(Vec::new()), &resolver, false);
        let order: Vec<&Coordinate> = outcome.report.iter().map(|(d, _)| d).collect();
        assert_eq!(order, vec![&first, &second]);
    }
}

// ============================================================================
// BOM resolution
// ============================================================================

mod bom_resolution {
    use super::*;

    #[test]
    fn test_parent_chain_entries_attributed_to_catalog_bom() {
        let mut resolver = InMemoryResolver::new();
        resolver
            .insert_pom(&pom("org.test:a:1", Some("org.test:b:1"), &["g:from-a:1"]))
            .unwrap();
        resolver
            .insert_pom(&pom("org.test:b:1", Some("org.test:c:1"), &["g:from-b:1"]))
            .unwrap();
        resolver
            .insert_pom(&pom("org.test:c:1", None, &["g:from-c:1"]))
            .unwrap();

        let a = bom("org.test:a:1");
        let resolution = BomResolver::new(&resolver).resolve(std::slice::from_ref(&a));

        assert!(resolution.warnings.is_empty());
        assert_eq!(resolution.index.len(), 3);
        for artifact in ["from-a", "from-b", "from-c"] {
            assert_eq!(resolution.index.get(&ArtifactKey::new("g", artifact)), &[a.clone()]);
        }
    }

    #[test]
    fn test_cyclic_parent_chain_is_skipped() {
        let mut resolver = InMemoryResolver::new();
        resolver
            .insert_pom(&pom("org.test:a:1", Some("org.test:b:1"), &["g:from-a:1"]))
            .unwrap();
        resolver
            .insert_pom(&pom("org.test:b:1", Some("org.test:a:1"), &["g:from-b:1"]))
            .unwrap();
        resolver
            .insert_pom(&pom("org.test:d:1", None, &["g:from-d:1"]))
            .unwrap();

        let catalog = vec![bom("org.test:a:1"), bom("org.test:d:1")];
        let resolution = BomResolver::new(&resolver).resolve(&catalog);

        assert_eq!(resolution.resolved, 1);
        assert_eq!(resolution.warnings.len(), 1);
        assert!(matches!(
            resolution.warnings[0].error.kind,
            ResolutionErrorKind::Cycle(_)
        ));
        assert!(!resolution.index.contains(&ArtifactKey::new("g", "from-a")));
        assert!(!resolution.index.contains(&ArtifactKey::new("g", "from-b")));
        assert!(resolution.index.contains(&ArtifactKey::new("g", "from-d")));
    }

    #[test]
    fn test_unavailable_bom_does_not_affect_others() {
        let resolver = enterprise_resolver();
        let catalog = vec![
            bom("org.jboss.bom:missing:9"),
            bom("org.jboss.bom:enterprise:1.0"),
        ];
        let resolution = BomResolver::new(&resolver).resolve(&catalog);

        assert_eq!(resolution.warnings.len(), 1);
        assert!(resolution.warnings[0].error.is_not_found());
        assert_eq!(
            resolution.warnings[0].bom.coordinate().to_string(),
            "org.jboss.bom:missing:9"
        );
        assert_eq!(
            resolution
                .index
                .get(&ArtifactKey::new("org.hibernate", "hibernate-core"))
                .len(),
            1
        );
    }

    #[test]
    fn test_key_managed_by_several_boms() {
        let mut resolver = enterprise_resolver();
        resolver
            .insert_pom(&pom(
                "org.jboss.bom:hibernate:2.0",
                None,
                &["org.hibernate:hibernate-core:4.2.1.Final-redhat-1"],
            ))
            .unwrap();
        let catalog = vec![
            bom("org.jboss.bom:enterprise:1.0"),
            bom("org.jboss.bom:hibernate:2.0"),
        ];
        let index = BomResolver::new(&resolver).resolve(&catalog).index;

        let boms: Vec<String> = index
            .managing(&hibernate())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            boms,
            vec!["org.jboss.bom:enterprise:1.0", "org.jboss.bom:hibernate:2.0"]
        );
    }
}

// ============================================================================
// Relocation rule
// ============================================================================

mod relocation {
    use super::*;

    fn check(table: &RelocationTable, dependency: &Coordinate) -> Vec<String> {
        let rules = RuleSet::standard(&RulesConfig::default()).unwrap();
        let index = ManagedDependencyIndex::default();
        let ctx = CheckContext {
            relocations: table,
            index: &index,
            declared: &[],
        };
        rules
            .check(dependency, &ctx)
            .into_iter()
            .filter(|i| i.rule == RuleKind::Relocation)
            .map(|i| i.message)
            .collect()
    }

    #[test]
    fn test_substring_group_match_suggests_replacement() {
        let table = RelocationTable::parse("old.group=new.group:new-artifact\n").unwrap();
        let issues = check(&table, &Coordinate::versioned("old.group.sub", "lib", "1-redhat-1"));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("new.group:new-artifact"));
    }

    #[test]
    fn test_dependency_already_in_replacement_group() {
        let table = RelocationTable::parse("javax.servlet=org.jboss.spec.javax.servlet:jboss-servlet-api_3.0_spec\n")
            .unwrap();
        let dependency = Coordinate::versioned(
            "org.jboss.spec.javax.servlet",
            "jboss-servlet-api_3.0_spec",
            "1.0.1.Final-redhat-2",
        );
        assert!(check(&table, &dependency).is_empty());
    }

    #[test]
    fn test_bundled_table_flags_servlet_api() {
        let table = RelocationTable::bundled().unwrap();
        let issues = check(&table, &Coordinate::versioned("javax.servlet", "servlet-api", "2.5"));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("org.jboss.spec.javax.servlet:jboss-servlet-api_3.0_spec"));
    }
}
