//! Explicit versions that duplicate a BOM-managed version.

use super::{CheckContext, ConformanceIssue, ConformanceRule, RuleKind};
use crate::bom::ManagedDependencyIndex;
use crate::model::Coordinate;

/// Flags dependencies whose own declaration pins a version that an
/// available BOM already manages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagedVersionRule;

impl ManagedVersionRule {
    /// Issue for `dependency`, if its own declaration carries a version
    /// and the index manages its `(group, artifact)`.
    #[must_use]
    pub fn check_declared(
        &self,
        dependency: &Coordinate,
        declared: &[Coordinate],
        index: &ManagedDependencyIndex,
    ) -> Option<ConformanceIssue> {
        let key = dependency.key();
        let own = declared.iter().find(|d| d.matches_key(&key))?;
        let version = own.version()?;

        let boms = index.get(&key);
        if boms.is_empty() {
            return None;
        }

        let listed = boms
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Some(ConformanceIssue::new(
            RuleKind::ManagedVersion,
            format!(
                "Version {version} is declared explicitly but is managed by {listed}. \
                 Remove the version and import one of these BOMs instead"
            ),
        ))
    }
}

impl ConformanceRule for ManagedVersionRule {
    fn kind(&self) -> RuleKind {
        RuleKind::ManagedVersion
    }

    fn check(&self, dependency: &Coordinate, ctx: &CheckContext<'_>) -> Vec<ConformanceIssue> {
        self.check_declared(dependency, ctx.declared, ctx.index)
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::BomResolver;
    use crate::model::BomReference;
    use crate::resolver::InMemoryResolver;

    fn index() -> ManagedDependencyIndex {
        let mut resolver = InMemoryResolver::new();
        resolver
            .insert_pom(
                "<project><groupId>org.jboss.bom</groupId><artifactId>enterprise</artifactId><version>1.0</version>\
                 <dependencyManagement><dependencies><dependency><groupId>org.hibernate</groupId>\
                 <artifactId>hibernate-core</artifactId><version>4.2.0.Final-redhat-1</version></dependency>\
                 </dependencies></dependencyManagement></project>",
            )
            .unwrap();
        let bom =
            BomReference::new(Coordinate::versioned("org.jboss.bom", "enterprise", "1.0"), "ent")
                .unwrap();
        BomResolver::new(&resolver).resolve(&[bom]).index
    }

    #[test]
    fn test_explicit_managed_version_flagged() {
        let dep = Coordinate::versioned("org.hibernate", "hibernate-core", "4.2.0.Final");
        let declared = vec![dep.clone()];
        let issue = ManagedVersionRule
            .check_declared(&dep, &declared, &index())
            .unwrap();
        assert_eq!(issue.rule, RuleKind::ManagedVersion);
        assert!(issue.message.contains("org.jboss.bom:enterprise:1.0"));
    }

    #[test]
    fn test_inherited_version_not_flagged() {
        let dep = Coordinate::versioned("org.hibernate", "hibernate-core", "4.2.0.Final");
        let declared = vec![Coordinate::new("org.hibernate", "hibernate-core")];
        assert!(ManagedVersionRule
            .check_declared(&dep, &declared, &index())
            .is_none());
        assert!(ManagedVersionRule.check_declared(&dep, &[], &index()).is_none());
    }

    #[test]
    fn test_unmanaged_not_flagged() {
        let dep = Coordinate::versioned("junit", "junit", "4.11");
        let declared = vec![dep.clone()];
        assert!(ManagedVersionRule
            .check_declared(&dep, &declared, &index())
            .is_none());
    }
}
