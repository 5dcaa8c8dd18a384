//! Operator exclusions applied before any rule runs.

use crate::model::{Coordinate, ExcludeRule};
use serde::Serialize;

/// A dependency skipped because of an exclude rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedDependency {
    pub dependency: Coordinate,
    pub rule: ExcludeRule,
}

/// First rule matching `dependency` exactly on group and artifact.
#[must_use]
pub fn matching_rule<'r>(dependency: &Coordinate, rules: &'r [ExcludeRule]) -> Option<&'r ExcludeRule> {
    rules.iter().find(|rule| rule.matches(dependency))
}

#[must_use]
pub fn is_excluded(dependency: &Coordinate, rules: &[ExcludeRule]) -> bool {
    matching_rule(dependency, rules).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let rules = vec![ExcludeRule::new("org.hibernate", "hibernate-core")];
        assert!(is_excluded(
            &Coordinate::versioned("org.hibernate", "hibernate-core", "4.2.0.Final"),
            &rules
        ));
        assert!(is_excluded(&Coordinate::new("org.hibernate", "hibernate-core"), &rules));
        assert!(!is_excluded(
            &Coordinate::versioned("org.hibernate", "hibernate-core-extra", "1"),
            &rules
        ));
        assert!(!is_excluded(
            &Coordinate::versioned("org.hibernate.sub", "hibernate-core", "1"),
            &rules
        ));
    }

    #[test]
    fn test_no_rules() {
        assert!(matching_rule(&Coordinate::new("g", "a"), &[]).is_none());
    }
}
