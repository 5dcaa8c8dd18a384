//! Relocated-artifact detection.

use super::{CheckContext, ConformanceIssue, ConformanceRule, RuleKind};
use crate::model::Coordinate;
use crate::relocation::RelocationTable;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a relocation key is compared with group and artifact ids.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RelocationMatch {
    /// The key occurs anywhere in the group or artifact id
    #[default]
    Substring,
    /// The key equals the group or artifact id
    Exact,
}

impl RelocationMatch {
    /// Whether `key` selects `dependency`.
    #[must_use]
    pub fn matches(self, key: &str, dependency: &Coordinate) -> bool {
        match self {
            Self::Substring => dependency.group.contains(key) || dependency.artifact.contains(key),
            Self::Exact => dependency.group == key || dependency.artifact == key,
        }
    }
}

/// Suggests replacements for dependencies on relocated artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelocationRule {
    mode: RelocationMatch,
}

impl RelocationRule {
    #[must_use]
    pub const fn new(mode: RelocationMatch) -> Self {
        Self { mode }
    }

    /// Whether the table entry `key = replacements` flags `dependency`.
    ///
    /// A matching key is ignored when one of its replacements already has
    /// the dependency's group.
    #[must_use]
    pub fn applies(&self, key: &str, replacements: &[Coordinate], dependency: &Coordinate) -> bool {
        self.mode.matches(key, dependency)
            && !replacements.iter().any(|r| r.group == dependency.group)
    }

    /// One issue per applicable table key, in table order.
    #[must_use]
    pub fn check_table(
        &self,
        dependency: &Coordinate,
        table: &RelocationTable,
    ) -> Vec<ConformanceIssue> {
        table
            .iter()
            .filter(|(key, replacements)| self.applies(key, replacements, dependency))
            .map(|(_, replacements)| {
                let suggestions = replacements
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" or ");
                ConformanceIssue::new(
                    RuleKind::Relocation,
                    format!("You should replace this dependency by: {suggestions}"),
                )
            })
            .collect()
    }
}

impl ConformanceRule for RelocationRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Relocation
    }

    fn check(&self, dependency: &Coordinate, ctx: &CheckContext<'_>) -> Vec<ConformanceIssue> {
        self.check_table(dependency, ctx.relocations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RelocationTable {
        RelocationTable::parse("old.group=new.group:new-artifact\n").unwrap()
    }

    #[test]
    fn test_substring_match_on_group() {
        let dep = Coordinate::versioned("old.group.sub", "thing", "1");
        let issues = RelocationRule::default().check_table(&dep, &table());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.ends_with("new.group:new-artifact"));
    }

    #[test]
    fn test_already_at_replacement_group() {
        let dep = Coordinate::versioned("new.group", "old.group-compat", "1");
        assert!(RelocationRule::default().check_table(&dep, &table()).is_empty());
    }

    #[test]
    fn test_multiple_replacements_joined() {
        let table =
            RelocationTable::parse("javaee=org.jboss.spec:jboss-javaee-6.0|org.jboss.spec:jboss-javaee-web-6.0\n")
                .unwrap();
        let dep = Coordinate::versioned("javax", "javaee-api", "6.0");
        let issues = RelocationRule::default().check_table(&dep, &table);
        assert_eq!(
            issues[0].message,
            "You should replace this dependency by: org.jboss.spec:jboss-javaee-6.0 or org.jboss.spec:jboss-javaee-web-6.0"
        );
    }

    #[test]
    fn test_several_keys_match_in_table_order() {
        let table = RelocationTable::parse("javax.servlet=a:b\njavax=c:d\n").unwrap();
        let dep = Coordinate::versioned("javax.servlet", "servlet-api", "2.5");
        let issues = RelocationRule::default().check_table(&dep, &table);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.ends_with("a:b"));
        assert!(issues[1].message.ends_with("c:d"));
    }

    #[test]
    fn test_exact_mode() {
        let dep = Coordinate::versioned("old.group.sub", "thing", "1");
        let rule = RelocationRule::new(RelocationMatch::Exact);
        assert!(rule.check_table(&dep, &table()).is_empty());

        let dep = Coordinate::versioned("old.group", "thing", "1");
        assert_eq!(rule.check_table(&dep, &table()).len(), 1);
    }
}
