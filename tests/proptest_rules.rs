//! Property-based tests for rules and parsers.
//!
//! Parsers must not panic on arbitrary input, and rule decisions must
//! depend only on the parts of a coordinate they are defined over.

use bomcheck::checks::{RelocationMatch, ReleasePolicyRule};
use bomcheck::model::{Coordinate, ExcludeRule};
use bomcheck::pom::Descriptor;
use bomcheck::relocation::RelocationTable;
use proptest::prelude::*;

const SEGMENT: &str = "[a-z][a-z0-9_.]{0,15}";

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn redhat_suffix_always_conforms(base in "[0-9][0-9A-Za-z.]{0,15}", build in 0u32..10_000) {
        let rule = ReleasePolicyRule::redhat().unwrap();
        let version = format!("{base}-redhat-{build}");
        prop_assert!(rule.is_release(&version), "{} should be a release", version);
    }

    #[test]
    fn version_without_marker_never_conforms(version in "[0-9A-Za-z.]{1,30}") {
        let rule = ReleasePolicyRule::redhat().unwrap();
        prop_assert!(!rule.is_release(&version));
    }

    #[test]
    fn coordinate_display_parses_back(
        group in SEGMENT,
        artifact in SEGMENT,
        version in proptest::option::of("[0-9][0-9A-Za-z.-]{0,15}"),
    ) {
        let mut coordinate = Coordinate::new(group, artifact);
        if let Some(v) = version {
            coordinate = coordinate.with_version(v);
        }
        let parsed: Coordinate = coordinate.to_string().parse().unwrap();
        prop_assert_eq!(parsed, coordinate);
    }

    #[test]
    fn exclusion_ignores_version(group in SEGMENT, artifact in SEGMENT, version in "[0-9.]{1,8}") {
        let rule = ExcludeRule::new(group.clone(), artifact.clone());
        prop_assert!(rule.matches(&Coordinate::new(group.clone(), artifact.clone())));
        prop_assert!(rule.matches(&Coordinate::versioned(group.clone(), artifact.clone(), version)));

        let other = format!("{artifact}-other");
        prop_assert!(!rule.matches(&Coordinate::new(group, other)));
    }

    #[test]
    fn exact_match_implies_substring_match(key in SEGMENT, group in SEGMENT, artifact in SEGMENT) {
        let dependency = Coordinate::new(group, artifact);
        if RelocationMatch::Exact.matches(&key, &dependency) {
            prop_assert!(RelocationMatch::Substring.matches(&key, &dependency));
        }
    }

    #[test]
    fn relocation_table_parse_doesnt_panic(content in "\\PC{0,300}") {
        let _ = RelocationTable::parse(&content);
    }

    #[test]
    fn relocation_table_survives_properties_output(
        entries in proptest::collection::vec((SEGMENT, SEGMENT, SEGMENT), 1..8),
    ) {
        let content: String = entries
            .iter()
            .map(|(key, group, artifact)| format!("{key}={group}:{artifact}\n"))
            .collect();
        let table = RelocationTable::parse(&content).unwrap();
        let reparsed = RelocationTable::parse(&table.to_properties()).unwrap();
        prop_assert_eq!(reparsed, table);
    }

    #[test]
    fn descriptor_parse_doesnt_panic(content in "\\PC{0,300}") {
        let _ = Descriptor::parse(&content);
    }
}
