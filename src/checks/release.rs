//! Release-marker policy: every version must be a vendor release build.

use super::{CheckContext, ConformanceIssue, ConformanceRule, RuleKind};
use crate::config::DEFAULT_RELEASE_MARKER;
use crate::error::{BomCheckError, Result};
use crate::model::Coordinate;
use regex::Regex;

/// Flags versions that do not match the release marker pattern.
///
/// A dependency without any version always violates the policy.
#[derive(Debug, Clone)]
pub struct ReleasePolicyRule {
    marker: Regex,
}

impl ReleasePolicyRule {
    /// Compile a marker pattern such as `-redhat-[0-9]+$`.
    pub fn new(pattern: &str) -> Result<Self> {
        let marker = Regex::new(pattern).map_err(|e| {
            BomCheckError::config(format!("rules.release_marker '{pattern}': {e}"))
        })?;
        Ok(Self { marker })
    }

    /// The `-redhat-N` marker.
    pub fn redhat() -> Result<Self> {
        Self::new(DEFAULT_RELEASE_MARKER)
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.marker.as_str()
    }

    /// Whether a version string carries the marker.
    #[must_use]
    pub fn is_release(&self, version: &str) -> bool {
        self.marker.is_match(version)
    }

    /// Issue for `dependency`, if any.
    #[must_use]
    pub fn check_version(&self, dependency: &Coordinate) -> Option<ConformanceIssue> {
        match dependency.version() {
            None => Some(ConformanceIssue::new(
                RuleKind::ReleasePolicy,
                "This dependency has no version; a Red Hat release version is required",
            )),
            Some(version) if !self.is_release(version) => Some(ConformanceIssue::new(
                RuleKind::ReleasePolicy,
                format!(
                    "This dependency isn't a Red Hat release (version '{version}' does not match '{}')",
                    self.pattern()
                ),
            )),
            Some(_) => None,
        }
    }
}

impl ConformanceRule for ReleasePolicyRule {
    fn kind(&self) -> RuleKind {
        RuleKind::ReleasePolicy
    }

    fn check(&self, dependency: &Coordinate, _ctx: &CheckContext<'_>) -> Vec<ConformanceIssue> {
        self.check_version(dependency).into_iter().collect()
    }
}
