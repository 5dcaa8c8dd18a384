//! Operator-supplied exclude rules.

use super::{Coordinate, CoordinateError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Excludes a dependency from every check when group and artifact match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExcludeRule {
    pub group: String,
    pub artifact: String,
}

impl ExcludeRule {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    /// Exact match on group and artifact. Version is not considered.
    #[must_use]
    pub fn matches(&self, dependency: &Coordinate) -> bool {
        dependency.group == self.group && dependency.artifact == self.artifact
    }
}

impl FromStr for ExcludeRule {
    type Err = CoordinateError;

    /// Parse a `group:artifact` string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| CoordinateError::Malformed {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (group, artifact) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| malformed("expected group:artifact"))?;
        let (group, artifact) = (group.trim(), artifact.trim());

        if group.is_empty() || artifact.is_empty() {
            return Err(malformed("group and artifact must both be non-empty"));
        }
        if artifact.contains(':') {
            return Err(malformed("exclude rules take exactly group:artifact"));
        }
        Ok(Self::new(group, artifact))
    }
}

impl fmt::Display for ExcludeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}
