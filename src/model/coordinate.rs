//! Artifact coordinates and BOM references.
//!
//! A [`Coordinate`] is the `group:artifact[:version]` triple that names a
//! dependency. Managed-dependency lookups ignore the version, so every
//! coordinate also exposes an [`ArtifactKey`] holding just the
//! `(group, artifact)` identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing coordinate strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("malformed coordinate '{input}': {reason}")]
    Malformed { input: String, reason: String },

    #[error("BOM coordinate '{0}' has no version")]
    MissingVersion(String),
}

impl CoordinateError {
    fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Identifies an artifact by group and artifact id, optionally pinned to a version.
///
/// Equality and hashing consider all three fields. Use [`Coordinate::key`]
/// when version must be ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    /// Group id (e.g. `org.hibernate`)
    pub group: String,
    /// Artifact id (e.g. `hibernate-core`)
    pub artifact: String,
    /// Version, absent when inherited or unspecified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Coordinate {
    /// Create an unversioned coordinate.
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: None,
        }
    }

    /// Create a coordinate with a version.
    pub fn versioned(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self::new(group, artifact).with_version(version)
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The version, treating an empty string as absent.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.is_empty())
    }

    /// Whether a non-empty version is present.
    #[must_use]
    pub fn has_version(&self) -> bool {
        self.version().is_some()
    }

    /// Version-less identity used for managed-dependency indexing.
    #[must_use]
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey {
            group: self.group.clone(),
            artifact: self.artifact.clone(),
        }
    }

    /// Whether group and artifact match the given key.
    #[must_use]
    pub fn matches_key(&self, key: &ArtifactKey) -> bool {
        self.group == key.group && self.artifact == key.artifact
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version() {
            Some(v) => write!(f, "{}:{}:{}", self.group, self.artifact, v),
            None => write!(f, "{}:{}", self.group, self.artifact),
        }
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    /// Parse `group:artifact` or `group:artifact:version`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split(':').map(str::trim).collect();

        let (group, artifact, version) = match parts.as_slice() {
            [g, a] => (*g, *a, None),
            [g, a, v] => (*g, *a, Some(*v)),
            _ => {
                return Err(CoordinateError::malformed(
                    s,
                    "expected group:artifact or group:artifact:version",
                ))
            }
        };

        if group.is_empty() {
            return Err(CoordinateError::malformed(s, "empty group"));
        }
        if artifact.is_empty() {
            return Err(CoordinateError::malformed(s, "empty artifact"));
        }
        if version.is_some_and(str::is_empty) {
            return Err(CoordinateError::malformed(s, "empty version"));
        }

        let mut coordinate = Self::new(group, artifact);
        coordinate.version = version.map(str::to_string);
        Ok(coordinate)
    }
}

/// The `(group, artifact)` identity of an artifact, version excluded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub group: String,
    pub artifact: String,
}

impl ArtifactKey {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

/// One concrete BOM artifact version offered by a catalog.
///
/// The coordinate always carries a version; construction fails otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BomReference {
    coordinate: Coordinate,
    source: String,
}

impl BomReference {
    /// Create a reference, rejecting coordinates without a version.
    pub fn new(coordinate: Coordinate, source: impl Into<String>) -> Result<Self, CoordinateError> {
        if !coordinate.has_version() {
            return Err(CoordinateError::MissingVersion(coordinate.to_string()));
        }
        Ok(Self {
            coordinate,
            source: source.into(),
        })
    }

    /// The BOM's versioned coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// Identifier of the catalog entry this reference came from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The BOM version.
    #[must_use]
    pub fn version(&self) -> &str {
        self.coordinate.version().unwrap_or_default()
    }
}

impl fmt::Display for BomReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.coordinate.fmt(f)
    }
}
