//! Maven POM descriptor reading.
//!
//! Only the parts of a POM that conformance checking needs are read: the
//! project's own coordinate, its parent reference, properties, the
//! `dependencyManagement` section and the direct `dependencies`.

mod interpolate;

pub use interpolate::Properties;

use crate::error::{BomCheckError, ErrorContext, Result};
use crate::model::Coordinate;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// A parsed artifact descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Effective coordinate; group and version fall back to the parent's
    pub coordinate: Coordinate,
    /// Parent POM, if declared
    pub parent: Option<Coordinate>,
    /// `<relativePath>` of the parent, if declared
    pub relative_path: Option<String>,
    /// Packaging (`jar` when absent)
    pub packaging: String,
    /// `<properties>`, in declaration order
    pub properties: IndexMap<String, String>,
    /// `<dependencyManagement><dependencies>` entries, uninterpolated
    pub managed: Vec<Dependency>,
    /// `<dependencies>` entries, uninterpolated
    pub dependencies: Vec<Dependency>,
}

/// One `<dependency>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub coordinate: Coordinate,
    pub kind: Option<String>,
    pub scope: Option<String>,
    pub classifier: Option<String>,
    pub optional: bool,
}

impl Dependency {
    /// Whether this managed entry imports another BOM (`scope=import`, `type=pom`).
    #[must_use]
    pub fn is_bom_import(&self) -> bool {
        self.scope.as_deref() == Some("import") && self.kind.as_deref() == Some("pom")
    }
}

impl Descriptor {
    /// Parse a descriptor from POM XML.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawProject = quick_xml::de::from_str(content).context("parsing POM")?;
        raw.into_descriptor()
    }

    /// Read and parse a POM file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| BomCheckError::io(path, e))?;
        Self::parse(&content).with_context(|| path.display().to_string())
    }
}

// ============================================================================
// POM XML structures for deserialization
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProject {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    packaging: Option<String>,
    parent: Option<RawParent>,
    properties: Option<IndexMap<String, String>>,
    dependency_management: Option<RawDependencyManagement>,
    dependencies: Option<RawDependencies>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParent {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    relative_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDependencyManagement {
    dependencies: Option<RawDependencies>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDependencies {
    #[serde(default)]
    dependency: Vec<RawDependency>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDependency {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    scope: Option<String>,
    classifier: Option<String>,
    optional: Option<String>,
}

/// Trim and drop empty text.
fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RawProject {
    fn into_descriptor(self) -> Result<Descriptor> {
        let (parent, relative_path) = match self.parent {
            Some(raw) => {
                let (coordinate, relative_path) = raw.into_coordinate()?;
                (Some(coordinate), relative_path)
            }
            None => (None, None),
        };

        let artifact = text(self.artifact_id)
            .ok_or_else(|| BomCheckError::missing_element("project/artifactId"))?;
        let group = text(self.group_id)
            .or_else(|| parent.as_ref().map(|p| p.group.clone()))
            .ok_or_else(|| BomCheckError::missing_element("project/groupId"))?;
        let version = text(self.version)
            .or_else(|| parent.as_ref().and_then(|p| p.version.clone()))
            .ok_or_else(|| BomCheckError::missing_element("project/version"))?;

        let properties = self
            .properties
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, v.trim().to_string()))
            .collect::<IndexMap<_, _>>();

        let managed = self
            .dependency_management
            .and_then(|dm| dm.dependencies)
            .map(RawDependencies::into_dependencies)
            .transpose()?
            .unwrap_or_default();
        let dependencies = self
            .dependencies
            .map(RawDependencies::into_dependencies)
            .transpose()?
            .unwrap_or_default();

        Ok(Descriptor {
            coordinate: Coordinate::versioned(group, artifact, version),
            parent,
            relative_path,
            packaging: text(self.packaging).unwrap_or_else(|| "jar".to_string()),
            properties,
            managed,
            dependencies,
        })
    }
}

impl RawParent {
    fn into_coordinate(self) -> Result<(Coordinate, Option<String>)> {
        let group =
            text(self.group_id).ok_or_else(|| BomCheckError::missing_element("parent/groupId"))?;
        let artifact = text(self.artifact_id)
            .ok_or_else(|| BomCheckError::missing_element("parent/artifactId"))?;
        let version =
            text(self.version).ok_or_else(|| BomCheckError::missing_element("parent/version"))?;
        Ok((
            Coordinate::versioned(group, artifact, version),
            text(self.relative_path),
        ))
    }
}

impl RawDependencies {
    fn into_dependencies(self) -> Result<Vec<Dependency>> {
        self.dependency
            .into_iter()
            .map(RawDependency::into_dependency)
            .collect()
    }
}

impl RawDependency {
    fn into_dependency(self) -> Result<Dependency> {
        let group = text(self.group_id)
            .ok_or_else(|| BomCheckError::missing_element("dependency/groupId"))?;
        let artifact = text(self.artifact_id)
            .ok_or_else(|| BomCheckError::missing_element("dependency/artifactId"))?;

        let mut coordinate = Coordinate::new(group, artifact);
        coordinate.version = text(self.version);

        Ok(Dependency {
            coordinate,
            kind: text(self.kind),
            scope: text(self.scope),
            classifier: text(self.classifier),
            optional: text(self.optional).is_some_and(|o| o == "true"),
        })
    }
}
