//! JBoss stacks YAML catalog.
//!
//! Two shapes are read: `availableBoms` entries carrying their own
//! `recommendedVersion`/`availableVersions`, and `availableBomVersions`
//! entries pointing at a BOM (usually through a YAML alias) with one
//! `version` each. Every other key in the file is ignored.
//!
//! Only an unreadable or unparsable document is an error. A malformed or
//! versionless entry is skipped and recorded, and the remaining entries
//! are still offered.

use super::BomCatalogProvider;
use crate::error::{BomCheckError, CatalogErrorKind, ErrorContext, Result};
use crate::model::{BomReference, Coordinate};
use serde::Deserialize;
use serde_yaml_ng::Value;
use std::fmt;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawStacks {
    available_boms: Vec<Value>,
    available_bom_versions: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBom {
    #[serde(default)]
    id: Option<String>,
    group_id: Option<String>,
    artifact_id: Option<String>,
    recommended_version: Option<String>,
    #[serde(default)]
    available_versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawBomVersion {
    bom: RawBom,
    version: Option<String>,
}

impl RawBom {
    fn coordinate(&self) -> std::result::Result<Coordinate, String> {
        let field = |value: &Option<String>, name: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| format!("missing {name}"))
        };
        Ok(Coordinate::new(
            field(&self.group_id, "groupId")?,
            field(&self.artifact_id, "artifactId")?,
        ))
    }

    /// `availableVersions` then `recommendedVersion`, trimmed and deduplicated.
    fn versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = Vec::new();
        for version in self
            .available_versions
            .iter()
            .chain(self.recommended_version.iter())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
        {
            if !versions.iter().any(|existing| existing == version) {
                versions.push(version.to_string());
            }
        }
        versions
    }
}

/// `id` of a raw entry, or its position when it has none.
fn entry_label(value: &Value, list: &str, index: usize) -> String {
    value
        .get("id")
        .or_else(|| value.get("bom").and_then(|bom| bom.get("id")))
        .and_then(Value::as_str)
        .map_or_else(|| format!("{list}[{index}]"), str::to_string)
}

/// A catalog entry that contributed no BOM reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Entry id, or `list[index]` for entries without one
    pub id: String,
    pub reason: String,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Catalog entry '{}' skipped: {}", self.id, self.reason)
    }
}

/// BOM catalog read from a stacks YAML document.
#[derive(Debug, Clone, Default)]
pub struct StacksCatalog {
    references: Vec<BomReference>,
    skipped: Vec<SkippedEntry>,
}

impl StacksCatalog {
    /// Parse stacks YAML content.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawStacks = serde_yaml_ng::from_str(content).context("parsing stacks YAML")?;
        let mut catalog = Self::default();

        for (index, value) in raw.available_boms.into_iter().enumerate() {
            let label = entry_label(&value, "availableBoms", index);
            let parsed = serde_yaml_ng::from_value::<RawBom>(value)
                .map_err(|e| e.to_string())
                .and_then(|bom| Ok((bom.coordinate()?, bom)));
            let (coordinate, bom) = match parsed {
                Ok(entry) => entry,
                Err(reason) => {
                    catalog.skip(label, reason);
                    continue;
                }
            };
            let source = bom.id.clone().unwrap_or_else(|| label.clone());
            let versions = bom.versions();
            if versions.is_empty() {
                catalog.skip(label, "lists no versions".to_string());
                continue;
            }
            for version in versions {
                catalog.push(coordinate.clone().with_version(version), &source);
            }
        }

        for (index, value) in raw.available_bom_versions.into_iter().enumerate() {
            let label = entry_label(&value, "availableBomVersions", index);
            let parsed = serde_yaml_ng::from_value::<RawBomVersion>(value)
                .map_err(|e| e.to_string())
                .and_then(|entry| Ok((entry.bom.coordinate()?, entry)));
            let (coordinate, entry) = match parsed {
                Ok(entry) => entry,
                Err(reason) => {
                    catalog.skip(label, reason);
                    continue;
                }
            };
            let source = entry.bom.id.clone().unwrap_or_else(|| label.clone());
            match entry.version.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                Some(version) => catalog.push(coordinate.with_version(version), &source),
                None => catalog.skip(label, "has no version".to_string()),
            }
        }

        tracing::debug!(
            "Stacks catalog: {} BOM versions, {} entries skipped",
            catalog.references.len(),
            catalog.skipped.len()
        );
        Ok(catalog)
    }

    /// Read and parse a stacks file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BomCheckError::io(path, e))?;
        Self::parse(&content).with_context(|| path.display().to_string())
    }

    /// Download and parse a stacks file.
    #[cfg(feature = "remote")]
    pub fn fetch(url: &str, settings: &crate::utils::HttpSettings) -> Result<Self> {
        use crate::utils::http::{build_client, get_text};

        let client = build_client(settings).map_err(|e| {
            BomCheckError::catalog(url.to_string(), CatalogErrorKind::Fetch(e.to_string()))
        })?;
        tracing::info!("Fetching BOM catalog from {}", url);
        let content = get_text(&client, url, settings.max_retries).map_err(|e| {
            BomCheckError::catalog(url.to_string(), CatalogErrorKind::Fetch(e.to_string()))
        })?;
        Self::parse(&content).with_context(|| url.to_string())
    }

    /// Without the `remote` feature, URL catalogs are unavailable.
    #[cfg(not(feature = "remote"))]
    pub fn fetch(url: &str, _settings: &crate::utils::HttpSettings) -> Result<Self> {
        Err(BomCheckError::catalog(
            "loading catalog",
            CatalogErrorKind::RemoteDisabled(url.to_string()),
        ))
    }

    /// Entries that contributed no reference, in document order.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    fn skip(&mut self, id: String, reason: String) {
        let entry = SkippedEntry { id, reason };
        tracing::warn!("{}", entry);
        self.skipped.push(entry);
    }

    /// Record a versioned coordinate; repeats keep the first occurrence.
    fn push(&mut self, coordinate: Coordinate, source: &str) {
        match BomReference::new(coordinate, source) {
            Ok(reference) => {
                if !self
                    .references
                    .iter()
                    .any(|r| r.coordinate() == reference.coordinate())
                {
                    self.references.push(reference);
                }
            }
            Err(e) => self.skip(source.to_string(), e.to_string()),
        }
    }
}

impl BomCatalogProvider for StacksCatalog {
    fn available_boms(&self) -> Result<Vec<BomReference>> {
        Ok(self.references.clone())
    }

    fn name(&self) -> &'static str {
        "stacks"
    }
}
