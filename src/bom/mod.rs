//! BOM resolution: flattening catalog BOMs into a managed-dependency index.
//!
//! Each catalog entry is resolved together with its whole lineage (parent
//! chain and imported BOMs). Every managed entry found anywhere in the
//! lineage is attributed to the catalog entry that started it. A lineage
//! that fails to resolve at any level contributes nothing and produces a
//! [`ResolutionWarning`] instead.

mod lineage;

pub use lineage::{
    chain_managed_entries, managed_entries, parent_chain, ManagedEntry, MAX_LINEAGE_DEPTH,
};

use crate::error::ResolutionError;
use crate::model::{ArtifactKey, BomReference, Coordinate};
use crate::resolver::DescriptorResolver;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::fmt;

/// Mapping from `(group, artifact)` to every BOM that manages it.
///
/// Keys keep discovery order. A key managed by several BOMs lists all of
/// them in catalog order. Only [`BomResolver`] builds an index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedDependencyIndex {
    entries: IndexMap<ArtifactKey, Vec<BomReference>>,
}

impl ManagedDependencyIndex {
    /// BOMs managing `key`, empty when unmanaged.
    #[must_use]
    pub fn get(&self, key: &ArtifactKey) -> &[BomReference] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// BOMs managing the dependency's `(group, artifact)`; version is ignored.
    #[must_use]
    pub fn managing(&self, dependency: &Coordinate) -> &[BomReference] {
        self.get(&dependency.key())
    }

    #[must_use]
    pub fn contains(&self, key: &ArtifactKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct managed artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArtifactKey, &[BomReference])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    fn push(&mut self, key: ArtifactKey, bom: &BomReference) {
        self.entries.entry(key).or_default().push(bom.clone());
    }
}

/// A catalog entry whose lineage could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionWarning {
    /// Catalog entry whose lineage was skipped
    pub bom: BomReference,
    /// Coordinate that failed
    pub failed: Coordinate,
    /// What went wrong
    pub reason: String,
    #[serde(skip)]
    pub error: ResolutionError,
}

impl ResolutionWarning {
    fn new(bom: &BomReference, error: ResolutionError) -> Self {
        Self {
            bom: bom.clone(),
            failed: error.coordinate.clone(),
            reason: error.kind.to_string(),
            error,
        }
    }
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if &self.failed == self.bom.coordinate() {
            write!(f, "BOM {} skipped: {}", self.bom, self.reason)
        } else {
            write!(
                f,
                "BOM {} skipped: {} ({})",
                self.bom, self.failed, self.reason
            )
        }
    }
}

/// Result of resolving a catalog.
#[derive(Debug, Clone, Default)]
pub struct BomResolution {
    /// The complete managed-dependency index
    pub index: ManagedDependencyIndex,
    /// One entry per skipped lineage
    pub warnings: Vec<ResolutionWarning>,
    /// Number of catalog entries fully resolved
    pub resolved: usize,
}

/// Resolves catalog BOMs into a [`ManagedDependencyIndex`].
pub struct BomResolver<'a> {
    resolver: &'a dyn DescriptorResolver,
}

impl<'a> BomResolver<'a> {
    pub fn new(resolver: &'a dyn DescriptorResolver) -> Self {
        Self { resolver }
    }

    /// Resolve every catalog entry and return the finished index.
    ///
    /// Never fails as a whole: unresolvable lineages become warnings.
    pub fn resolve(&self, catalog: &[BomReference]) -> BomResolution {
        let mut resolution = BomResolution::default();

        for bom in catalog {
            tracing::debug!("Resolving BOM {} (catalog entry '{}')", bom, bom.source());
            match managed_entries(self.resolver, bom.coordinate()) {
                Ok(entries) => {
                    let keys: IndexSet<ArtifactKey> =
                        entries.into_iter().map(|entry| entry.key).collect();
                    tracing::debug!("BOM {} manages {} artifacts", bom, keys.len());
                    for key in keys {
                        resolution.index.push(key, bom);
                    }
                    resolution.resolved += 1;
                }
                Err(error) => {
                    let warning = ResolutionWarning::new(bom, error);
                    tracing::warn!("{}", warning);
                    resolution.warnings.push(warning);
                }
            }
        }

        tracing::info!(
            "Resolved {}/{} BOMs, {} managed artifacts",
            resolution.resolved,
            catalog.len(),
            resolution.index.len()
        );
        resolution
    }
}
