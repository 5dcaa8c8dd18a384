//! Parent-chain walking and import expansion for one descriptor lineage.

use crate::error::{ResolutionError, ResolutionErrorKind};
use crate::model::{ArtifactKey, Coordinate};
use crate::pom::{Descriptor, Properties};
use crate::resolver::DescriptorResolver;
use std::collections::HashSet;

/// Deepest parent chain or import nesting followed before giving up.
pub const MAX_LINEAGE_DEPTH: usize = 64;

/// One interpolated `dependencyManagement` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedEntry {
    pub key: ArtifactKey,
    pub version: Option<String>,
    /// `scope=import`, `type=pom`
    pub import: bool,
}

impl ManagedEntry {
    /// Entries declared directly in `descriptor`, interpolated with `properties`.
    pub fn declared_in(descriptor: &Descriptor, properties: &Properties) -> Vec<Self> {
        descriptor
            .managed
            .iter()
            .map(|dependency| {
                let coordinate = properties.interpolate_coordinate(&dependency.coordinate);
                Self {
                    key: coordinate.key(),
                    version: coordinate.version,
                    import: dependency.is_bom_import(),
                }
            })
            .collect()
    }

    fn coordinate(&self) -> Coordinate {
        let coordinate = Coordinate::new(self.key.group.clone(), self.key.artifact.clone());
        match &self.version {
            Some(version) => coordinate.with_version(version.clone()),
            None => coordinate,
        }
    }
}

/// Follow `start`'s parent references through `resolver`.
///
/// The returned chain is ordered child first and includes `start`.
pub fn parent_chain(
    resolver: &dyn DescriptorResolver,
    start: Descriptor,
) -> Result<Vec<Descriptor>, ResolutionError> {
    let mut visited = HashSet::new();
    visited.insert(start.coordinate.clone());
    let mut next = start.parent.clone();
    let mut chain = vec![start];

    while let Some(parent) = next {
        if !visited.insert(parent.clone()) {
            return Err(ResolutionError::new(
                &parent,
                ResolutionErrorKind::Cycle(parent.to_string()),
            ));
        }
        if chain.len() >= MAX_LINEAGE_DEPTH {
            return Err(ResolutionError::invalid(
                &parent,
                format!("parent chain deeper than {MAX_LINEAGE_DEPTH}"),
            ));
        }
        tracing::debug!("Resolving parent {}", parent);
        let descriptor = resolver.resolve(&parent)?;
        next = descriptor.parent.clone();
        chain.push(descriptor);
    }

    Ok(chain)
}

/// Every non-import managed entry visible to the BOM at `root`.
///
/// Entries come child first: the BOM's own entries, then each ancestor's.
/// Import entries are replaced in place by the imported BOM's entries.
pub fn managed_entries(
    resolver: &dyn DescriptorResolver,
    root: &Coordinate,
) -> Result<Vec<ManagedEntry>, ResolutionError> {
    let mut walker = Walker::new(resolver);
    let mut out = Vec::new();
    walker.collect_root(root, &mut out)?;
    Ok(out)
}

/// Managed entries of an already-built chain (child first), imports expanded.
pub fn chain_managed_entries(
    resolver: &dyn DescriptorResolver,
    chain: &[Descriptor],
) -> Result<Vec<ManagedEntry>, ResolutionError> {
    let mut walker = Walker::new(resolver);
    if let Some(head) = chain.first() {
        walker.imports.push(head.coordinate.clone());
    }
    let mut out = Vec::new();
    walker.collect_chain(chain, &mut out)?;
    Ok(out)
}

struct Walker<'a> {
    resolver: &'a dyn DescriptorResolver,
    /// BOM roots currently being expanded, outermost first
    imports: Vec<Coordinate>,
}

impl<'a> Walker<'a> {
    fn new(resolver: &'a dyn DescriptorResolver) -> Self {
        Self {
            resolver,
            imports: Vec::new(),
        }
    }

    fn collect_root(
        &mut self,
        root: &Coordinate,
        out: &mut Vec<ManagedEntry>,
    ) -> Result<(), ResolutionError> {
        if self.imports.contains(root) {
            return Err(ResolutionError::new(
                root,
                ResolutionErrorKind::Cycle(root.to_string()),
            ));
        }
        if self.imports.len() >= MAX_LINEAGE_DEPTH {
            return Err(ResolutionError::invalid(
                root,
                format!("imports nested deeper than {MAX_LINEAGE_DEPTH}"),
            ));
        }

        let descriptor = self.resolver.resolve(root)?;
        let chain = parent_chain(self.resolver, descriptor)?;

        self.imports.push(root.clone());
        let result = self.collect_chain(&chain, out);
        self.imports.pop();
        result
    }

    fn collect_chain(
        &mut self,
        chain: &[Descriptor],
        out: &mut Vec<ManagedEntry>,
    ) -> Result<(), ResolutionError> {
        let properties = Properties::for_lineage(chain);

        for descriptor in chain {
            for entry in ManagedEntry::declared_in(descriptor, &properties) {
                if !entry.import {
                    out.push(entry);
                    continue;
                }

                let imported = entry.coordinate();
                let resolvable = imported
                    .version()
                    .is_some_and(|version| !version.contains("${"));
                if !resolvable {
                    return Err(ResolutionError::invalid(
                        &descriptor.coordinate,
                        format!("imported BOM {imported} has no resolvable version"),
                    ));
                }
                tracing::debug!("Expanding import {} from {}", imported, descriptor.coordinate);
                self.collect_root(&imported, out)?;
            }
        }
        Ok(())
    }
}
