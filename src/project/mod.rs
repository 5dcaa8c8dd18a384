//! Project model: the dependencies of a `pom.xml` under check.
//!
//! The loader reads the project POM, walks its parent chain (local
//! `relativePath` first, then the descriptor resolver) and produces two
//! lists:
//!
//! - `dependencies`: own and inherited dependencies with versions filled
//!   from `dependencyManagement` (including imported BOMs)
//! - `declared`: the project's own `<dependencies>` exactly as written, so
//!   explicit versions can be told apart from managed ones
//!
//! Parent or import failures are not fatal: they are recorded as warnings
//! and the project is checked with what could be loaded.

use crate::bom::{chain_managed_entries, ManagedEntry};
use crate::error::Result;
use crate::model::{ArtifactKey, Coordinate};
use crate::pom::{Descriptor, Properties};
use crate::resolver::DescriptorResolver;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default `<relativePath>` of a parent POM.
const DEFAULT_RELATIVE_PATH: &str = "../pom.xml";

/// A loaded project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub coordinate: Coordinate,
    /// Direct dependencies to check, declaration order, one per `(group, artifact)`
    pub dependencies: Vec<Coordinate>,
    /// Own declarations with versions only where written in the POM
    pub declared: Vec<Coordinate>,
    /// Problems met while loading parents or imports
    pub warnings: Vec<String>,
}

impl Project {
    /// A project given directly as coordinate lists.
    #[must_use]
    pub fn new(coordinate: Coordinate, dependencies: Vec<Coordinate>, declared: Vec<Coordinate>) -> Self {
        Self {
            coordinate,
            dependencies,
            declared,
            warnings: Vec::new(),
        }
    }
}

/// Builds a [`Project`] from a POM file.
pub struct ProjectLoader<'a> {
    resolver: &'a dyn DescriptorResolver,
}

impl<'a> ProjectLoader<'a> {
    pub fn new(resolver: &'a dyn DescriptorResolver) -> Self {
        Self { resolver }
    }

    /// Load the project at `pom_path`. Only an unreadable project POM is an error.
    pub fn load(&self, pom_path: &Path) -> Result<Project> {
        let descriptor = Descriptor::from_path(pom_path)?;
        let base_dir = pom_path.parent().map(Path::to_path_buf);
        Ok(self.from_descriptor(descriptor, base_dir))
    }

    /// Build the project from an already parsed descriptor.
    ///
    /// `base_dir` is the directory of the project POM, used for parent
    /// `relativePath` lookups.
    #[must_use]
    pub fn from_descriptor(&self, descriptor: Descriptor, base_dir: Option<PathBuf>) -> Project {
        let mut warnings = Vec::new();
        let chain = self.parent_chain(descriptor, base_dir, &mut warnings);
        let properties = Properties::for_lineage(&chain);
        let managed = self.managed_versions(&chain, &properties, &mut warnings);

        let head = &chain[0];
        let declared: Vec<Coordinate> = head
            .dependencies
            .iter()
            .map(|d| properties.interpolate_coordinate(&d.coordinate))
            .collect();

        let mut dependencies: IndexMap<ArtifactKey, Coordinate> = IndexMap::new();
        for descriptor in &chain {
            for dependency in &descriptor.dependencies {
                let mut coordinate = properties.interpolate_coordinate(&dependency.coordinate);
                let key = coordinate.key();
                if dependencies.contains_key(&key) {
                    continue;
                }
                if coordinate.version().is_none() {
                    coordinate.version = managed.get(&key).cloned().flatten();
                }
                dependencies.insert(key, coordinate);
            }
        }

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        tracing::debug!(
            "Project {}: {} dependencies ({} declared directly), {} ancestor(s)",
            head.coordinate,
            dependencies.len(),
            declared.len(),
            chain.len() - 1
        );

        Project {
            coordinate: head.coordinate.clone(),
            dependencies: dependencies.into_values().collect(),
            declared,
            warnings,
        }
    }

    /// Child-first chain. Stops at the first parent that cannot be loaded.
    fn parent_chain(
        &self,
        start: Descriptor,
        base_dir: Option<PathBuf>,
        warnings: &mut Vec<String>,
    ) -> Vec<Descriptor> {
        let mut visited = HashSet::new();
        visited.insert(start.coordinate.clone());
        let mut chain = vec![start];
        let mut dir = base_dir;

        while chain.len() < crate::bom::MAX_LINEAGE_DEPTH {
            let current = &chain[chain.len() - 1];
            let Some(parent) = current.parent.clone() else {
                break;
            };
            if !visited.insert(parent.clone()) {
                warnings.push(format!("Parent chain of the project loops back to {parent}"));
                break;
            }

            let relative = current
                .relative_path
                .clone()
                .unwrap_or_else(|| DEFAULT_RELATIVE_PATH.to_string());
            if let Some((descriptor, parent_dir)) = dir
                .as_deref()
                .and_then(|d| local_parent(d, &relative, &parent))
            {
                tracing::debug!("Parent {} loaded from {}", parent, parent_dir.display());
                dir = Some(parent_dir);
                chain.push(descriptor);
                continue;
            }

            match self.resolver.resolve(&parent) {
                Ok(descriptor) => {
                    dir = None;
                    chain.push(descriptor);
                }
                Err(e) => {
                    warnings.push(format!("Parent POM unavailable, inherited settings ignored: {e}"));
                    break;
                }
            }
        }

        if chain.len() >= crate::bom::MAX_LINEAGE_DEPTH {
            if let Some(parent) = &chain[chain.len() - 1].parent {
                warnings.push(format!(
                    "Parent chain of the project deeper than {}; {parent} and its ancestors ignored",
                    crate::bom::MAX_LINEAGE_DEPTH
                ));
            }
        }
        chain
    }

    /// First managed version per key across the chain and its imports.
    fn managed_versions(
        &self,
        chain: &[Descriptor],
        properties: &Properties,
        warnings: &mut Vec<String>,
    ) -> IndexMap<ArtifactKey, Option<String>> {
        let entries = chain_managed_entries(self.resolver, chain).unwrap_or_else(|e| {
            warnings.push(format!("Imported BOM unavailable, its managed versions ignored: {e}"));
            chain
                .iter()
                .flat_map(|d| ManagedEntry::declared_in(d, properties))
                .filter(|entry| !entry.import)
                .collect()
        });

        let mut versions = IndexMap::new();
        for entry in entries {
            versions.entry(entry.key).or_insert(entry.version);
        }
        versions
    }
}

/// Parent POM at `relative` from `dir`, if it is the expected artifact.
fn local_parent(dir: &Path, relative: &str, expected: &Coordinate) -> Option<(Descriptor, PathBuf)> {
    let mut path = dir.join(relative);
    if path.is_dir() {
        path = path.join("pom.xml");
    }
    if !path.is_file() {
        return None;
    }

    let descriptor = Descriptor::from_path(&path).ok()?;
    if descriptor.coordinate != *expected {
        tracing::debug!(
            "{} is {}, not the declared parent {}",
            path.display(),
            descriptor.coordinate,
            expected
        );
        return None;
    }
    let parent_dir = path.parent().map(Path::to_path_buf)?;
    Some((descriptor, parent_dir))
}
