//! `${property}` interpolation for POM values.

use super::Descriptor;
use crate::model::Coordinate;
use std::collections::HashMap;

/// Upper bound on substitution passes, so self-referencing properties terminate.
const MAX_PASSES: usize = 16;

/// Property values visible to one descriptor lineage.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the effective properties of a lineage ordered child first.
    ///
    /// Ancestors are applied first so descendants override them. The
    /// `project.*` and `pom.*` built-ins describe the first descriptor.
    pub fn for_lineage(chain: &[Descriptor]) -> Self {
        let mut props = Self::new();
        for descriptor in chain.iter().rev() {
            for (name, value) in &descriptor.properties {
                props.insert(name.clone(), value.clone());
            }
        }

        if let Some(head) = chain.first() {
            let coordinate = &head.coordinate;
            for prefix in ["project", "pom"] {
                props.insert(format!("{prefix}.groupId"), coordinate.group.clone());
                props.insert(format!("{prefix}.artifactId"), coordinate.artifact.clone());
                if let Some(version) = coordinate.version() {
                    props.insert(format!("{prefix}.version"), version.to_string());
                }
            }
            if let Some(parent) = &head.parent {
                props.insert("project.parent.groupId".to_string(), parent.group.clone());
                props.insert(
                    "project.parent.artifactId".to_string(),
                    parent.artifact.clone(),
                );
                if let Some(version) = parent.version() {
                    props.insert("project.parent.version".to_string(), version.to_string());
                }
            }
        }
        props
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Replace every known `${name}` in `value`. Unknown placeholders are kept.
    #[must_use]
    pub fn interpolate(&self, value: &str) -> String {
        let mut current = value.to_string();
        for _ in 0..MAX_PASSES {
            let next = self.substitute_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Interpolate all three fields of a coordinate.
    #[must_use]
    pub fn interpolate_coordinate(&self, coordinate: &Coordinate) -> Coordinate {
        Coordinate {
            group: self.interpolate(&coordinate.group),
            artifact: self.interpolate(&coordinate.artifact),
            version: coordinate.version.as_deref().map(|v| self.interpolate(v)),
        }
    }

    fn substitute_once(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match self.get(name.trim()) {
                        Some(replacement) => out.push_str(replacement),
                        None => {
                            out.push_str("${");
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}
