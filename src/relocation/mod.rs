//! Relocation table: coordinate fragments mapped to replacement artifacts.
//!
//! The table is stored as a properties file where each key is a fragment
//! matched against dependency group and artifact ids, and each value is a
//! `|`-separated list of replacement coordinates:
//!
//! ```text
//! javaee=org.jboss.spec:jboss-javaee-6.0|org.jboss.spec:jboss-javaee-web-6.0
//! ```
//!
//! A bundled table ships with the crate; see [`RelocationTable::bundled`].

mod properties;

use crate::error::{BomCheckError, ErrorContext, RelocationErrorKind, Result};
use crate::model::Coordinate;
use indexmap::IndexMap;
use std::path::Path;

/// The relocation table bundled with bomcheck.
pub const BUNDLED_RELOCATIONS: &str = include_str!("../../resources/relocations.properties");

/// Ordered mapping from key fragment to replacement coordinates.
///
/// Immutable once loaded. Keys keep file order, and each key's replacements
/// keep their listed order with duplicates removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationTable {
    entries: IndexMap<String, Vec<Coordinate>>,
}

impl RelocationTable {
    /// Load the table bundled with the crate.
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_RELOCATIONS).context("bundled relocations.properties")
    }

    /// Load a table file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BomCheckError::relocation(
                path.display().to_string(),
                RelocationErrorKind::Unreadable(e.to_string()),
            )
        })?;
        Self::parse(&content).with_context(|| path.display().to_string())
    }

    /// Load the given file, or the bundled table when no path is configured.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let table = match path {
            Some(p) => Self::from_path(p)?,
            None => Self::bundled()?,
        };
        tracing::debug!("Loaded {} relocation rules", table.len());
        Ok(table)
    }

    /// Parse properties-format content.
    ///
    /// A key without replacements or with an unparsable replacement fails
    /// the whole load. A repeated key replaces the earlier value.
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = IndexMap::new();

        for entry in properties::parse(content) {
            if entry.key.is_empty() {
                return Err(BomCheckError::relocation(
                    "parsing relocation table",
                    RelocationErrorKind::EmptyKey { line: entry.line },
                ));
            }

            let mut replacements: Vec<Coordinate> = Vec::new();
            for value in entry.value.split('|').map(str::trim).filter(|v| !v.is_empty()) {
                let coordinate = value.parse::<Coordinate>().map_err(|e| {
                    BomCheckError::relocation(
                        "parsing relocation table",
                        RelocationErrorKind::InvalidReplacement {
                            line: entry.line,
                            value: value.to_string(),
                            reason: e.to_string(),
                        },
                    )
                })?;
                if !replacements.contains(&coordinate) {
                    replacements.push(coordinate);
                }
            }

            if replacements.is_empty() {
                return Err(BomCheckError::relocation(
                    "parsing relocation table",
                    RelocationErrorKind::EmptyValue {
                        line: entry.line,
                        key: entry.key,
                    },
                ));
            }
            entries.insert(entry.key, replacements);
        }

        Ok(Self { entries })
    }

    /// Replacements registered for an exact key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[Coordinate]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Iterate over `(key, replacements)` in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Coordinate])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the table in canonical `key=a|b` form.
    ///
    /// Parsing the output yields an equal table.
    #[must_use]
    pub fn to_properties(&self) -> String {
        let mut out = String::new();
        for (key, replacements) in &self.entries {
            let value = replacements
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("|");
            properties::write_entry(&mut out, key, &value);
        }
        out
    }
}

impl FromIterator<(String, Vec<Coordinate>)> for RelocationTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Coordinate>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
