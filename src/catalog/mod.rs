//! BOM catalogs: where the list of available BOM versions comes from.

mod stacks;

pub use stacks::{SkippedEntry, StacksCatalog};

use crate::error::Result;
use crate::model::BomReference;
use crate::utils::HttpSettings;
use std::path::PathBuf;

/// Supplies the BOM versions to resolve.
pub trait BomCatalogProvider {
    /// Every BOM version the catalog offers, in catalog order.
    fn available_boms(&self) -> Result<Vec<BomReference>>;

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}

/// A fixed list of BOM references.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    boms: Vec<BomReference>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(boms: Vec<BomReference>) -> Self {
        Self { boms }
    }
}

impl FromIterator<BomReference> for StaticCatalog {
    fn from_iter<I: IntoIterator<Item = BomReference>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl BomCatalogProvider for StaticCatalog {
    fn available_boms(&self) -> Result<Vec<BomReference>> {
        Ok(self.boms.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Where a stacks catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// `http(s)://` sources are URLs, anything else is a file path.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if crate::config::is_url(source) {
            Self::Url(source.to_string())
        } else {
            Self::File(PathBuf::from(source))
        }
    }

    /// Load the stacks catalog from this source.
    pub fn load(&self, settings: &HttpSettings) -> Result<StacksCatalog> {
        match self {
            Self::File(path) => StacksCatalog::from_path(path),
            Self::Url(url) => StacksCatalog::fetch(url, settings),
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}
