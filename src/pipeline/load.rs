//! Load stage: relocation table, BOM catalog, rules and resolvers.
//!
//! Any failure here is configuration-fatal and aborts the run before
//! anything is checked.

use crate::catalog::{BomCatalogProvider, CatalogSource};
use crate::checks::RuleSet;
use crate::config::AppConfig;
use crate::error::Result;
use crate::model::{BomReference, ExcludeRule};
use crate::relocation::RelocationTable;
use crate::resolver::{ChainedResolver, LocalRepository};
use crate::utils::HttpSettings;

/// Immutable inputs of one run.
pub struct RunInputs {
    pub relocations: RelocationTable,
    /// Catalog entries, in catalog order
    pub boms: Vec<BomReference>,
    /// Catalog entries ignored while reading the catalog
    pub catalog_skipped: Vec<String>,
    pub excludes: Vec<ExcludeRule>,
    pub rules: RuleSet,
}

impl RunInputs {
    /// Inputs with an empty catalog and no excludes.
    #[must_use]
    pub fn new(relocations: RelocationTable, rules: RuleSet) -> Self {
        Self {
            relocations,
            boms: Vec::new(),
            catalog_skipped: Vec::new(),
            excludes: Vec::new(),
            rules,
        }
    }

    /// Take the catalog entries from `provider`.
    pub fn with_catalog(mut self, provider: &dyn BomCatalogProvider) -> Result<Self> {
        self.boms = provider.available_boms()?;
        tracing::debug!("Catalog '{}' lists {} BOM(s)", provider.name(), self.boms.len());
        Ok(self)
    }

    #[must_use]
    pub fn with_excludes(mut self, excludes: Vec<ExcludeRule>) -> Self {
        self.excludes = excludes;
        self
    }
}

/// Load the relocation table, catalog, exclude rules and rule set.
pub fn load_inputs(config: &AppConfig) -> Result<RunInputs> {
    let relocations = RelocationTable::load(config.rules.relocations_file.as_deref())?;
    tracing::info!("Loaded {} relocation rule(s)", relocations.len());

    let source = CatalogSource::parse(&config.catalog.source);
    tracing::info!("Reading BOM catalog from {}", source);
    let catalog = source.load(&HttpSettings::from_config(config))?;

    let rules = RuleSet::standard(&config.rules)?;
    let mut inputs = RunInputs::new(relocations, rules)
        .with_catalog(&catalog)?
        .with_excludes(config.check.exclude_rules()?);
    inputs.catalog_skipped = catalog
        .skipped()
        .iter()
        .map(ToString::to_string)
        .collect();
    Ok(inputs)
}

/// Descriptor resolvers in lookup order: local repository, then remotes.
pub fn build_resolver(config: &AppConfig) -> Result<ChainedResolver> {
    let repositories = &config.repositories;
    let mut chain = ChainedResolver::new();

    match repositories.local_root() {
        Some(root) => {
            tracing::debug!("Local repository: {}", root.display());
            chain.push(Box::new(LocalRepository::new(root)));
        }
        None => tracing::warn!("No local repository found (home directory unknown)"),
    }

    if repositories.offline {
        tracing::info!("Offline mode: remote repositories are not consulted");
        return Ok(chain);
    }

    add_remotes(config, &mut chain)?;
    Ok(chain)
}

#[cfg(feature = "remote")]
fn add_remotes(config: &AppConfig, chain: &mut ChainedResolver) -> Result<()> {
    use crate::resolver::{DescriptorCache, RemoteRepository};

    let repositories = &config.repositories;
    let settings = HttpSettings::from_config(config);
    let cache_dir = repositories.cache_path();

    for url in &repositories.remote {
        let mut remote = RemoteRepository::new(url.as_str(), &settings)?;
        if let Some(dir) = &cache_dir {
            let cache = DescriptorCache::new(dir.clone(), repositories.cache_ttl())?;
            remote = remote.with_cache(cache, repositories.bypass_cache);
        }
        tracing::debug!("Remote repository: {}", remote.base_url());
        chain.push(Box::new(remote));
    }
    Ok(())
}

#[cfg(not(feature = "remote"))]
fn add_remotes(config: &AppConfig, _chain: &mut ChainedResolver) -> Result<()> {
    if !config.repositories.remote.is_empty() {
        tracing::warn!(
            "{} remote repositories ignored: built without the `remote` feature",
            config.repositories.remote.len()
        );
    }
    Ok(())
}
