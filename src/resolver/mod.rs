//! Artifact descriptor resolution.
//!
//! A [`DescriptorResolver`] turns a versioned coordinate into a parsed
//! [`Descriptor`]. Failures are [`ResolutionError`] values so callers can
//! skip the affected BOM and keep going.
//!
//! Implementations:
//! - [`LocalRepository`]: a `~/.m2/repository` style directory
//! - `RemoteRepository` (feature `remote`): an HTTP Maven repository
//! - [`ChainedResolver`]: tries several resolvers in order
//! - [`InMemoryResolver`]: a fixed set of descriptors

#[cfg(feature = "remote")]
mod cache;
#[cfg(feature = "remote")]
mod remote;

#[cfg(feature = "remote")]
pub use cache::DescriptorCache;
#[cfg(feature = "remote")]
pub use remote::RemoteRepository;

use crate::error::{ResolutionError, Result};
use crate::model::Coordinate;
use crate::pom::Descriptor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source of artifact descriptors.
pub trait DescriptorResolver {
    /// Fetch and parse the descriptor of a versioned coordinate.
    fn resolve(&self, coordinate: &Coordinate) -> std::result::Result<Descriptor, ResolutionError>;

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}

/// Repository-relative path of a coordinate's POM:
/// `org/jboss/bom/eap6/1.0/eap6-1.0.pom`.
///
/// Returns None for a coordinate without a version.
#[must_use]
pub fn repository_path(coordinate: &Coordinate) -> Option<String> {
    let version = coordinate.version()?;
    Some(format!(
        "{}/{}/{}/{}-{}.pom",
        coordinate.group.replace('.', "/"),
        coordinate.artifact,
        version,
        coordinate.artifact,
        version
    ))
}

/// Parse descriptor content, mapping failures to `InvalidDescriptor`.
pub(crate) fn parse_descriptor(
    coordinate: &Coordinate,
    content: &str,
) -> std::result::Result<Descriptor, ResolutionError> {
    Descriptor::parse(content).map_err(|e| ResolutionError::invalid(coordinate, e.to_string()))
}

// ============================================================================
// Local repository
// ============================================================================

/// A local repository directory in Maven layout.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/.m2/repository`
    #[must_use]
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".m2").join("repository"))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DescriptorResolver for LocalRepository {
    fn resolve(&self, coordinate: &Coordinate) -> std::result::Result<Descriptor, ResolutionError> {
        let relative = repository_path(coordinate)
            .ok_or_else(|| ResolutionError::invalid(coordinate, "coordinate has no version"))?;
        let path = self.root.join(relative);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ResolutionError::not_found(coordinate));
            }
            Err(e) => {
                return Err(ResolutionError::fetch(
                    coordinate,
                    format!("{}: {e}", path.display()),
                ));
            }
        };

        tracing::debug!("Resolved {} from {}", coordinate, path.display());
        parse_descriptor(coordinate, &content)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

// ============================================================================
// Chained resolver
// ============================================================================

/// Tries each resolver in order until one returns a descriptor.
///
/// `NotFound` moves on to the next resolver. Any other failure is remembered
/// and reported if no later resolver succeeds.
#[derive(Default)]
pub struct ChainedResolver {
    resolvers: Vec<Box<dyn DescriptorResolver>>,
}

impl ChainedResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver to the chain.
    #[must_use]
    pub fn with(mut self, resolver: impl DescriptorResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn push(&mut self, resolver: Box<dyn DescriptorResolver>) {
        self.resolvers.push(resolver);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl DescriptorResolver for ChainedResolver {
    fn resolve(&self, coordinate: &Coordinate) -> std::result::Result<Descriptor, ResolutionError> {
        let mut first_failure = None;

        for resolver in &self.resolvers {
            match resolver.resolve(coordinate) {
                Ok(descriptor) => return Ok(descriptor),
                Err(e) if e.is_not_found() => {
                    tracing::debug!("{} not in {} repository", coordinate, resolver.name());
                }
                Err(e) => {
                    tracing::debug!("{} repository failed: {}", resolver.name(), e);
                    first_failure.get_or_insert(e);
                }
            }
        }

        Err(first_failure.unwrap_or_else(|| ResolutionError::not_found(coordinate)))
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

// ============================================================================
// In-memory resolver
// ============================================================================

/// Descriptors held in memory, keyed by their own coordinate.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResolver {
    descriptors: HashMap<Coordinate, Descriptor>,
}

impl InMemoryResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, descriptor: Descriptor) {
        self.descriptors
            .insert(descriptor.coordinate.clone(), descriptor);
    }

    /// Parse POM XML and insert the result.
    pub fn insert_pom(&mut self, content: &str) -> Result<()> {
        self.insert(Descriptor::parse(content)?);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl DescriptorResolver for InMemoryResolver {
    fn resolve(&self, coordinate: &Coordinate) -> std::result::Result<Descriptor, ResolutionError> {
        self.descriptors
            .get(coordinate)
            .cloned()
            .ok_or_else(|| ResolutionError::not_found(coordinate))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolutionErrorKind;
    use tempfile::TempDir;

    fn pom(group: &str, artifact: &str, version: &str) -> String {
        format!(
            "<project><groupId>{group}</groupId><artifactId>{artifact}</artifactId><version>{version}</version></project>"
        )
    }

    #[test]
    fn test_repository_path() {
        let c = Coordinate::versioned("org.jboss.bom", "jboss-javaee-6.0-with-tools", "1.0.4.Final");
        assert_eq!(
            repository_path(&c).as_deref(),
            Some("org/jboss/bom/jboss-javaee-6.0-with-tools/1.0.4.Final/jboss-javaee-6.0-with-tools-1.0.4.Final.pom")
        );
        assert!(repository_path(&Coordinate::new("g", "a")).is_none());
    }

    #[test]
    fn test_local_repository() {
        let tmp = TempDir::new().unwrap();
        let c = Coordinate::versioned("org.example", "bom", "1.0");
        let path = tmp.path().join(repository_path(&c).unwrap());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, pom("org.example", "bom", "1.0")).unwrap();

        let repo = LocalRepository::new(tmp.path());
        assert_eq!(repo.resolve(&c).unwrap().coordinate, c);

        let missing = Coordinate::versioned("org.example", "bom", "2.0");
        assert!(repo.resolve(&missing).unwrap_err().is_not_found());
    }

    #[test]
    fn test_local_repository_invalid_descriptor() {
        let tmp = TempDir::new().unwrap();
        let c = Coordinate::versioned("g", "a", "1");
        let path = tmp.path().join(repository_path(&c).unwrap());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "<project><groupId>g</groupId></project>").unwrap();

        let err = LocalRepository::new(tmp.path()).resolve(&c).unwrap_err();
        assert!(matches!(err.kind, ResolutionErrorKind::InvalidDescriptor(_)));
    }

    #[test]
    fn test_chained_resolver_falls_through() {
        let mut first = InMemoryResolver::new();
        first.insert_pom(&pom("g", "a", "1")).unwrap();
        let mut second = InMemoryResolver::new();
        second.insert_pom(&pom("g", "b", "1")).unwrap();

        let chain = ChainedResolver::new().with(first).with(second);
        assert_eq!(chain.len(), 2);
        assert!(chain.resolve(&Coordinate::versioned("g", "a", "1")).is_ok());
        assert!(chain.resolve(&Coordinate::versioned("g", "b", "1")).is_ok());
        assert!(chain
            .resolve(&Coordinate::versioned("g", "c", "1"))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_chained_resolver_reports_first_real_failure() {
        struct Broken;
        impl DescriptorResolver for Broken {
            fn resolve(&self, c: &Coordinate) -> std::result::Result<Descriptor, ResolutionError> {
                Err(ResolutionError::fetch(c, "connection refused"))
            }
            fn name(&self) -> &'static str {
                "broken"
            }
        }

        let chain = ChainedResolver::new().with(Broken).with(InMemoryResolver::new());
        let err = chain.resolve(&Coordinate::versioned("g", "a", "1")).unwrap_err();
        assert_eq!(err.kind, ResolutionErrorKind::Fetch("connection refused".into()));
    }
}
