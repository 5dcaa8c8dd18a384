//! Unified error types for bomcheck.
//!
//! Fatal conditions (configuration, relocation table, catalog) are
//! [`BomCheckError`]s and abort a run. A descriptor that cannot be resolved is
//! a [`ResolutionError`]: the BOM resolver turns it into a warning and keeps
//! going. Policy violations are not errors at all; they are data in the
//! conformance report.

use crate::model::Coordinate;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bomcheck operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BomCheckError {
    /// The relocation table could not be loaded
    #[error("Relocation table unavailable: {context}")]
    Relocation {
        context: String,
        #[source]
        source: RelocationErrorKind,
    },

    /// The BOM catalog could not be loaded
    #[error("BOM catalog unavailable: {context}")]
    Catalog {
        context: String,
        #[source]
        source: CatalogErrorKind,
    },

    /// A POM descriptor could not be read
    #[error("Invalid descriptor: {context}")]
    Descriptor {
        context: String,
        #[source]
        source: DescriptorErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific relocation table error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RelocationErrorKind {
    #[error("line {line}: key '{key}' has no replacement coordinates")]
    EmptyValue { line: usize, key: String },

    #[error("line {line}: invalid replacement '{value}': {reason}")]
    InvalidReplacement {
        line: usize,
        value: String,
        reason: String,
    },

    #[error("line {line}: empty key")]
    EmptyKey { line: usize },

    #[error("cannot read table: {0}")]
    Unreadable(String),
}

/// Specific catalog error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CatalogErrorKind {
    #[error("Invalid YAML: {0}")]
    InvalidYaml(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Remote catalogs require the `remote` feature: {0}")]
    RemoteDisabled(String),
}

/// Specific descriptor error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DescriptorErrorKind {
    #[error("Invalid XML structure: {0}")]
    InvalidXml(String),

    #[error("Missing required element: {0}")]
    MissingElement(String),
}

/// Why a descriptor could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolutionErrorKind {
    #[error("descriptor not found")]
    NotFound,

    #[error("cyclic reference back to {0}")]
    Cycle(String),

    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// A recoverable failure to obtain one artifact descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot resolve {coordinate}: {kind}")]
pub struct ResolutionError {
    pub coordinate: Coordinate,
    pub kind: ResolutionErrorKind,
}

impl ResolutionError {
    pub fn new(coordinate: &Coordinate, kind: ResolutionErrorKind) -> Self {
        Self {
            coordinate: coordinate.clone(),
            kind,
        }
    }

    pub fn not_found(coordinate: &Coordinate) -> Self {
        Self::new(coordinate, ResolutionErrorKind::NotFound)
    }

    pub fn invalid(coordinate: &Coordinate, reason: impl Into<String>) -> Self {
        Self::new(coordinate, ResolutionErrorKind::InvalidDescriptor(reason.into()))
    }

    pub fn fetch(coordinate: &Coordinate, reason: impl Into<String>) -> Self {
        Self::new(coordinate, ResolutionErrorKind::Fetch(reason.into()))
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ResolutionErrorKind::NotFound)
    }
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for bomcheck operations
pub type Result<T> = std::result::Result<T, BomCheckError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl BomCheckError {
    /// Create a relocation table error with context
    pub fn relocation(context: impl Into<String>, source: RelocationErrorKind) -> Self {
        Self::Relocation {
            context: context.into(),
            source,
        }
    }

    /// Create a catalog error with context
    pub fn catalog(context: impl Into<String>, source: CatalogErrorKind) -> Self {
        Self::Catalog {
            context: context.into(),
            source,
        }
    }

    /// Create a descriptor error with context
    pub fn descriptor(context: impl Into<String>, source: DescriptorErrorKind) -> Self {
        Self::Descriptor {
            context: context.into(),
            source,
        }
    }

    /// Create a descriptor error for a missing element
    pub fn missing_element(element: impl Into<String>) -> Self {
        Self::descriptor(
            "missing required element",
            DescriptorErrorKind::MissingElement(element.into()),
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for BomCheckError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<quick_xml::DeError> for BomCheckError {
    fn from(err: quick_xml::DeError) -> Self {
        Self::descriptor(
            "XML deserialization",
            DescriptorErrorKind::InvalidXml(err.to_string()),
        )
    }
}

impl From<serde_yaml_ng::Error> for BomCheckError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::catalog(
            "YAML deserialization",
            CatalogErrorKind::InvalidYaml(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain outward: adding `"loading catalog"` to an error
/// whose context is `"YAML deserialization"` yields
/// `"loading catalog: YAML deserialization"`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<BomCheckError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: BomCheckError, new_ctx: &str) -> BomCheckError {
    match err {
        BomCheckError::Relocation {
            context: existing,
            source,
        } => BomCheckError::Relocation {
            context: chain_context(new_ctx, &existing),
            source,
        },
        BomCheckError::Catalog {
            context: existing,
            source,
        } => BomCheckError::Catalog {
            context: chain_context(new_ctx, &existing),
            source,
        },
        BomCheckError::Descriptor {
            context: existing,
            source,
        } => BomCheckError::Descriptor {
            context: chain_context(new_ctx, &existing),
            source,
        },
        BomCheckError::Io {
            path,
            message,
            source,
        } => BomCheckError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        BomCheckError::Config(msg) => BomCheckError::Config(chain_context(new_ctx, &msg)),
        BomCheckError::Validation(msg) => BomCheckError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
