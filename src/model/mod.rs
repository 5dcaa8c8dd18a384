//! Core value types shared by every stage of a conformance run.

mod coordinate;
mod exclude;

pub use coordinate::{ArtifactKey, BomReference, Coordinate, CoordinateError};
pub use exclude::ExcludeRule;
