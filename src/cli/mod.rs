//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod check;
mod relocations;

pub use check::{output_outcome, run_check};
pub use relocations::run_relocations;
