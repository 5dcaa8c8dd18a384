//! Check command handler.
//!
//! Implements the `check` subcommand: run the conformance pipeline over one
//! project and print the report.

use crate::config::AppConfig;
use crate::pipeline::{self, should_use_color, write_output, CheckOutcome, OutputTarget};
use crate::reports::create_reporter_with_options;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the check command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_check(config: &AppConfig, pom_path: &Path, quiet: bool) -> Result<i32> {
    let outcome = pipeline::run(config, pom_path)
        .with_context(|| format!("checking {}", pom_path.display()))?;
    output_outcome(config, &outcome, quiet)?;
    Ok(outcome.exit_code())
}

/// Render `outcome` in the configured format and write it out.
pub fn output_outcome(config: &AppConfig, outcome: &CheckOutcome, quiet: bool) -> Result<()> {
    let target = OutputTarget::from_option(config.output.file.clone());
    let use_color = should_use_color(config.output.no_color, &target);
    let reporter = create_reporter_with_options(config.output.format, use_color);
    tracing::debug!("Rendering {} report", reporter.format());
    let content = reporter
        .generate(outcome)
        .context("failed to generate report")?;
    write_output(&content, &target, quiet)
}
