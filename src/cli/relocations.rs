//! Relocations command handler.

use crate::checks::RelocationRule;
use crate::config::AppConfig;
use crate::model::Coordinate;
use crate::pipeline::{write_output, OutputTarget};
use crate::relocation::RelocationTable;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Print the active relocation table in properties form.
///
/// With `lookup`, only the entries that would flag that coordinate under
/// the configured match mode are printed.
pub fn run_relocations(
    config: &AppConfig,
    lookup: Option<&Coordinate>,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let table = RelocationTable::load(config.rules.relocations_file.as_deref())
        .context("failed to load relocation table")?;

    let table = match lookup {
        Some(dependency) => filter_table(&table, dependency, config),
        None => table,
    };

    let content = table.to_properties();
    write_output(content.trim_end(), &OutputTarget::from_option(output), quiet)
}

fn filter_table(table: &RelocationTable, dependency: &Coordinate, config: &AppConfig) -> RelocationTable {
    let rule = RelocationRule::new(config.rules.relocation_match);
    table
        .iter()
        .filter(|(key, replacements)| rule.applies(key, replacements, dependency))
        .map(|(key, replacements)| (key.to_string(), replacements.to_vec()))
        .collect()
}
