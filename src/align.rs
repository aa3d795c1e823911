//! Aligning per-subbasin attribute tables on their identifiers and merging
//! them into the GeoData table.

use crate::config::TableSpec;
use crate::error::{HypeError, Result};
use crate::io::csv::{WriteMode, write_table};
use crate::resolve::resolve;
use crate::table::Table;
use std::path::Path;
use tracing::{info, warn};

/// Re-indexes `table` by its identifier column and applies its rename
/// mapping, keeping only the renamed columns.
pub fn prepare_table(mut table: Table, spec: &TableSpec) -> Result<Table> {
    if let Some(id) = &spec.id_column {
        table.set_index(id)?;
    }
    match &spec.rename {
        Some(mapping) if !mapping.is_empty() => resolve(table, mapping, true),
        _ => Ok(table),
    }
}

/// Checks that every table carries the same index, values and order, by
/// comparing adjacent pairs.
pub fn check_alignment(tables: &[Table]) -> Result<()> {
    for (left, pair) in tables.windows(2).enumerate() {
        let (a, b) = (pair[0].index(), pair[1].index());
        if a != b {
            let position = a
                .iter()
                .zip(b)
                .position(|(x, y)| x != y)
                .unwrap_or_else(|| a.len().min(b.len()));
            return Err(HypeError::IndexMismatch {
                left,
                right: left + 1,
                position,
            });
        }
    }
    Ok(())
}

/// Prepares, aligns and merges `tables`, then orders the rows by
/// `sort_key` ascending and drops it.
///
/// `specs[i]` applies to `tables[i]`; tables past the end of `specs` are
/// used as they are.
pub fn align_and_merge(tables: Vec<Table>, specs: &[TableSpec], sort_key: &str) -> Result<Table> {
    if specs.len() > tables.len() {
        warn!(
            specs = specs.len(),
            tables = tables.len(),
            "more table specs than tables; the extra specs are ignored"
        );
    }
    let default_spec = TableSpec::default();
    let prepared = tables
        .into_iter()
        .enumerate()
        .map(|(i, table)| prepare_table(table, specs.get(i).unwrap_or(&default_spec)))
        .collect::<Result<Vec<_>>>()?;

    check_alignment(&prepared)?;
    info!(
        tables = prepared.len(),
        rows = prepared.first().map_or(0, Table::n_rows),
        "the indexes of all tables are exactly the same with the same order"
    );

    let mut merged = Table::hstack(prepared)?;
    merged.sort_by_column(sort_key)?;
    merged.reset_index();
    merged.drop_column(sort_key)?;
    Ok(merged)
}

/// Writes the merged GeoData table, tab-delimited with a header row.
///
/// Nothing is written unless alignment and merging succeed.
pub fn write_geodata(
    tables: Vec<Table>,
    specs: &[TableSpec],
    sort_key: &str,
    outfile: &Path,
) -> Result<Table> {
    let merged = align_and_merge(tables, specs, sort_key)?;
    write_table(outfile, &merged, true, WriteMode::Truncate)?;
    info!(rows = merged.n_rows(), path = %outfile.display(), "GeoData written");
    Ok(merged)
}
