//! The GeoClass file: one row per soil-landcover class (SLC).

use crate::config::ColumnMapping;
use crate::error::Result;
use crate::io::csv::{WriteMode, write_line, write_table};
use crate::table::{Table, Value};
use std::path::Path;
use tracing::info;

pub const DEFAULT_COMMENT: &str = "! HYPE GeoClass";

pub const LEAD_COLUMNS: [&str; 3] = ["SLC", "landcover", "soil"];

/// Columns appended after the lead, with the value every class gets.
pub const FIXED_COLUMNS: [(&str, Value); 11] = [
    ("Main crop cropid", Value::Int(0)),
    ("Second crop cropid", Value::Int(0)),
    ("Crop rotation group", Value::Int(0)),
    ("Vegetation type", Value::Int(1)),
    ("Special class code", Value::Int(0)),
    ("Tile depth", Value::Int(0)),
    ("Stream depth", Value::Float(2.296)),
    ("Number of soil layers", Value::Int(3)),
    ("Soil layer depth 1", Value::Float(0.091)),
    ("Soil layer depth 2", Value::Float(0.493)),
    ("Soil layer depth 3", Value::Float(2.296)),
];

/// `SLC <- ID`, `landcover <- LULC`, `soil <- SOIL TYPE`.
pub fn default_mapping() -> ColumnMapping {
    [("SLC", "ID"), ("landcover", "LULC"), ("soil", "SOIL TYPE")]
        .into_iter()
        .map(|(logical, physical)| (logical.to_string(), physical.to_string()))
        .collect()
}

/// Renames the physical columns named in `mapping` to their logical names
/// (exact names only), keeps the lead columns and appends the fixed ones.
pub fn build_geoclass(mut combination: Table, mapping: &ColumnMapping) -> Result<Table> {
    let renames: Vec<(String, String)> = mapping
        .iter()
        .filter(|(_, physical)| combination.has_column(physical))
        .map(|(logical, physical)| (physical.clone(), logical.clone()))
        .collect();
    combination.rename_columns(&renames)?;

    let mut geoclass = combination.select(&LEAD_COLUMNS)?;
    for (name, value) in FIXED_COLUMNS {
        geoclass.push_constant(name, value)?;
    }
    Ok(geoclass)
}

/// Writes the GeoClass file: `comment` on the first line, then one
/// tab-delimited row per class with no header.
pub fn write_geoclass(
    combination: Table,
    outfile: &Path,
    mapping: &ColumnMapping,
    comment: &str,
) -> Result<Table> {
    let geoclass = build_geoclass(combination, mapping)?;
    write_line(outfile, comment, WriteMode::Truncate)?;
    write_table(outfile, &geoclass, false, WriteMode::Append)?;
    info!(classes = geoclass.n_rows(), path = %outfile.display(), "GeoClass written");
    Ok(geoclass)
}
