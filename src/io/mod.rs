pub mod csv;
pub mod gpkg;

use crate::error::{HypeError, Result};
use crate::table::Table;
use std::path::Path;

/// Loads a table from a delimited text file or, when `layer` is given, from
/// a GeoPackage layer.
pub fn load_table(path: &Path, layer: Option<&str>, delimiter: Option<u8>) -> Result<Table> {
    match layer {
        Some(layer) => gpkg::read_layer(path, layer),
        None if gpkg::is_geopackage(path) => Err(HypeError::Config(format!(
            "{} is a GeoPackage; a layer name is required",
            path.display()
        ))),
        None => {
            let delimiter = delimiter.unwrap_or_else(|| csv::delimiter_for(path));
            csv::read_table(path, delimiter)
        }
    }
}
