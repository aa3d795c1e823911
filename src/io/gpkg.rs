use crate::error::Result;
use crate::table::{Column, Table, Value};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use tracing::debug;

pub fn is_geopackage(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gpkg") || e.eq_ignore_ascii_case("sqlite"))
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

// Declared types a GeoPackage uses for geometry columns
const GEOMETRY_TYPES: [&str; 14] = [
    "BLOB",
    "GEOMETRY",
    "POINT",
    "LINESTRING",
    "POLYGON",
    "MULTIPOINT",
    "MULTILINESTRING",
    "MULTIPOLYGON",
    "GEOMETRYCOLLECTION",
    "CIRCULARSTRING",
    "COMPOUNDCURVE",
    "CURVEPOLYGON",
    "MULTICURVE",
    "MULTISURFACE",
];

fn is_geometry_type(decl_type: &str) -> bool {
    GEOMETRY_TYPES
        .iter()
        .any(|t| decl_type.trim().eq_ignore_ascii_case(t))
}

// Read the attribute columns of a layer. Geometry columns are skipped: those
// declared with a geometry type, and any other column holding a BLOB. Rows
// come back in storage order.
pub fn read_layer(path: &Path, layer: &str) -> Result<Table> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let query = format!("SELECT * FROM {}", quote_identifier(layer));
    let mut stmt = conn.prepare(&query)?;
    let (names, mut skip): (Vec<String>, Vec<bool>) = stmt
        .columns()
        .iter()
        .map(|c| {
            let geometry = c.decl_type().is_some_and(is_geometry_type);
            (c.name().to_string(), geometry)
        })
        .unzip();

    let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        for (i, column) in values.iter_mut().enumerate() {
            let value = match row.get_ref(i)? {
                ValueRef::Null => Value::Missing,
                ValueRef::Integer(v) => Value::Int(v),
                ValueRef::Real(v) => Value::Float(v),
                ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
                ValueRef::Blob(_) => {
                    skip[i] = true;
                    Value::Missing
                }
            };
            column.push(value);
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .zip(skip)
        .filter_map(|((name, values), geometry)| {
            if geometry {
                debug!(layer, column = %name, "skipping geometry column");
                None
            } else {
                Some(Column::new(name, values))
            }
        })
        .collect();
    Table::from_columns(columns)
}
