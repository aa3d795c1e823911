use crate::error::{HypeError, Result};
use crate::table::Value;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Logical attribute name -> physical column name or prefix, in the order the
/// entries were written.
pub type ColumnMapping = IndexMap<String, String>;

pub const DEFAULT_SORT_KEY: &str = "up_area";

// Per-table preparation applied before alignment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableSpec {
    #[serde(default)]
    pub id_column: Option<String>,
    #[serde(default)]
    pub rename: Option<ColumnMapping>,
}

impl TableSpec {
    pub fn new(id_column: Option<&str>, rename: Option<ColumnMapping>) -> Self {
        TableSpec {
            id_column: id_column.map(str::to_string),
            rename,
        }
    }
}

// Where a table is read from, plus how to prepare it
#[derive(Debug, Clone, Deserialize)]
pub struct TableInput {
    pub path: PathBuf,
    #[serde(default)]
    pub layer: Option<String>,
    #[serde(default)]
    pub delimiter: Option<char>,
    #[serde(flatten)]
    pub spec: TableSpec,
}

impl TableInput {
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        self.delimiter
            .map(|c| {
                if c.is_ascii() {
                    Ok(c as u8)
                } else {
                    Err(HypeError::Config(format!(
                        "delimiter '{c}' is not an ASCII character"
                    )))
                }
            })
            .transpose()
    }
}

fn default_sort_key() -> String {
    DEFAULT_SORT_KEY.to_string()
}

/// Inputs of the GeoData pipeline, read from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoDataConfig {
    pub tables: Vec<TableInput>,
    #[serde(default = "default_sort_key")]
    pub sort_key: String,
    pub outfile: PathBuf,
}

impl GeoDataConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| HypeError::io(path, e))?;
        let mut config: GeoDataConfig = serde_json::from_str(&text)?;
        // relative table paths are taken from the config file's directory
        if let Some(base) = path.parent() {
            for table in &mut config.tables {
                if table.path.is_relative() {
                    table.path = base.join(&table.path);
                }
            }
            if config.outfile.is_relative() {
                config.outfile = base.join(&config.outfile);
            }
        }
        Ok(config)
    }
}

/// Reads a JSON object of `logical: physical` pairs, keeping key order.
pub fn read_mapping(path: &Path) -> Result<ColumnMapping> {
    let text = std::fs::read_to_string(path).map_err(|e| HypeError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

// Parameter value: one scalar or one value per soil/land-cover class
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    List(Vec<Value>),
    Scalar(Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub value: ParameterValue,
    #[serde(default)]
    pub comment: String,
}

/// A dictionary entry is either a verbatim heading line (stored under the
/// `section_head` key) or a parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DictionaryEntry {
    Heading(String),
    Parameter(Parameter),
}

pub type ParameterDictionary = IndexMap<String, DictionaryEntry>;

/// Default parameter dictionaries, grouped by scheme.
///
/// The library is plain data supplied by the caller. `soil` and `land_cover`
/// are keyed by scheme name (`usda`, `cec`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterLibrary {
    #[serde(default)]
    pub general: IndexMap<String, ParameterDictionary>,
    #[serde(default)]
    pub soil: IndexMap<String, IndexMap<String, ParameterDictionary>>,
    #[serde(default)]
    pub land_cover: IndexMap<String, IndexMap<String, ParameterDictionary>>,
}

impl ParameterLibrary {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| HypeError::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Debug, Clone)]
pub struct ParameterOptions {
    pub soil_number: usize,
    pub soil_type: String,
    pub land_cover_number: usize,
    pub land_cover_type: String,
}

impl Default for ParameterOptions {
    fn default() -> Self {
        ParameterOptions {
            soil_number: 12,
            soil_type: "usda".to_string(),
            land_cover_number: 19,
            land_cover_type: "cec".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geodata_config_defaults_and_order() {
        let json = r#"{
            "tables": [
                {"path": "/data/sub.csv", "id_column": "COMID",
                 "rename": {"subid": "COMID_", "precip": "p", "area": "unitarea"}},
                {"path": "/data/riv.gpkg", "layer": "rivers"}
            ],
            "outfile": "/out/GeoData.txt"
        }"#;
        let config: GeoDataConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.sort_key, "up_area");
        assert_eq!(config.tables[0].spec.id_column.as_deref(), Some("COMID"));
        let keys: Vec<_> = config.tables[0]
            .spec
            .rename
            .as_ref()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["subid", "precip", "area"]);
        assert!(config.tables[1].spec.rename.is_none());
        assert_eq!(config.tables[1].layer.as_deref(), Some("rivers"));
    }

    #[test]
    fn test_delimiter_byte() {
        let mut input: TableInput = serde_json::from_str(r#"{"path": "a.txt"}"#).unwrap();
        assert_eq!(input.delimiter_byte().unwrap(), None);
        input.delimiter = Some('\t');
        assert_eq!(input.delimiter_byte().unwrap(), Some(b'\t'));
        input.delimiter = Some('é');
        assert!(matches!(input.delimiter_byte(), Err(HypeError::Config(_))));
    }

    #[test]
    fn test_parameter_library_entries() {
        let json = r#"{
            "general": {
                "flags": {
                    "section_head": "!! General flags",
                    "lp": {"value": 0.6, "comment": "limit for PET"},
                    "ttpi": {"value": 1, "comment": ""}
                }
            },
            "soil": {
                "usda": {
                    "wcfc": {"wcfc1": {"value": [0.1, 0.2], "comment": "field capacity"}}
                }
            }
        }"#;
        let library: ParameterLibrary = serde_json::from_str(json).unwrap();
        let flags = &library.general["flags"];
        assert_eq!(
            flags["section_head"],
            DictionaryEntry::Heading("!! General flags".into())
        );
        assert_eq!(
            flags["lp"],
            DictionaryEntry::Parameter(Parameter {
                value: ParameterValue::Scalar(Value::Float(0.6)),
                comment: "limit for PET".into(),
            })
        );
        let wcfc = &library.soil["usda"]["wcfc"]["wcfc1"];
        assert!(matches!(
            wcfc,
            DictionaryEntry::Parameter(Parameter { value: ParameterValue::List(v), .. }) if v.len() == 2
        ));
        assert!(library.land_cover.is_empty());
    }
}
