//! Matching table columns against a logical-name mapping.
//!
//! Each mapping entry `logical -> physical` resolves to one of three cases:
//!
//! - no column starts with `physical`: reported and skipped,
//! - exactly one column starts with `physical`: it becomes `logical`,
//! - several columns start with `physical`: they form a family and each is
//!   renamed `logical` + the integer value of the first digit run in its name.
//!
//! Family members are visited in lexicographic order of their original names,
//! so `p1, p10, p2` come out as `precip1, precip10, precip2`.

use crate::config::ColumnMapping;
use crate::error::{HypeError, Result};
use crate::table::Table;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));

/// Outcome of resolving one mapping entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Exact {
        logical: String,
        column: String,
    },
    Family {
        logical: String,
        /// `(original, renamed)` pairs in match order.
        members: Vec<(String, String)>,
    },
    Missing {
        logical: String,
        physical: String,
    },
}

impl Resolution {
    /// The `(original, renamed)` pairs this resolution contributes.
    pub fn renames(&self) -> Vec<(String, String)> {
        match self {
            Resolution::Exact { logical, column } => vec![(column.clone(), logical.clone())],
            Resolution::Family { members, .. } => members.clone(),
            Resolution::Missing { .. } => Vec::new(),
        }
    }
}

// digits are restringified through their integer value: "007" -> "7"
fn normalize_digits(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}

/// Resolves every mapping entry against `columns` without touching a table.
///
/// Matching is done against the original column names. A column claimed by
/// two entries is an [`HypeError::OverlappingMapping`].
pub fn plan(columns: &[String], mapping: &ColumnMapping) -> Result<Vec<Resolution>> {
    let mut claimed: HashMap<&str, &str> = HashMap::new();
    let mut resolutions = Vec::with_capacity(mapping.len());

    for (logical, physical) in mapping {
        let mut matched: Vec<&String> = columns
            .iter()
            .filter(|c| c.starts_with(physical.as_str()))
            .collect();
        matched.sort();

        for column in &matched {
            if let Some(first) = claimed.insert(column.as_str(), logical.as_str()) {
                return Err(HypeError::OverlappingMapping {
                    column: column.to_string(),
                    first: first.to_string(),
                    second: logical.clone(),
                });
            }
        }

        let resolution = match matched.as_slice() {
            [] => {
                warn!(
                    logical = %logical,
                    "there is no column name starting with '{physical}' in the table"
                );
                Resolution::Missing {
                    logical: logical.clone(),
                    physical: physical.clone(),
                }
            }
            [single] => Resolution::Exact {
                logical: logical.clone(),
                column: single.to_string(),
            },
            family => {
                let members = family
                    .iter()
                    .map(|column| {
                        let number = DIGITS
                            .find(column)
                            .map(|m| normalize_digits(m.as_str()))
                            .ok_or_else(|| HypeError::MalformedColumnName {
                                column: column.to_string(),
                                prefix: physical.clone(),
                            })?;
                        Ok((column.to_string(), format!("{logical}{number}")))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Resolution::Family {
                    logical: logical.clone(),
                    members,
                }
            }
        };
        debug!(?resolution, "resolved mapping entry");
        resolutions.push(resolution);
    }
    Ok(resolutions)
}

/// Renames the columns of `table` according to `mapping`.
///
/// With `keep_only_renamed` the result holds only the renamed columns, in
/// mapping order and then family order. Otherwise every column is kept in
/// place and only the matched ones change name.
pub fn resolve(mut table: Table, mapping: &ColumnMapping, keep_only_renamed: bool) -> Result<Table> {
    let resolutions = plan(&table.column_names(), mapping)?;
    let renames: Vec<(String, String)> = resolutions.iter().flat_map(Resolution::renames).collect();

    if keep_only_renamed {
        let originals: Vec<&str> = renames.iter().map(|(from, _)| from.as_str()).collect();
        table = table.select(&originals)?;
    }
    table.rename_columns(&renames)?;
    Ok(table)
}
