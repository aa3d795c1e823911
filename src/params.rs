//! The parameter file (`par.txt`), assembled from injected default
//! dictionaries.
//!
//! Every write appends. Lines are `name\tvalue(s)\tcomment`; list values are
//! tab-joined and must hold one value per soil or land-cover class.

use crate::config::{
    DictionaryEntry, ParameterDictionary, ParameterLibrary, ParameterOptions, ParameterValue,
};
use crate::error::{HypeError, Result};
use crate::io::csv::{WriteMode, open_output};
use indexmap::IndexMap;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

fn format_value(value: &ParameterValue) -> String {
    match value {
        ParameterValue::Scalar(v) => v.to_string(),
        ParameterValue::List(values) => values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\t"),
    }
}

/// Appends one dictionary to `path`.
///
/// When `expected` is given every list value must have exactly that many
/// elements. Lines written before a failing entry stay in the file.
pub fn write_dictionary(
    path: &Path,
    dictionary: &ParameterDictionary,
    expected: Option<usize>,
) -> Result<()> {
    let mut writer = BufWriter::new(open_output(path, WriteMode::Append)?);
    for (key, entry) in dictionary {
        let line = match entry {
            DictionaryEntry::Heading(text) => text.clone(),
            DictionaryEntry::Parameter(parameter) => {
                if let (Some(expected), ParameterValue::List(values)) = (expected, &parameter.value)
                {
                    if values.len() != expected {
                        writer.flush().map_err(|e| HypeError::io(path, e))?;
                        return Err(HypeError::ArityMismatch {
                            key: key.clone(),
                            expected,
                            actual: values.len(),
                        });
                    }
                }
                format!("{key}\t{}\t{}", format_value(&parameter.value), parameter.comment)
            }
        };
        writeln!(writer, "{line}").map_err(|e| HypeError::io(path, e))?;
    }
    writer.flush().map_err(|e| HypeError::io(path, e))
}

fn find_scheme<'a>(
    schemes: &'a IndexMap<String, IndexMap<String, ParameterDictionary>>,
    name: &str,
) -> Option<&'a IndexMap<String, ParameterDictionary>> {
    schemes
        .iter()
        .find(|(scheme, _)| scheme.eq_ignore_ascii_case(name))
        .map(|(_, dictionaries)| dictionaries)
}

/// Appends the general dictionaries, then the soil dictionaries of the
/// chosen scheme, then the land-cover dictionaries of the chosen scheme.
///
/// Unknown schemes are skipped with a warning.
pub fn write_parameters(
    path: &Path,
    library: &ParameterLibrary,
    options: &ParameterOptions,
) -> Result<()> {
    for dictionary in library.general.values() {
        write_dictionary(path, dictionary, None)?;
    }

    let groups = [
        ("soil", &library.soil, &options.soil_type, options.soil_number),
        (
            "land cover",
            &library.land_cover,
            &options.land_cover_type,
            options.land_cover_number,
        ),
    ];
    for (group, schemes, scheme, count) in groups {
        match find_scheme(schemes, scheme) {
            Some(dictionaries) => {
                for dictionary in dictionaries.values() {
                    write_dictionary(path, dictionary, Some(count))?;
                }
            }
            None => warn!(group, scheme = %scheme, "no default parameters for this scheme"),
        }
    }
    info!(path = %path.display(), "parameters written");
    Ok(())
}
