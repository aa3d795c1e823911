use crate::error::{HypeError, Result};
use crate::table::{Column, Table, Value};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

// How an output file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Truncate,
    Append,
}

/// Tab for `.txt`/`.tsv`/`.tab`, comma otherwise.
pub fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("txt" | "tsv" | "tab") => b'\t',
        _ => b',',
    }
}

pub(crate) fn open_output(path: &Path, mode: WriteMode) -> Result<File> {
    let mut options = OpenOptions::new();
    match mode {
        WriteMode::Truncate => options.write(true).create(true).truncate(true),
        WriteMode::Append => options.create(true).append(true),
    };
    options.open(path).map_err(|e| HypeError::io(path, e))
}

// Read a delimited file with a header row into a table
pub fn read_table(path: &Path, delimiter: u8) -> Result<Table> {
    let file = File::open(path).map_err(|e| HypeError::io(path, e))?;
    let buffered_reader = BufReader::new(file);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(buffered_reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut values: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

    for result in rdr.records() {
        let record = result?;
        for (column, field) in values.iter_mut().zip(record.iter()) {
            column.push(Value::parse(field));
        }
    }

    let columns = headers
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Table::from_columns(columns)
}

/// Writes `table` tab-delimited without a row index, with or without the
/// header row.
pub fn write_table(path: &Path, table: &Table, header: bool, mode: WriteMode) -> Result<()> {
    let mut out = BufWriter::new(open_output(path, mode)?);

    if header {
        let names: Vec<String> = table.columns().iter().map(|c| c.name.clone()).collect();
        write_record(&mut out, &names, path)?;
    }
    for row in table.rows() {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        write_record(&mut out, &fields, path)?;
    }
    out.flush().map_err(|e| HypeError::io(path, e))
}

// One tab-delimited line. The csv writer renders a lone empty field as `""`;
// here that record is a blank line.
fn write_record(out: &mut impl Write, fields: &[String], path: &Path) -> Result<()> {
    let line = match fields {
        [only] if only.is_empty() => b"\n".to_vec(),
        _ => {
            let mut wtr = WriterBuilder::new()
                .delimiter(b'\t')
                .has_headers(false)
                .from_writer(Vec::new());
            wtr.write_record(fields)?;
            wtr.into_inner()
                .map_err(|e| HypeError::io(path, e.into_error()))?
        }
    };
    out.write_all(&line).map_err(|e| HypeError::io(path, e))
}

/// Writes one line, terminated by a newline.
pub fn write_line(path: &Path, line: &str, mode: WriteMode) -> Result<()> {
    let mut file = open_output(path, mode)?;
    writeln!(file, "{line}").map_err(|e| HypeError::io(path, e))
}
