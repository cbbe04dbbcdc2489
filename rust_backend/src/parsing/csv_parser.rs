use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use polars::prelude::DataFrame;

use crate::core::domain::columns;
use crate::core::frame::{has_column, text_frame, Cell};
use crate::error::LoadError;

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b',';

/// Parse a delimited file into a `DataFrame` of text columns and check the
/// required columns.
pub fn load_table(path: &Path, delimiter: u8) -> Result<DataFrame, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let df = parse_table_reader(file, delimiter, Some(path))?;
    check_required_columns(&df)?;
    log::debug!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Parse delimited text held in memory; same checks as [`load_table`].
pub fn parse_table_str(content: &str, delimiter: u8) -> Result<DataFrame, LoadError> {
    let df = parse_table_reader(content.as_bytes(), delimiter, None)?;
    check_required_columns(&df)?;
    Ok(df)
}

/// Read any source into a frame of `String` columns without checking the schema.
///
/// Cells are trimmed; empty cells become nulls. Rows with a different number
/// of fields than the header are rejected.
pub fn parse_table_reader<R: Read>(
    reader: R,
    delimiter: u8,
    path: Option<&Path>,
) -> Result<DataFrame, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .trim(Trim::All)
        .from_reader(reader);

    let header: Vec<String> = rdr
        .headers()
        .map_err(|e| LoadError::from_csv(path, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    if header.is_empty() || header.iter().all(|h| h.is_empty()) {
        return Err(LoadError::EmptyHeader);
    }
    if let Some(dup) = first_duplicate(&header) {
        return Err(LoadError::Malformed(format!("duplicate column '{}'", dup)));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| LoadError::from_csv(path, e))?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    None
                } else {
                    Some(field.to_string())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(text_frame(&header, &rows)?)
}

/// Fails with the list of required columns the frame lacks.
pub fn check_required_columns(df: &DataFrame) -> Result<(), LoadError> {
    let missing: Vec<String> = columns::REQUIRED
        .iter()
        .filter(|name| !has_column(df, name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::MissingColumns(missing))
    }
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    names
        .iter()
        .enumerate()
        .find(|(i, name)| names[..*i].contains(name))
        .map(|(_, name)| name.as_str())
}
