//! Helpers around the polars `DataFrame` that carries the companies table.
//!
//! Source columns are held as `String` so the missing-data strategies stay
//! generic over column names: dropping columns changes the schema, so those
//! operations never go through
//! [`CompanyRecord`](crate::core::domain::CompanyRecord). The normalizer
//! appends the typed `Year Joined` (Int32) and `Valuation_num` (Float64).

use polars::prelude::*;

/// A single cell rendered as text. `None` is the native missing marker.
pub type Cell = Option<String>;

/// Builds a frame of `String` columns from row-major cells.
///
/// Rejects rows whose width differs from the header.
///
/// # Examples
///
/// ```
/// use unicorn_analysis::core::frame::text_frame;
///
/// let df = text_frame(
///     &["Company".to_string(), "City".to_string()],
///     &[vec![Some("Acme".to_string()), None]],
/// )
/// .unwrap();
/// assert_eq!(df.shape(), (1, 2));
/// assert_eq!(df.column("City").unwrap().null_count(), 1);
/// ```
pub fn text_frame(columns: &[String], rows: &[Vec<Cell>]) -> PolarsResult<DataFrame> {
    if let Some((idx, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != columns.len())
    {
        polars_bail!(
            ShapeMismatch: "row {} has {} cells, expected {}",
            idx,
            row.len(),
            columns.len()
        );
    }

    let series: Vec<Column> = columns
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let cells: Vec<Option<&str>> = rows.iter().map(|row| row[col].as_deref()).collect();
            Column::new(name.as_str().into(), cells)
        })
        .collect();
    DataFrame::new(series)
}

/// Total cell count (rows × columns).
pub fn size(df: &DataFrame) -> usize {
    df.height() * df.width()
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Column names in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names_str()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Text of one cell, `None` when null or out of range.
pub fn cell_text(column: &Column, row: usize) -> Cell {
    match column.get(row) {
        Ok(value) if !value.is_null() => Some(value.str_value().into_owned()),
        _ => None,
    }
}

/// Every cell of one row as text, in column order.
pub fn row_cells(df: &DataFrame, row: usize) -> Vec<Cell> {
    df.get_columns()
        .iter()
        .map(|column| cell_text(column, row))
        .collect()
}

/// True for every row that has at least one null cell.
pub fn null_row_mask(df: &DataFrame) -> BooleanChunked {
    let empty = BooleanChunked::full("missing".into(), false, df.height());
    df.get_columns()
        .iter()
        .fold(empty, |mask, column| &mask | &column.is_null())
}
