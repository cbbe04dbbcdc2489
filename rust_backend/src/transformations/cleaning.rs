//! Missing-data detection and the three strategies for addressing it.
//!
//! Sentinel literals are turned into nulls up front with
//! [`MissingSentinels::apply`]; after that every strategy is a plain polars
//! operation on the frame (`drop_nulls`, a select of the null-free columns,
//! `fill_null` with a backward strategy). None of them mutates the input, so
//! the strategies can be computed side by side and compared.
//!
//! Backward fill knows nothing about the relationships between columns: a
//! missing city can be filled with a city from another country. The
//! [`ImputationReviewRow`]s in [`MissingDataReport::review`] put the before
//! and after values next to each other so the fills can be judged.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::frame::{column_names, null_row_mask, row_cells, size, Cell};

/// Which cell values count as missing.
///
/// The native marker (`None`) is always missing. Literals are extra values
/// treated the same way, e.g. a category label for a sensitivity check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingSentinels {
    literals: Vec<String>,
}

impl MissingSentinels {
    /// Only the native missing marker.
    pub fn native() -> Self {
        Self::default()
    }

    /// Native marker plus the given literals (exact, case-sensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use unicorn_analysis::transformations::cleaning::MissingSentinels;
    ///
    /// let sentinels = MissingSentinels::with_literals(["Asia"]);
    /// assert!(sentinels.is_missing(None));
    /// assert!(sentinels.is_missing(Some("Asia")));
    /// assert!(!sentinels.is_missing(Some("Europe")));
    /// ```
    pub fn with_literals<I, S>(literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for lit in literals {
            let lit = lit.into();
            if !out.contains(&lit) {
                out.push(lit);
            }
        }
        Self { literals: out }
    }

    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    pub fn is_missing(&self, cell: Option<&str>) -> bool {
        match cell {
            None => true,
            Some(value) => self.literals.iter().any(|l| l == value),
        }
    }

    /// Copy of `df` with every sentinel literal in a text column set to null.
    pub fn apply(&self, df: &DataFrame) -> PolarsResult<DataFrame> {
        if self.literals.is_empty() {
            return Ok(df.clone());
        }
        let columns = df
            .get_columns()
            .iter()
            .map(|column| {
                if column.dtype() != &DataType::String {
                    return Ok(column.clone());
                }
                let masked: StringChunked = column
                    .str()?
                    .into_iter()
                    .map(|cell| cell.filter(|value| !self.is_missing(Some(*value))))
                    .collect();
                Ok(masked.with_name(column.name().clone()).into_column())
            })
            .collect::<PolarsResult<Vec<Column>>>()?;
        DataFrame::new(columns)
    }
}

/// Missing count for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// Per-column missing counts in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCounts {
    pub columns: Vec<ColumnMissing>,
    pub total: usize,
}

impl MissingCounts {
    pub fn get(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.missing)
    }
}

/// Cell counts of a derived table against the original.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Retention {
    pub original_cells: usize,
    pub retained_cells: usize,
    /// Retained share in percent; 100 for an empty original.
    pub retained_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategy {
    DropRows,
    DropColumns,
    Backfill,
}

impl MissingStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            MissingStrategy::DropRows => "drop rows",
            MissingStrategy::DropColumns => "drop columns",
            MissingStrategy::Backfill => "backfill",
        }
    }
}

/// One strategy applied to the frame.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyOutcome {
    pub strategy: MissingStrategy,
    #[serde(skip)]
    pub frame: DataFrame,
    pub n_rows: usize,
    pub n_columns: usize,
    pub retention: Retention,
    /// Missing cells left in the derived frame.
    pub remaining_missing: usize,
}

impl StrategyOutcome {
    fn new(strategy: MissingStrategy, original: &DataFrame, frame: DataFrame) -> Self {
        Self {
            strategy,
            n_rows: frame.height(),
            n_columns: frame.width(),
            retention: retention(original, &frame),
            remaining_missing: count_missing(&frame),
            frame,
        }
    }
}

/// A row that had missing cells, before and after backward fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputationReviewRow {
    /// Data row in the source table
    pub row: usize,
    pub filled_columns: Vec<String>,
    pub unresolved_columns: Vec<String>,
    pub before: Vec<Cell>,
    pub after: Vec<Cell>,
}

/// Everything the resolver computes for one frame and sentinel set.
#[derive(Debug, Clone, Serialize)]
pub struct MissingDataReport {
    pub sentinels: MissingSentinels,
    pub columns: Vec<String>,
    pub counts: MissingCounts,
    /// Source-table rows with at least one missing cell
    pub rows_with_missing: Vec<usize>,
    pub rows_dropped: StrategyOutcome,
    pub columns_dropped: StrategyOutcome,
    pub imputed: StrategyOutcome,
    pub review: Vec<ImputationReviewRow>,
}

impl MissingDataReport {
    /// The removal strategy that keeps more cells; rows win ties.
    pub fn preferred_removal(&self) -> MissingStrategy {
        let by_columns = self.columns_dropped.retention.retained_cells;
        if by_columns > self.rows_dropped.retention.retained_cells {
            MissingStrategy::DropColumns
        } else {
            MissingStrategy::DropRows
        }
    }
}

/// Count null cells per column.
pub fn missing_counts(df: &DataFrame) -> MissingCounts {
    let columns: Vec<ColumnMissing> = df
        .get_columns()
        .iter()
        .map(|column| ColumnMissing {
            column: column.name().to_string(),
            missing: column.null_count(),
        })
        .collect();
    let total = columns.iter().map(|c| c.missing).sum();
    MissingCounts { columns, total }
}

/// Total null cells.
pub fn count_missing(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|c| c.null_count()).sum()
}

/// Positions of rows with at least one null cell.
pub fn rows_with_missing(df: &DataFrame) -> Vec<usize> {
    null_row_mask(df)
        .into_iter()
        .enumerate()
        .filter(|(_, missing)| missing.unwrap_or(false))
        .map(|(idx, _)| idx)
        .collect()
}

/// Remove every row that has a null cell.
pub fn drop_missing_rows(df: &DataFrame) -> PolarsResult<DataFrame> {
    df.drop_nulls::<String>(None)
}

/// Remove every column that has a null cell in any row.
pub fn drop_missing_columns(df: &DataFrame) -> PolarsResult<DataFrame> {
    let keep: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|column| column.null_count() == 0)
        .map(|column| column.name().clone())
        .collect();
    df.select(keep)
}

/// Replace each null with the next non-null value below it in the same
/// column.
///
/// Cells with nothing below stay null.
pub fn backfill(df: &DataFrame) -> PolarsResult<DataFrame> {
    df.fill_null(FillNullStrategy::Backward(None))
}

/// Retained cell share of `derived` relative to `original`.
pub fn retention(original: &DataFrame, derived: &DataFrame) -> Retention {
    let original_cells = size(original);
    let retained_cells = size(derived);
    let retained_pct = if original_cells == 0 {
        100.0
    } else {
        retained_cells as f64 / original_cells as f64 * 100.0
    };
    Retention {
        original_cells,
        retained_cells,
        retained_pct,
    }
}

/// Side-by-side view of the given row positions before and after imputation.
///
/// `source_rows[i]` is the source-table row of position `i`; positions past
/// its end are reported as is.
pub fn imputation_review(
    original: &DataFrame,
    imputed: &DataFrame,
    positions: &[usize],
    source_rows: &[usize],
) -> Vec<ImputationReviewRow> {
    let names = column_names(original);
    positions
        .iter()
        .filter(|&&idx| idx < original.height() && idx < imputed.height())
        .map(|&idx| {
            let before = row_cells(original, idx);
            let after = row_cells(imputed, idx);
            let mut filled_columns = Vec::new();
            let mut unresolved_columns = Vec::new();
            for (name, (b, a)) in names.iter().zip(before.iter().zip(after.iter())) {
                if b.is_none() {
                    if a.is_some() {
                        filled_columns.push(name.clone());
                    } else {
                        unresolved_columns.push(name.clone());
                    }
                }
            }
            ImputationReviewRow {
                row: source_row(source_rows, idx),
                filled_columns,
                unresolved_columns,
                before,
                after,
            }
        })
        .collect()
}

fn source_row(source_rows: &[usize], position: usize) -> usize {
    source_rows.get(position).copied().unwrap_or(position)
}

/// Run detection and all three strategies.
///
/// `source_rows` maps frame positions back to source-table rows (see
/// [`Dataset::source_rows`](crate::core::domain::Dataset::source_rows)) so
/// the report names rows the way the input file numbers them.
pub fn resolve(
    df: &DataFrame,
    source_rows: &[usize],
    sentinels: &MissingSentinels,
) -> PolarsResult<MissingDataReport> {
    let df = sentinels.apply(df)?;
    let counts = missing_counts(&df);
    let positions = rows_with_missing(&df);

    let rows_dropped =
        StrategyOutcome::new(MissingStrategy::DropRows, &df, drop_missing_rows(&df)?);
    let columns_dropped =
        StrategyOutcome::new(MissingStrategy::DropColumns, &df, drop_missing_columns(&df)?);
    let imputed = StrategyOutcome::new(MissingStrategy::Backfill, &df, backfill(&df)?);
    let review = imputation_review(&df, &imputed.frame, &positions, source_rows);

    log::info!(
        "Missing data: {} cells in {} rows; keep {:.2}% dropping rows, {:.2}% dropping columns",
        counts.total,
        positions.len(),
        rows_dropped.retention.retained_pct,
        columns_dropped.retention.retained_pct
    );

    Ok(MissingDataReport {
        sentinels: sentinels.clone(),
        columns: column_names(&df),
        counts,
        rows_with_missing: positions.iter().map(|&i| source_row(source_rows, i)).collect(),
        rows_dropped,
        columns_dropped,
        imputed,
        review,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame::{cell_text, text_frame};

    fn cell(s: &str) -> Cell {
        Some(s.to_string())
    }

    fn text(df: &DataFrame, column: &str, row: usize) -> Cell {
        cell_text(df.column(column).unwrap(), row)
    }

    /// city column has two gaps, investors one at the bottom.
    fn sample() -> DataFrame {
        text_frame(
            &["Company".into(), "City".into(), "Continent".into(), "Investors".into()],
            &[
                vec![cell("A"), None, cell("Asia"), cell("I1")],
                vec![cell("B"), cell("Berlin"), cell("Europe"), cell("I2")],
                vec![cell("C"), None, cell("Asia"), cell("I3")],
                vec![cell("D"), cell("Paris"), cell("Europe"), None],
            ],
        )
        .unwrap()
    }

    fn positions(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_missing_counts_per_column() {
        let counts = missing_counts(&sample());
        assert_eq!(counts.get("Company"), Some(0));
        assert_eq!(counts.get("City"), Some(2));
        assert_eq!(counts.get("Investors"), Some(1));
        assert_eq!(counts.total, 3);
    }

    #[test]
    fn test_sentinel_literals_count_as_missing() {
        let sentinels = MissingSentinels::with_literals(["Asia"]);
        let masked = sentinels.apply(&sample()).unwrap();
        let counts = missing_counts(&masked);
        assert_eq!(counts.get("Continent"), Some(2));
        assert_eq!(counts.total, 5);
    }

    #[test]
    fn test_sentinels_leave_numeric_columns_alone() {
        let mut df = sample();
        df.with_column(Column::new("Valuation_num".into(), vec![1.0, 2.0, 3.0, 4.0]))
            .unwrap();
        let masked = MissingSentinels::with_literals(["1"]).apply(&df).unwrap();
        assert_eq!(masked.column("Valuation_num").unwrap().null_count(), 0);
    }

    #[test]
    fn test_duplicate_literals_collapse() {
        let s = MissingSentinels::with_literals(["Asia", "Asia", "NA"]);
        assert_eq!(s.literals(), &["Asia".to_string(), "NA".to_string()]);
    }

    #[test]
    fn test_rows_with_missing() {
        assert_eq!(rows_with_missing(&sample()), vec![0, 2, 3]);
    }

    #[test]
    fn test_drop_missing_rows() {
        let dropped = drop_missing_rows(&sample()).unwrap();
        assert_eq!(dropped.height(), 1);
        assert_eq!(text(&dropped, "Company", 0), cell("B"));
        assert_eq!(dropped.width(), 4);
    }

    #[test]
    fn test_drop_missing_columns() {
        let dropped = drop_missing_columns(&sample()).unwrap();
        assert_eq!(column_names(&dropped), vec!["Company".to_string(), "Continent".to_string()]);
        assert_eq!(dropped.height(), 4);
    }

    #[test]
    fn test_backfill_takes_next_value_below() {
        let filled = backfill(&sample()).unwrap();
        assert_eq!(text(&filled, "City", 0), cell("Berlin"));
        assert_eq!(text(&filled, "City", 2), cell("Paris"));
        // Nothing below the last investors cell.
        assert_eq!(text(&filled, "Investors", 3), None);
    }

    #[test]
    fn test_backfill_replaces_sentinels_and_clears_unresolved() {
        let df = text_frame(
            &["Continent".into()],
            &[vec![cell("Asia")], vec![cell("Europe")], vec![cell("Asia")]],
        )
        .unwrap();
        let masked = MissingSentinels::with_literals(["Asia"]).apply(&df).unwrap();
        let filled = backfill(&masked).unwrap();
        assert_eq!(text(&filled, "Continent", 0), cell("Europe"));
        assert_eq!(text(&filled, "Continent", 1), cell("Europe"));
        assert_eq!(text(&filled, "Continent", 2), None);
    }

    #[test]
    fn test_backfill_does_not_touch_input() {
        let original = sample();
        let copy = original.clone();
        let _ = backfill(&original).unwrap();
        assert!(original.equals_missing(&copy));
    }

    #[test]
    fn test_retention_percentages() {
        let original = sample();
        let rows = drop_missing_rows(&original).unwrap();
        let r = retention(&original, &rows);
        assert_eq!(r.original_cells, 16);
        assert_eq!(r.retained_cells, 4);
        assert!((r.retained_pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_retention_of_empty_frame_is_full() {
        let empty = text_frame(&["a".into()], &[]).unwrap();
        assert_eq!(retention(&empty, &empty).retained_pct, 100.0);
    }

    #[test]
    fn test_review_shows_fills_side_by_side() {
        let report = resolve(&sample(), &positions(4), &MissingSentinels::native()).unwrap();
        assert_eq!(report.review.len(), 3);

        let first = &report.review[0];
        assert_eq!(first.row, 0);
        assert_eq!(first.before[1], None);
        assert_eq!(first.after[1], cell("Berlin"));
        assert_eq!(first.filled_columns, vec!["City".to_string()]);
        assert!(first.unresolved_columns.is_empty());

        let last = &report.review[2];
        assert_eq!(last.unresolved_columns, vec!["Investors".to_string()]);
    }

    #[test]
    fn test_report_rows_follow_source_rows() {
        // Positions 0, 2 and 3 came from source rows 1, 5 and 6.
        let report = resolve(&sample(), &[1, 4, 5, 6], &MissingSentinels::native()).unwrap();
        assert_eq!(report.rows_with_missing, vec![1, 5, 6]);
        let rows: Vec<_> = report.review.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![1, 5, 6]);
    }

    #[test]
    fn test_resolve_compares_strategies() {
        let report = resolve(&sample(), &positions(4), &MissingSentinels::native()).unwrap();
        assert_eq!(report.rows_dropped.retention.retained_cells, 4);
        assert_eq!(report.columns_dropped.retention.retained_cells, 8);
        assert_eq!(report.imputed.retention.retained_cells, 16);
        assert_eq!(report.rows_dropped.remaining_missing, 0);
        assert_eq!(report.columns_dropped.remaining_missing, 0);
        assert_eq!(report.imputed.remaining_missing, 1);
        assert_eq!(report.preferred_removal(), MissingStrategy::DropColumns);
    }

    #[test]
    fn test_resolve_with_sentinels_does_not_touch_input() {
        let original = sample();
        let sentinels = MissingSentinels::with_literals(["Asia"]);
        let report = resolve(&original, &positions(4), &sentinels).unwrap();
        assert_eq!(report.counts.total, 5);
        assert_eq!(original.column("Continent").unwrap().null_count(), 0);
    }
}
