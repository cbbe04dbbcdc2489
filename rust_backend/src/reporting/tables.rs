//! Plain-text tables for console output.

use crate::algorithms::analysis::{BoxPlotStats, CountryTotal, DatasetOverview, SummaryStats};
use crate::core::domain::{columns, CompanyRecord};
use crate::core::frame::Cell;
use crate::transformations::cleaning::{MissingCounts, MissingDataReport};

/// Render rows under a header with left-aligned, space-padded columns.
///
/// # Examples
///
/// ```
/// use unicorn_analysis::reporting::tables::format_table;
///
/// let text = format_table(&["Country", "Sum"], &[vec!["Germany".into(), "4.00".into()]]);
/// assert_eq!(text, "Country  Sum\nGermany  4.00\n");
/// ```
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render = |cells: Vec<&str>| -> String {
        let last = cells.len().saturating_sub(1);
        let mut line = String::new();
        for (i, cell) in cells.into_iter().enumerate() {
            line.push_str(cell);
            if i < last {
                let pad = widths[i] - cell.chars().count() + 2;
                line.extend(std::iter::repeat(' ').take(pad));
            }
        }
        line.push('\n');
        line
    };

    let mut out = render(headers.to_vec());
    for row in rows {
        out.push_str(&render(row.iter().map(String::as_str).take(widths.len()).collect()));
    }
    out
}

fn show(cell: &Cell) -> String {
    cell.clone().unwrap_or_else(|| "NaN".to_string())
}

fn stat_row(name: &str, stats: &Option<SummaryStats>) -> Vec<String> {
    match stats {
        Some(s) => vec![
            name.to_string(),
            s.count.to_string(),
            format!("{:.2}", s.mean),
            format!("{:.2}", s.std),
            format!("{:.2}", s.min),
            format!("{:.2}", s.q1),
            format!("{:.2}", s.median),
            format!("{:.2}", s.q3),
            format!("{:.2}", s.max),
        ],
        None => {
            let mut row = vec![name.to_string(), "0".to_string()];
            row.extend(std::iter::repeat("-".to_string()).take(7));
            row
        }
    }
}

/// Shape, per-column presence and numeric summaries.
pub fn overview_table(overview: &DatasetOverview) -> String {
    let mut out = format!(
        "Shape: {} rows x {} columns ({} countries, {} industries)\n\n",
        overview.rows, overview.columns, overview.countries, overview.industries
    );

    let presence: Vec<Vec<String>> = overview
        .presence
        .iter()
        .map(|p| vec![p.column.clone(), p.non_null.to_string()])
        .collect();
    out.push_str(&format_table(&["Column", "Non-Null Count"], &presence));
    out.push('\n');

    let stats = vec![
        stat_row(columns::VALUATION_NUM, &overview.valuation),
        stat_row(columns::YEAR_FOUNDED, &overview.year_founded),
        stat_row(columns::YEAR_JOINED, &overview.year_joined),
    ];
    out.push_str(&format_table(
        &["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"],
        &stats,
    ));

    if let Some(year) = overview.oldest_founded {
        out.push_str(&format!("\nOldest company founded in {}\n", year));
    }
    out
}

pub fn missing_counts_table(counts: &MissingCounts) -> String {
    let rows: Vec<Vec<String>> = counts
        .columns
        .iter()
        .map(|c| vec![c.column.clone(), c.missing.to_string()])
        .collect();
    let mut out = format_table(&["Column", "Missing"], &rows);
    out.push_str(&format!("Total missing: {}\n", counts.total));
    out
}

/// Cells kept by each strategy against the original.
pub fn retention_table(report: &MissingDataReport) -> String {
    let rows: Vec<Vec<String>> = [&report.rows_dropped, &report.columns_dropped, &report.imputed]
        .iter()
        .map(|o| {
            vec![
                o.strategy.label().to_string(),
                format!("{} x {}", o.n_rows, o.n_columns),
                o.retention.retained_cells.to_string(),
                format!("{:.2}%", o.retention.retained_pct),
                o.remaining_missing.to_string(),
            ]
        })
        .collect();
    let mut out = format_table(
        &["Strategy", "Shape", "Cells", "Retained", "Still missing"],
        &rows,
    );
    out.push_str(&format!(
        "Original cells: {}; removal keeping the most data: {}\n",
        report.rows_dropped.retention.original_cells,
        report.preferred_removal().label()
    ));
    out
}

/// Every previously-missing cell with the value backfill put there.
pub fn imputation_review_table(report: &MissingDataReport) -> String {
    let company_col = report.columns.iter().position(|c| c == columns::COMPANY);
    let country_col = report.columns.iter().position(|c| c == columns::COUNTRY);

    let mut rows = Vec::new();
    for review in &report.review {
        let company = company_col.map(|i| show(&review.before[i])).unwrap_or_default();
        let country = country_col.map(|i| show(&review.after[i])).unwrap_or_default();
        for (col, name) in report.columns.iter().enumerate() {
            if review.before[col].is_some() {
                continue;
            }
            rows.push(vec![
                review.row.to_string(),
                company.clone(),
                country.clone(),
                name.clone(),
                show(&review.before[col]),
                show(&review.after[col]),
            ]);
        }
    }
    format_table(
        &["Row", "Company", "Country/Region", "Column", "Before", "After"],
        &rows,
    )
}

/// `City`, `Industry`, `Company` of the matched records.
pub fn criteria_matches_table(records: &[&CompanyRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.city.clone().unwrap_or_default(),
                r.industry.clone(),
                r.company.clone(),
            ]
        })
        .collect();
    format_table(&[columns::CITY, columns::INDUSTRY, columns::COMPANY], &rows)
}

pub fn country_totals_table(entries: &[CountryTotal]) -> String {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.country.clone(),
                format!("{:.2}", e.valuation),
                e.companies.to_string(),
            ]
        })
        .collect();
    format_table(&[columns::COUNTRY, columns::VALUATION_NUM, "Companies"], &rows)
}

pub fn box_plot_table(stats: &BoxPlotStats) -> String {
    let mut out = format!(
        "Q1 {:.2}  median {:.2}  Q3 {:.2}  IQR {:.2}  whiskers [{:.2}, {:.2}]\n",
        stats.q1, stats.median, stats.q3, stats.iqr, stats.lower_whisker, stats.upper_whisker
    );
    if stats.outliers.is_empty() {
        out.push_str("No outlier countries\n");
    } else {
        out.push_str("Outlier countries:\n");
        out.push_str(&country_totals_table(&stats.outliers));
    }
    out
}
