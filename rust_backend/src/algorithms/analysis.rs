use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::domain::{columns, CompanyRecord, Dataset};

const COMPANIES: &str = "companies";

/// Summed valuation for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryTotal {
    pub country: String,
    /// Sum of valuations in billions
    pub valuation: f64,
    pub companies: usize,
}

/// Country → summed valuation, sorted by sum descending.
///
/// Every country of the input appears exactly once. Ties keep the order in
/// which the countries were first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateView {
    entries: Vec<CountryTotal>,
}

impl AggregateView {
    pub fn entries(&self) -> &[CountryTotal] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, country: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.country == country)
            .map(|e| e.valuation)
    }

    /// First `n` entries (fewer if the view is shorter).
    pub fn head(&self, n: usize) -> &[CountryTotal] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.valuation).collect()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.valuation).sum()
    }
}

/// Group records by country and sum their valuations.
///
/// # Examples
///
/// ```
/// use unicorn_analysis::algorithms::analysis::country_sum;
/// use unicorn_analysis::core::domain::CompanyRecord;
///
/// let records: Vec<CompanyRecord> = Vec::new();
/// assert!(country_sum(&records).unwrap().is_empty());
/// ```
pub fn country_sum<'a, I>(records: I) -> PolarsResult<AggregateView>
where
    I: IntoIterator<Item = &'a CompanyRecord>,
{
    let (countries, valuations): (Vec<&str>, Vec<f64>) = records
        .into_iter()
        .map(|r| (r.country.as_str(), r.valuation))
        .unzip();
    let df = DataFrame::new(vec![
        Column::new(columns::COUNTRY.into(), countries),
        Column::new(columns::VALUATION_NUM.into(), valuations),
    ])?;

    // Stable grouping keeps first-seen order; the stable sort keeps it for ties.
    let sums = df
        .lazy()
        .group_by_stable([col(columns::COUNTRY)])
        .agg([
            col(columns::VALUATION_NUM).sum(),
            col(columns::VALUATION_NUM).count().alias(COMPANIES),
        ])
        .sort(
            [columns::VALUATION_NUM],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()?;

    let country = sums.column(columns::COUNTRY)?.str()?;
    let valuation = sums.column(columns::VALUATION_NUM)?.f64()?;
    let companies = sums.column(COMPANIES)?.cast(&DataType::UInt64)?;
    let companies = companies.u64()?;

    let entries = country
        .into_iter()
        .zip(valuation)
        .zip(companies)
        .map(|((country, valuation), companies)| CountryTotal {
            country: country.unwrap_or_default().to_string(),
            valuation: valuation.unwrap_or_default(),
            companies: companies.unwrap_or_default() as usize,
        })
        .collect();
    Ok(AggregateView { entries })
}

/// First `n` entries of `view` after removing the excluded countries.
///
/// Returns fewer than `n` entries when not enough countries remain.
pub fn top_n_excluding(
    view: &AggregateView,
    n: usize,
    excluded: &[String],
) -> Vec<CountryTotal> {
    view.entries()
        .iter()
        .filter(|e| !excluded.iter().any(|x| x == &e.country))
        .take(n)
        .cloned()
        .collect()
}

/// `describe()`-style statistics for one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; 0 when fewer than two values.
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Compute summary statistics, `None` for an empty slice.
///
/// Quartiles use linear interpolation between closest ranks.
pub fn describe(values: &[f64]) -> Option<SummaryStats> {
    let ca = Float64Chunked::from_slice("values".into(), values);
    let quantile = |q: f64| ca.quantile(q, QuantileMethod::Linear).ok().flatten();

    let count = ca.len();
    let std = if count > 1 { ca.std(1).unwrap_or(0.0) } else { 0.0 };
    Some(SummaryStats {
        count,
        mean: ca.mean()?,
        std,
        min: ca.min()?,
        q1: quantile(0.25)?,
        median: quantile(0.5)?,
        q3: quantile(0.75)?,
        max: ca.max()?,
    })
}

/// Box-plot geometry for the country sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
    /// Smallest value within `q1 - 1.5 * iqr`
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * iqr`
    pub upper_whisker: f64,
    /// Countries beyond the whiskers, in view order
    pub outliers: Vec<CountryTotal>,
}

/// Quartiles, 1.5×IQR whiskers and outlier countries of an aggregate view.
pub fn box_plot_stats(view: &AggregateView) -> Option<BoxPlotStats> {
    let stats = describe(&view.values())?;
    let iqr = stats.q3 - stats.q1;
    let low_fence = stats.q1 - 1.5 * iqr;
    let high_fence = stats.q3 + 1.5 * iqr;

    let inside = view
        .entries()
        .iter()
        .map(|e| e.valuation)
        .filter(|v| *v >= low_fence && *v <= high_fence);
    let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
    let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);

    let outliers = view
        .entries()
        .iter()
        .filter(|e| e.valuation < low_fence || e.valuation > high_fence)
        .cloned()
        .collect();

    Some(BoxPlotStats {
        q1: stats.q1,
        median: stats.median,
        q3: stats.q3,
        iqr,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Non-missing cell count for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPresence {
    pub column: String,
    pub non_null: usize,
}

/// First look at the dataset: shape, presence per column and numeric summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    pub presence: Vec<ColumnPresence>,
    pub valuation: Option<SummaryStats>,
    pub year_founded: Option<SummaryStats>,
    pub year_joined: Option<SummaryStats>,
    pub oldest_founded: Option<i32>,
    pub countries: usize,
    pub industries: usize,
}

/// Compute the dataset overview.
pub fn overview(dataset: &Dataset) -> DatasetOverview {
    let df = dataset.frame();
    let presence = df
        .get_columns()
        .iter()
        .map(|column| ColumnPresence {
            column: column.name().to_string(),
            non_null: column.len() - column.null_count(),
        })
        .collect();

    let valuations: Vec<f64> = dataset.iter().map(|r| r.valuation).collect();
    let founded: Vec<f64> = dataset.iter().map(|r| r.year_founded as f64).collect();
    let joined: Vec<f64> = dataset.iter().map(|r| r.year_joined as f64).collect();

    let mut industries: Vec<&str> = dataset.iter().map(|r| r.industry.as_str()).collect();
    industries.sort_unstable();
    industries.dedup();

    DatasetOverview {
        rows: df.height(),
        columns: df.width(),
        presence,
        valuation: describe(&valuations),
        year_founded: describe(&founded),
        year_joined: describe(&joined),
        oldest_founded: dataset.iter().map(|r| r.year_founded).min(),
        countries: dataset.countries().len(),
        industries: industries.len(),
    }
}
