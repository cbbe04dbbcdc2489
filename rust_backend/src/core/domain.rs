//! Domain models for unicorn company records and the loaded dataset.
//!
//! A [`CompanyRecord`] is one row of the source table with its derived fields
//! (`year_joined`, numeric `valuation`) computed once at load time. A
//! [`Dataset`] pairs the records with the normalized `DataFrame` they came from;
//! neither is mutated after construction, every query produces a new view.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Source and derived column names.
pub mod columns {
    pub const COMPANY: &str = "Company";
    pub const VALUATION: &str = "Valuation";
    pub const DATE_JOINED: &str = "Date Joined";
    pub const INDUSTRY: &str = "Industry";
    pub const CITY: &str = "City";
    pub const COUNTRY: &str = "Country/Region";
    pub const CONTINENT: &str = "Continent";
    pub const YEAR_FOUNDED: &str = "Year Founded";
    pub const FUNDING: &str = "Funding";
    pub const SELECT_INVESTORS: &str = "Select Investors";

    pub const YEAR_JOINED: &str = "Year Joined";
    pub const VALUATION_NUM: &str = "Valuation_num";

    /// Columns the loader refuses to work without.
    pub const REQUIRED: [&str; 8] = [
        COMPANY,
        VALUATION,
        DATE_JOINED,
        COUNTRY,
        CITY,
        INDUSTRY,
        YEAR_FOUNDED,
        SELECT_INVESTORS,
    ];

    /// Columns the normalizer appends, in order.
    pub const DERIVED: [&str; 2] = [YEAR_JOINED, VALUATION_NUM];
}

/// One company that joined the billion-valuation list.
///
/// # Fields
///
/// * `row` - Zero-based data row in the source table, kept when other rows are skipped
/// * `valuation_text` - Valuation as written in the source, e.g. `"$180B"`
/// * `valuation` - Valuation in billions, always finite and non-negative
/// * `year_joined` - Calendar year of `date_joined`
/// * `city`, `select_investors` - The two fields the source leaves blank
/// * `continent`, `funding` - Carried when the source has those columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub row: usize,
    pub company: String,
    pub valuation_text: String,
    pub valuation: f64,
    pub date_joined: NaiveDate,
    pub year_joined: i32,
    pub industry: String,
    pub city: Option<String>,
    pub country: String,
    pub continent: Option<String>,
    pub year_founded: i32,
    pub funding: Option<String>,
    pub select_investors: Option<String>,
}

impl CompanyRecord {
    /// Returns true if the record matches the `(city, industry)` pair exactly.
    ///
    /// A record without a city never matches.
    pub fn matches(&self, city: &str, industry: &str) -> bool {
        self.city.as_deref() == Some(city) && self.industry == industry
    }

    /// Years between founding and joining the list (negative for bad data).
    pub fn years_to_unicorn(&self) -> i32 {
        self.year_joined - self.year_founded
    }
}

/// Ordered, immutable collection of company records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    frame: DataFrame,
    records: Vec<CompanyRecord>,
}

impl Dataset {
    /// Pairs a normalized frame with its records; `records[i]` is frame row `i`.
    pub(crate) fn new(frame: DataFrame, records: Vec<CompanyRecord>) -> Self {
        debug_assert_eq!(frame.height(), records.len());
        Self { frame, records }
    }

    /// Builds a dataset from records alone, synthesizing the canonical frame.
    ///
    /// Optional source columns (`Continent`, `Funding`) are included only when
    /// at least one record carries them.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use unicorn_analysis::core::domain::{CompanyRecord, Dataset};
    ///
    /// let record = CompanyRecord {
    ///     row: 0,
    ///     company: "Acme".into(),
    ///     valuation_text: "$2B".into(),
    ///     valuation: 2.0,
    ///     date_joined: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
    ///     year_joined: 2021,
    ///     industry: "Hardware".into(),
    ///     city: Some("Beijing".into()),
    ///     country: "China".into(),
    ///     continent: None,
    ///     year_founded: 2015,
    ///     funding: None,
    ///     select_investors: None,
    /// };
    /// let dataset = Dataset::from_records(vec![record]).unwrap();
    /// assert_eq!(dataset.len(), 1);
    /// assert_eq!(dataset.frame().width(), 10);
    /// ```
    pub fn from_records(records: Vec<CompanyRecord>) -> PolarsResult<Self> {
        let with_continent = records.iter().any(|r| r.continent.is_some());
        let with_funding = records.iter().any(|r| r.funding.is_some());

        let text = |name: &str, cells: Vec<Option<&str>>| Column::new(name.into(), cells);
        let dates: Vec<String> = records
            .iter()
            .map(|r| r.date_joined.format("%Y-%m-%d").to_string())
            .collect();

        let mut series = vec![
            text(columns::COMPANY, records.iter().map(|r| Some(r.company.as_str())).collect()),
            text(
                columns::VALUATION,
                records.iter().map(|r| Some(r.valuation_text.as_str())).collect(),
            ),
            text(columns::DATE_JOINED, dates.iter().map(|d| Some(d.as_str())).collect()),
            text(columns::INDUSTRY, records.iter().map(|r| Some(r.industry.as_str())).collect()),
            text(columns::CITY, records.iter().map(|r| r.city.as_deref()).collect()),
            text(columns::COUNTRY, records.iter().map(|r| Some(r.country.as_str())).collect()),
        ];
        if with_continent {
            series.push(text(
                columns::CONTINENT,
                records.iter().map(|r| r.continent.as_deref()).collect(),
            ));
        }
        let founded: Vec<String> = records.iter().map(|r| r.year_founded.to_string()).collect();
        series.push(text(
            columns::YEAR_FOUNDED,
            founded.iter().map(|y| Some(y.as_str())).collect(),
        ));
        if with_funding {
            series.push(text(
                columns::FUNDING,
                records.iter().map(|r| r.funding.as_deref()).collect(),
            ));
        }
        series.push(text(
            columns::SELECT_INVESTORS,
            records.iter().map(|r| r.select_investors.as_deref()).collect(),
        ));
        series.extend(derived_columns(&records));

        Ok(Self::new(DataFrame::new(series)?, records))
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    /// Normalized frame: source columns followed by the derived ones.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Source-table row of each record, in dataset order.
    ///
    /// Differs from the position once bad rows were skipped at load time.
    pub fn source_rows(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.row).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompanyRecord> {
        self.records.iter()
    }

    /// Distinct countries in first-appearance order.
    pub fn countries(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.country.as_str()) {
                seen.push(&record.country);
            }
        }
        seen
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a CompanyRecord;
    type IntoIter = std::slice::Iter<'a, CompanyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Builds the join year from a date; kept here so every producer agrees.
pub fn year_of(date: NaiveDate) -> i32 {
    date.year()
}

/// `Year Joined` (Int32) and `Valuation_num` (Float64) for the given records.
pub(crate) fn derived_columns(records: &[CompanyRecord]) -> [Column; 2] {
    let years: Vec<i32> = records.iter().map(|r| r.year_joined).collect();
    let valuations: Vec<f64> = records.iter().map(|r| r.valuation).collect();
    [
        Column::new(columns::YEAR_JOINED.into(), years),
        Column::new(columns::VALUATION_NUM.into(), valuations),
    ]
}
