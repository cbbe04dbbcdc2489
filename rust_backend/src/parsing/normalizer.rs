//! Derivation of the typed company records from a raw frame.
//!
//! Two fields are computed once here and never again: the join year (from
//! `Date Joined`) and the numeric valuation in billions (from the
//! currency-formatted `Valuation`). Both are appended to the table as
//! `Year Joined` and `Valuation_num` so the missing-data views see them too.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::domain::{columns, derived_columns, year_of, CompanyRecord, Dataset};
use crate::error::{AnalysisResult, ParseError};
use crate::parsing::csv_parser::check_required_columns;

/// What to do with a row whose fields do not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Fail the whole run on the first bad row.
    #[default]
    Abort,
    /// Drop the row, log a warning and keep going.
    Skip,
}

/// Normalized dataset plus the rows that were dropped under [`ParsePolicy::Skip`].
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub dataset: Dataset,
    pub skipped: Vec<ParseError>,
}

/// Accepted layouts for `Date Joined`.
// Two-digit years first: `%Y` would read "17" as year 17.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Text columns resolved once per frame.
struct SourceColumns<'a> {
    company: &'a StringChunked,
    valuation: &'a StringChunked,
    date_joined: &'a StringChunked,
    industry: &'a StringChunked,
    city: &'a StringChunked,
    country: &'a StringChunked,
    continent: Option<&'a StringChunked>,
    year_founded: &'a StringChunked,
    funding: Option<&'a StringChunked>,
    select_investors: &'a StringChunked,
}

impl<'a> SourceColumns<'a> {
    fn resolve(raw: &'a DataFrame) -> AnalysisResult<Self> {
        check_required_columns(raw)?;
        let text = move |name: &str| -> PolarsResult<&'a StringChunked> { raw.column(name)?.str() };
        let optional = move |name: &str| -> PolarsResult<Option<&'a StringChunked>> {
            match raw.get_column_index(name) {
                Some(_) => text(name).map(Some),
                None => Ok(None),
            }
        };
        Ok(Self {
            company: text(columns::COMPANY)?,
            valuation: text(columns::VALUATION)?,
            date_joined: text(columns::DATE_JOINED)?,
            industry: text(columns::INDUSTRY)?,
            city: text(columns::CITY)?,
            country: text(columns::COUNTRY)?,
            continent: optional(columns::CONTINENT)?,
            year_founded: text(columns::YEAR_FOUNDED)?,
            funding: optional(columns::FUNDING)?,
            select_investors: text(columns::SELECT_INVESTORS)?,
        })
    }
}

/// Derive the typed dataset from a loaded frame.
///
/// Fails with a [`ParseError`] naming the row and column of the first
/// non-conforming value under [`ParsePolicy::Abort`]. Under
/// [`ParsePolicy::Skip`] the row is left out of both the records and the
/// normalized frame; the kept records still carry their source row.
pub fn normalize(raw: &DataFrame, policy: ParsePolicy) -> AnalysisResult<NormalizeOutcome> {
    let cols = SourceColumns::resolve(raw)?;

    let mut records = Vec::with_capacity(raw.height());
    let mut kept: Vec<IdxSize> = Vec::with_capacity(raw.height());
    let mut skipped = Vec::new();

    for row in 0..raw.height() {
        match build_record(&cols, row) {
            Ok(record) => {
                kept.push(row as IdxSize);
                records.push(record);
            }
            Err(err) => match policy {
                ParsePolicy::Abort => return Err(err.into()),
                ParsePolicy::Skip => {
                    log::warn!("Skipping row: {}", err);
                    skipped.push(err);
                }
            },
        }
    }

    let base = if skipped.is_empty() {
        raw.clone()
    } else {
        raw.take(&IdxCa::from_vec("kept".into(), kept))?
    };
    let normalized = base.hstack(&derived_columns(&records))?;

    log::info!(
        "Normalized {} records ({} skipped)",
        records.len(),
        skipped.len()
    );

    Ok(NormalizeOutcome {
        dataset: Dataset::new(normalized, records),
        skipped,
    })
}

fn build_record(cols: &SourceColumns<'_>, row: usize) -> Result<CompanyRecord, ParseError> {
    let required = |ca: &StringChunked, name: &str| -> Result<String, ParseError> {
        ca.get(row)
            .map(str::to_string)
            .ok_or_else(|| ParseError::new(row, name, None, "value is missing"))
    };
    let optional = |ca: Option<&StringChunked>| ca.and_then(|c| c.get(row)).map(str::to_string);
    let invalid = |name: &str, text: &str, reason: String| {
        ParseError::new(row, name, Some(text), reason)
    };

    let valuation_text = required(cols.valuation, columns::VALUATION)?;
    let valuation = parse_valuation(&valuation_text)
        .map_err(|reason| invalid(columns::VALUATION, &valuation_text, reason))?;

    let date_text = required(cols.date_joined, columns::DATE_JOINED)?;
    let date_joined = parse_date(&date_text)
        .map_err(|reason| invalid(columns::DATE_JOINED, &date_text, reason))?;

    let founded_text = required(cols.year_founded, columns::YEAR_FOUNDED)?;
    let year_founded = parse_year(&founded_text)
        .map_err(|reason| invalid(columns::YEAR_FOUNDED, &founded_text, reason))?;

    Ok(CompanyRecord {
        row,
        company: required(cols.company, columns::COMPANY)?,
        valuation_text,
        valuation,
        date_joined,
        year_joined: year_of(date_joined),
        industry: required(cols.industry, columns::INDUSTRY)?,
        city: optional(Some(cols.city)),
        country: required(cols.country, columns::COUNTRY)?,
        continent: optional(cols.continent),
        year_founded,
        funding: optional(cols.funding),
        select_investors: optional(Some(cols.select_investors)),
    })
}

/// Parse a currency-formatted valuation such as `"$2.5B"` into billions.
///
/// Leading and trailing `$`/`B` characters are stripped before parsing.
///
/// # Examples
///
/// ```
/// use unicorn_analysis::parsing::normalizer::parse_valuation;
///
/// assert_eq!(parse_valuation("$1B"), Ok(1.0));
/// assert_eq!(parse_valuation("$2.5B"), Ok(2.5));
/// assert!(parse_valuation("$-3B").is_err());
/// ```
pub fn parse_valuation(text: &str) -> Result<f64, String> {
    let stripped = text.trim().trim_matches(|c| c == '$' || c == 'B').trim();
    if stripped.is_empty() {
        return Err("no digits after stripping '$' and 'B'".to_string());
    }
    let value: f64 = stripped
        .parse()
        .map_err(|_| format!("'{}' is not a number", stripped))?;
    if !value.is_finite() {
        return Err("valuation is not finite".to_string());
    }
    if value < 0.0 {
        return Err("valuation is negative".to_string());
    }
    Ok(value)
}

/// Parse a calendar date; a trailing time part (`T...` or ` ...`) is ignored.
pub fn parse_date(text: &str) -> Result<NaiveDate, String> {
    let date_part = text
        .trim()
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .ok_or_else(|| format!("expected one of {}", DATE_FORMATS.join(", ")))
}

/// Parse a year; integral floats such as `"2012.0"` are accepted.
pub fn parse_year(text: &str) -> Result<i32, String> {
    let trimmed = text.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Ok(year);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 => Ok(v as i32),
        _ => Err("not an integer year".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::parsing::csv_parser::parse_table_str;

    const HEADER: &str =
        "Company,Valuation,Date Joined,Industry,City,Country/Region,Continent,Year Founded,Funding,Select Investors";

    fn table(rows: &[&str]) -> DataFrame {
        let content = std::iter::once(HEADER)
            .chain(rows.iter().copied())
            .collect::<Vec<_>>()
            .join("\n");
        parse_table_str(&content, b',').unwrap()
    }

    #[test]
    fn valuation_strings_become_billions() {
        assert_eq!(parse_valuation("$1B"), Ok(1.0));
        assert_eq!(parse_valuation("$2.5B"), Ok(2.5));
        assert_eq!(parse_valuation(" $180B "), Ok(180.0));
        assert_eq!(parse_valuation("7"), Ok(7.0));
    }

    #[test]
    fn bad_valuations_are_rejected() {
        assert!(parse_valuation("$B").is_err());
        assert!(parse_valuation("$1.2M").is_err());
        assert!(parse_valuation("$-1B").is_err());
        assert!(parse_valuation("$infB").is_err());
    }

    #[test]
    fn dates_in_supported_layouts() {
        let expected = NaiveDate::from_ymd_opt(2017, 4, 7).unwrap();
        assert_eq!(parse_date("2017-04-07"), Ok(expected));
        assert_eq!(parse_date("4/7/2017"), Ok(expected));
        assert_eq!(parse_date("04/07/17"), Ok(expected));
        assert_eq!(parse_date("2017-04-07T00:00:00"), Ok(expected));
        assert_eq!(parse_date("2017-04-07 00:00:00"), Ok(expected));
        assert!(parse_date("April 7th").is_err());
    }

    #[test]
    fn years_accept_integral_floats() {
        assert_eq!(parse_year("2012"), Ok(2012));
        assert_eq!(parse_year("2012.0"), Ok(2012));
        assert!(parse_year("2012.5").is_err());
        assert!(parse_year("soon").is_err());
    }

    #[test]
    fn normalize_appends_derived_columns() {
        let t = table(&[
            "Acme,$1B,2021-03-01,Hardware,Beijing,China,Asia,2015,$1B,Fund A",
            "Beta,$2.5B,2019-12-31,Fintech,,Germany,Europe,2010,$2B,",
        ]);
        let outcome = normalize(&t, ParsePolicy::Abort).unwrap();
        let ds = outcome.dataset;

        assert!(outcome.skipped.is_empty());
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].valuation, 1.0);
        assert_eq!(ds.records()[1].valuation, 2.5);
        assert_eq!(ds.records()[0].year_joined, 2021);
        assert_eq!(ds.records()[1].year_joined, 2019);
        assert_eq!(ds.records()[1].city, None);
        assert_eq!(ds.records()[1].select_investors, None);
        assert_eq!(ds.records()[0].continent.as_deref(), Some("Asia"));

        let df = ds.frame();
        assert_eq!(df.width(), 12);
        let year = df.column(columns::YEAR_JOINED).unwrap().i32().unwrap();
        let num = df.column(columns::VALUATION_NUM).unwrap().f64().unwrap();
        assert_eq!(year.get(0), Some(2021));
        assert_eq!(num.get(1), Some(2.5));
    }

    #[test]
    fn abort_policy_names_offending_row() {
        let t = table(&[
            "Acme,$1B,2021-03-01,Hardware,Beijing,China,Asia,2015,$1B,Fund A",
            "Beta,$lotsB,2019-12-31,Fintech,Berlin,Germany,Europe,2010,$2B,X",
        ]);
        match normalize(&t, ParsePolicy::Abort) {
            Err(AnalysisError::Parse(err)) => {
                assert_eq!(err.row, 1);
                assert_eq!(err.column, columns::VALUATION);
                assert_eq!(err.value, "$lotsB");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn skip_policy_drops_row_from_records_and_frame() {
        let t = table(&[
            "Acme,$1B,2021-03-01,Hardware,Beijing,China,Asia,2015,$1B,Fund A",
            "Beta,$2B,someday,Fintech,Berlin,Germany,Europe,2010,$2B,X",
            "Gamma,$3B,2020-01-01,Fintech,Paris,France,Europe,2011,$2B,Y",
        ]);
        let outcome = normalize(&t, ParsePolicy::Skip).unwrap();
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].row, 1);
        assert_eq!(outcome.skipped[0].column, columns::DATE_JOINED);

        let ds = outcome.dataset;
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.frame().height(), 2);
        assert_eq!(ds.records()[1].company, "Gamma");
        assert_eq!(ds.records()[1].row, 2);
        assert_eq!(ds.source_rows(), vec![0, 2]);
        let company = ds.frame().column(columns::COMPANY).unwrap().str().unwrap();
        assert_eq!(company.get(1), Some("Gamma"));
        let num = ds.frame().column(columns::VALUATION_NUM).unwrap().f64().unwrap();
        assert_eq!(num.get(1), Some(3.0));
    }

    #[test]
    fn missing_required_text_is_a_parse_error() {
        let t = table(&["Acme,$1B,2021-03-01,Hardware,Beijing,,Asia,2015,$1B,Fund A"]);
        let err = normalize(&t, ParsePolicy::Abort).unwrap_err();
        match err {
            AnalysisError::Parse(e) => {
                assert_eq!(e.column, columns::COUNTRY);
                assert_eq!(e.value, "<missing>");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let content = "Company,Valuation,Date Joined,Industry,City,Country/Region,Year Founded,Select Investors\n\
                       Acme,$4B,2022-01-05,AI,London,United Kingdom,2019,Fund";
        let t = parse_table_str(content, b',').unwrap();
        let ds = normalize(&t, ParsePolicy::Abort).unwrap().dataset;
        assert_eq!(ds.records()[0].continent, None);
        assert_eq!(ds.records()[0].funding, None);
        assert_eq!(ds.records()[0].valuation, 4.0);
    }
}
