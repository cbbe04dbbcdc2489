use serde::{Deserialize, Serialize};

use crate::core::domain::{CompanyRecord, Dataset};
use crate::error::QueryError;

/// One `(city, industry)` pair an investor is interested in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriterion {
    pub city: String,
    pub industry: String,
}

impl SearchCriterion {
    pub fn new(city: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            industry: industry.into(),
        }
    }
}

/// Validated, de-duplicated set of criteria; keeps first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    pairs: Vec<SearchCriterion>,
}

impl SearchCriteria {
    /// Rejects criteria with a blank city or industry.
    pub fn new(pairs: Vec<SearchCriterion>) -> Result<Self, QueryError> {
        let mut out: Vec<SearchCriterion> = Vec::with_capacity(pairs.len());
        for (index, pair) in pairs.into_iter().enumerate() {
            if pair.city.trim().is_empty() {
                return Err(QueryError::BlankField { index, field: "city" });
            }
            if pair.industry.trim().is_empty() {
                return Err(QueryError::BlankField {
                    index,
                    field: "industry",
                });
            }
            if !out.contains(&pair) {
                out.push(pair);
            }
        }
        Ok(Self { pairs: out })
    }

    pub fn pairs(&self) -> &[SearchCriterion] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Records whose `(city, industry)` matches any criterion exactly.
///
/// Behaves like an inner join of the criteria with the dataset: results are
/// grouped by criterion in criteria order, source order within a group.
/// Empty criteria give an empty result.
pub fn criteria_filter<'a>(
    dataset: &'a Dataset,
    criteria: &SearchCriteria,
) -> Vec<&'a CompanyRecord> {
    if criteria.is_empty() {
        log::warn!("Criteria filter called with no criteria; returning no records");
        return Vec::new();
    }

    let matched: Vec<&CompanyRecord> = criteria
        .pairs()
        .iter()
        .flat_map(|c| dataset.iter().filter(move |r| r.matches(&c.city, &c.industry)))
        .collect();

    log::debug!(
        "Criteria filter matched {} records for {} criteria",
        matched.len(),
        criteria.pairs().len()
    );
    matched
}

/// Records that joined the list strictly after `min_year`.
pub fn year_filter(dataset: &Dataset, min_year: i32) -> Vec<&CompanyRecord> {
    dataset.iter().filter(|r| r.year_joined > min_year).collect()
}

/// Records on the given continent; empty when the source has no continent column.
pub fn filter_by_continent<'a>(dataset: &'a Dataset, continent: &str) -> Vec<&'a CompanyRecord> {
    dataset
        .iter()
        .filter(|r| r.continent.as_deref() == Some(continent))
        .collect()
}
