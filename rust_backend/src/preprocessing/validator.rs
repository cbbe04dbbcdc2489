//! Dataset quality summary.
//!
//! Nothing here rejects individual records: parsing already guarantees the
//! typed fields. The validator counts the gaps and oddities an analyst should
//! know about before reading the aggregates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::domain::Dataset;

/// Validation status with categorized issues and statistics.
///
/// Errors make `is_valid` false, warnings are informational.
///
/// # Examples
///
/// ```
/// use unicorn_analysis::preprocessing::validator::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_error("Dataset is empty".to_string());
/// assert!(!result.is_valid);
/// assert_eq!(result.errors.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Counts gathered during validation.
///
/// # Fields
///
/// * `total_records` - Records in the dataset
/// * `missing_city` - Records without a city
/// * `missing_investors` - Records without select investors
/// * `duplicate_companies` - Records whose company name appeared earlier
/// * `joined_before_founded` - Records that joined the list before their founding year
/// * `skipped_rows` - Source rows dropped by the normalizer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_records: usize,
    pub missing_city: usize,
    pub missing_investors: usize,
    pub duplicate_companies: usize,
    pub joined_before_founded: usize,
    pub skipped_rows: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds a critical error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DatasetValidator;

impl DatasetValidator {
    /// Summarizes the quality of a normalized dataset.
    ///
    /// `skipped_rows` is the number of rows the normalizer dropped.
    pub fn validate(dataset: &Dataset, skipped_rows: usize) -> ValidationResult {
        let mut result = ValidationResult::new();
        let mut stats = ValidationStats {
            total_records: dataset.len(),
            skipped_rows,
            ..ValidationStats::default()
        };

        if dataset.is_empty() {
            result.add_error("Dataset contains no records".to_string());
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for record in dataset {
            if record.city.is_none() {
                stats.missing_city += 1;
            }
            if record.select_investors.is_none() {
                stats.missing_investors += 1;
            }
            if record.years_to_unicorn() < 0 {
                stats.joined_before_founded += 1;
            }
            let count = seen.entry(record.company.as_str()).or_insert(0);
            if *count > 0 {
                stats.duplicate_companies += 1;
            }
            *count += 1;
        }

        if stats.duplicate_companies > 0 {
            result.add_warning(format!(
                "{} records repeat an earlier company name",
                stats.duplicate_companies
            ));
        }
        if stats.joined_before_founded > 0 {
            result.add_warning(format!(
                "{} records joined the list before their founding year",
                stats.joined_before_founded
            ));
        }
        if skipped_rows > 0 {
            result.add_warning(format!("{} source rows were skipped while parsing", skipped_rows));
        }

        result.stats = stats;
        result
    }
}
