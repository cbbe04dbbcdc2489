use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;

use crate::core::domain::Dataset;
use crate::error::{AnalysisResult, LoadError, ParseError};
use crate::io::checksum::calculate_checksum;
use crate::parsing::csv_parser::{check_required_columns, parse_table_reader};
use crate::parsing::normalizer::{normalize, ParsePolicy};

/// Result of loading and normalizing the companies table
#[derive(Debug, Clone)]
pub struct CompanyLoadResult {
    /// Frame exactly as read, before any derived columns
    pub raw: DataFrame,
    pub dataset: Dataset,
    /// Rows dropped under [`ParsePolicy::Skip`]
    pub skipped: Vec<ParseError>,
    /// SHA-256 of the input bytes
    pub checksum: String,
    pub source: Option<PathBuf>,
}

impl CompanyLoadResult {
    pub fn num_records(&self) -> usize {
        self.dataset.len()
    }
}

/// Reads the companies table and derives the typed dataset in one step.
pub struct CompanyLoader;

impl CompanyLoader {
    /// Load and normalize a delimited file.
    pub fn load_from_file(
        path: &Path,
        delimiter: u8,
        policy: ParsePolicy,
    ) -> AnalysisResult<CompanyLoadResult> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()).into());
        }
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading companies from {} ({} bytes)", path.display(), bytes.len());

        let mut result = Self::load_from_bytes(&bytes, delimiter, policy, Some(path))?;
        result.source = Some(path.to_path_buf());
        Ok(result)
    }

    /// Load and normalize delimited text held in memory.
    pub fn load_from_str(
        content: &str,
        delimiter: u8,
        policy: ParsePolicy,
    ) -> AnalysisResult<CompanyLoadResult> {
        Self::load_from_bytes(content.as_bytes(), delimiter, policy, None)
    }

    fn load_from_bytes(
        bytes: &[u8],
        delimiter: u8,
        policy: ParsePolicy,
        path: Option<&Path>,
    ) -> AnalysisResult<CompanyLoadResult> {
        let raw = parse_table_reader(bytes, delimiter, path)?;
        check_required_columns(&raw)?;

        let outcome = normalize(&raw, policy)?;
        Ok(CompanyLoadResult {
            raw,
            dataset: outcome.dataset,
            skipped: outcome.skipped,
            checksum: calculate_checksum(bytes),
            source: None,
        })
    }
}
