//! Analysis configuration file support.
//!
//! Every section of `analysis.toml` is optional; an empty file yields the
//! settings of the investor request the analysis was built for.
//!
//! ```toml
//! [input]
//! path = "Unicorn_Companies.csv"
//! delimiter = ","
//! parse_policy = "skip"
//!
//! [missing]
//! sentinels = ["Asia"]
//!
//! [queries]
//! top_n = 20
//! min_year_joined = 2020
//! excluded_countries = ["United States", "China", "India", "United Kingdom"]
//! criteria = [{ city = "London", industry = "Hardware" }]
//!
//! [output]
//! dir = "report"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::parsing::normalizer::ParsePolicy;
use crate::transformations::filtering::SearchCriterion;

/// Top-level analysis configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub missing: MissingSettings,
    #[serde(default)]
    pub queries: QuerySettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Input file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSettings {
    #[serde(default = "default_input_path")]
    pub path: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub parse_policy: ParsePolicy,
}

/// Missing-value settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingSettings {
    /// Extra literals treated as missing in the sensitivity pass
    #[serde(default)]
    pub sentinels: Vec<String>,
}

/// Fixed investor queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySettings {
    #[serde(default = "default_criteria")]
    pub criteria: Vec<SearchCriterion>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_excluded_countries")]
    pub excluded_countries: Vec<String>,
    #[serde(default = "default_min_year_joined")]
    pub min_year_joined: i32,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    #[serde(default = "default_focus_continent")]
    pub focus_continent: String,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_true")]
    pub write_charts: bool,
    #[serde(default = "default_true")]
    pub write_report: bool,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("Unicorn_Companies.csv")
}

fn default_delimiter() -> char {
    ','
}

fn default_criteria() -> Vec<SearchCriterion> {
    vec![
        SearchCriterion::new("Beijing", "Hardware"),
        SearchCriterion::new("San Francisco", "Hardware"),
        SearchCriterion::new("London", "Artificial intelligence"),
        SearchCriterion::new("London", "Hardware"),
    ]
}

fn default_top_n() -> usize {
    20
}

fn default_excluded_countries() -> Vec<String> {
    ["United States", "China", "India", "United Kingdom"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_min_year_joined() -> i32 {
    2020
}

fn default_preview_rows() -> usize {
    15
}

fn default_focus_continent() -> String {
    "Europe".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("report")
}

fn default_true() -> bool {
    true
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            delimiter: default_delimiter(),
            parse_policy: ParsePolicy::default(),
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            criteria: default_criteria(),
            top_n: default_top_n(),
            excluded_countries: default_excluded_countries(),
            min_year_joined: default_min_year_joined(),
            preview_rows: default_preview_rows(),
            focus_continent: default_focus_continent(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            write_charts: true,
            write_report: true,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AnalysisConfig)` if successful
    /// * `Err(ConfigError)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let deserializer = toml::Deserializer::new(content);
        let config: AnalysisConfig =
            serde_path_to_error::deserialize(deserializer).map_err(|e| ConfigError::Parse {
                path: e.path().to_string(),
                message: e.inner().to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `analysis.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("analysis.toml"),
            PathBuf::from("rust_backend/analysis.toml"),
            PathBuf::from("../analysis.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Using configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        u8::try_from(self.input.delimiter)
            .ok()
            .filter(|b| b.is_ascii())
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "delimiter {:?} is not a single ASCII character",
                    self.input.delimiter
                ))
            })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.delimiter_byte()?;
        if self.input.delimiter == '"' {
            return Err(ConfigError::Invalid("delimiter cannot be the quote character".into()));
        }
        Ok(())
    }
}
