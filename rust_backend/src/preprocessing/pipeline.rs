use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::algorithms::analysis::{
    box_plot_stats, country_sum, overview, top_n_excluding, AggregateView, BoxPlotStats,
    CountryTotal, DatasetOverview,
};
use crate::config::{AnalysisConfig, OutputSettings};
use crate::core::domain::CompanyRecord;
use crate::error::{AnalysisResult, ParseError};
use crate::io::loaders::{CompanyLoadResult, CompanyLoader};
use crate::preprocessing::validator::{DatasetValidator, ValidationResult};
use crate::reporting::charts::{self, ChartArtifact, GeoScope};
use crate::reporting::write_json;
use crate::transformations::cleaning::{resolve, MissingDataReport, MissingSentinels};
use crate::transformations::filtering::{
    criteria_filter, filter_by_continent, year_filter, SearchCriteria, SearchCriterion,
};

/// Everything one analysis run produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: Option<PathBuf>,
    /// SHA-256 of the input bytes
    pub checksum: String,
    pub skipped: Vec<ParseError>,
    pub validation: ValidationResult,
    pub overview: DatasetOverview,
    /// Resolver run with the native missing marker only
    pub missing: MissingDataReport,
    /// Resolver run with the configured sentinel literals, if any
    pub sensitivity: Option<MissingDataReport>,
    pub criteria: Vec<SearchCriterion>,
    /// Why the configured criteria were rejected; matches are empty then
    pub criteria_error: Option<String>,
    pub criteria_matches: Vec<CompanyRecord>,
    pub country_sums: AggregateView,
    pub box_plot: Option<BoxPlotStats>,
    pub excluded_countries: Vec<String>,
    /// Top-N countries after exclusions
    pub top_countries: Vec<CountryTotal>,
    pub min_year_joined: i32,
    /// Country sums over companies that joined after `min_year_joined`
    pub recent_joiners: AggregateView,
    /// Every country except the excluded ones
    pub outliers_removed: Vec<CountryTotal>,
    pub focus_continent: String,
    /// Country sums for the focus continent, exclusions applied
    pub continent_sums: Vec<CountryTotal>,
    #[serde(skip)]
    pub charts: Vec<ChartArtifact>,
}

impl AnalysisReport {
    /// Write `report.json` and `charts/*.json` under `settings.dir`.
    ///
    /// Returns the paths written.
    pub fn write_outputs(&self, settings: &OutputSettings) -> AnalysisResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        if settings.write_charts {
            let chart_dir = settings.dir.join("charts");
            for chart in &self.charts {
                written.push(chart.write_to(&chart_dir)?);
            }
        }
        if settings.write_report {
            let path = settings.dir.join("report.json");
            write_json(&path, self)?;
            written.push(path);
        }
        log::info!("Wrote {} output files to {}", written.len(), settings.dir.display());
        Ok(written)
    }
}

/// Runs load, quality summary, missing-data comparison, queries and charts
/// in that order.
pub struct AnalysisPipeline {
    config: AnalysisConfig,
}

impl AnalysisPipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze the configured input file.
    pub fn run(&self) -> AnalysisResult<AnalysisReport> {
        self.run_file(&self.config.input.path)
    }

    /// Analyze a specific input file, ignoring `input.path`.
    pub fn run_file(&self, path: &Path) -> AnalysisResult<AnalysisReport> {
        let delimiter = self.config.delimiter_byte()?;
        let policy = self.config.input.parse_policy;
        let loaded = CompanyLoader::load_from_file(path, delimiter, policy)?;
        self.analyze(loaded)
    }

    /// Analyze delimited text held in memory (useful for testing)
    pub fn run_str(&self, content: &str) -> AnalysisResult<AnalysisReport> {
        let delimiter = self.config.delimiter_byte()?;
        let policy = self.config.input.parse_policy;
        let loaded = CompanyLoader::load_from_str(content, delimiter, policy)?;
        self.analyze(loaded)
    }

    fn analyze(&self, loaded: CompanyLoadResult) -> AnalysisResult<AnalysisReport> {
        let queries = &self.config.queries;
        let CompanyLoadResult {
            dataset,
            skipped,
            checksum,
            source,
            ..
        } = loaded;
        log::info!("Analyzing {} companies ({} rows skipped)", dataset.len(), skipped.len());

        // Step 1: Quality summary and exploration
        let validation = DatasetValidator::validate(&dataset, skipped.len());
        for warning in &validation.warnings {
            log::warn!("{}", warning);
        }
        let overview = overview(&dataset);

        // Step 2: Missing data, plus a sensitivity pass when sentinels are configured
        let source_rows = dataset.source_rows();
        let missing = resolve(dataset.frame(), &source_rows, &MissingSentinels::native())?;
        let sensitivity = if self.config.missing.sentinels.is_empty() {
            None
        } else {
            let literals = self.config.missing.sentinels.iter().cloned();
            let sentinels = MissingSentinels::with_literals(literals);
            Some(resolve(dataset.frame(), &source_rows, &sentinels)?)
        };

        // Step 3: Investor queries
        let (criteria, criteria_error) = match SearchCriteria::new(queries.criteria.clone()) {
            Ok(criteria) => (criteria, None),
            Err(e) => {
                log::warn!("Ignoring investor criteria: {}", e);
                (SearchCriteria::default(), Some(e.to_string()))
            }
        };
        let criteria_matches: Vec<CompanyRecord> = if criteria.is_empty() {
            Vec::new()
        } else {
            criteria_filter(&dataset, &criteria).into_iter().cloned().collect()
        };

        let excluded = &queries.excluded_countries;
        let country_sums = country_sum(&dataset)?;
        let box_plot = box_plot_stats(&country_sums);
        let top_countries = top_n_excluding(&country_sums, queries.top_n, excluded);
        let outliers_removed = top_n_excluding(&country_sums, country_sums.len(), excluded);
        let recent_joiners = country_sum(year_filter(&dataset, queries.min_year_joined))?;

        let continent_view = country_sum(filter_by_continent(&dataset, &queries.focus_continent))?;
        let continent_sums = top_n_excluding(&continent_view, continent_view.len(), excluded);
        log::info!(
            "Queries: {} criteria matches, {} countries, {} recent-joiner countries",
            criteria_matches.len(),
            country_sums.len(),
            recent_joiners.len()
        );

        // Step 4: Charts
        let scope = GeoScope::for_continent(&queries.focus_continent);
        // Without a continent column the focus map shows the outlier-free world data
        // through the continent's projection.
        let focus_entries = if continent_sums.is_empty() {
            &outliers_removed
        } else {
            &continent_sums
        };
        let charts = vec![
            charts::box_plot(&country_sums, box_plot.as_ref()),
            charts::bar_chart(
                "top_countries",
                &format!("Top {} countries by valuation", queries.top_n),
                &top_countries,
            ),
            charts::valuation_map(
                "recent_joiners_map",
                &format!("Companies that joined after {}", queries.min_year_joined),
                recent_joiners.entries(),
                GeoScope::World,
            ),
            charts::valuation_map(
                "global_map",
                "Global Unicorn Company Values",
                &outliers_removed,
                GeoScope::World,
            ),
            charts::valuation_map(
                "focus_continent_map",
                &format!("{} Unicorn Value Companies", queries.focus_continent),
                focus_entries,
                scope,
            ),
        ];

        Ok(AnalysisReport {
            source,
            checksum,
            skipped,
            validation,
            overview,
            missing,
            sensitivity,
            criteria: queries.criteria.clone(),
            criteria_error,
            criteria_matches,
            country_sums,
            box_plot,
            excluded_countries: queries.excluded_countries.clone(),
            top_countries,
            min_year_joined: queries.min_year_joined,
            recent_joiners,
            outliers_removed,
            focus_continent: queries.focus_continent.clone(),
            continent_sums,
            charts,
        })
    }
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function: run the pipeline and write its outputs.
pub fn run_analysis(config: AnalysisConfig) -> AnalysisResult<AnalysisReport> {
    let pipeline = AnalysisPipeline::with_config(config);
    let report = pipeline.run()?;
    report.write_outputs(&pipeline.config().output)?;
    Ok(report)
}
