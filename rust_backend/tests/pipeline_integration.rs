//! End-to-end tests: CSV file on disk through the pipeline to written outputs.

use std::fs;
use std::io::Write;

use tempfile::{tempdir, NamedTempFile};

use unicorn_analysis::config::AnalysisConfig;
use unicorn_analysis::error::{AnalysisError, LoadError};
use unicorn_analysis::parsing::ParsePolicy;
use unicorn_analysis::preprocessing::{run_analysis, AnalysisPipeline};
use unicorn_analysis::transformations::SearchCriterion;

// ==================== Helper Functions ====================

const COMPANIES: &str = "\
Company,Valuation,Date Joined,Industry,City,Country/Region,Continent,Year Founded,Funding,Select Investors
Bytedance,$180B,4/7/17,Artificial intelligence,Beijing,China,Asia,2012,$8B,Sequoia Capital China
SpaceX,$100B,12/1/12,Other,Hawthorne,United States,North America,2002,$7B,Founders Fund
SHEIN,$100B,7/3/18,E-commerce & direct-to-consumer,Shenzhen,China,Asia,2008,$2B,Tiger Global Management
Klarna,$46B,12/12/11,Fintech,Stockholm,Sweden,Europe,2005,$4B,Institutional Venture Partners
Revolut,$33B,4/26/18,Fintech,London,United Kingdom,Europe,2015,$2B,index Ventures
Celonis,$11B,6/1/16,Data management & analytics,Munich,Germany,Europe,2011,$1B,Accel
N26,$9B,1/10/19,Fintech,Berlin,Germany,Europe,2013,$1B,
Trade Republic,$5B,5/18/21,Fintech,Berlin,Germany,Europe,2015,$1B,Accel
Mirakl,$4B,9/21/21,Internet software & services,Paris,France,Europe,2012,$1B,Felix Capital
Nothing,$1B,2/2/22,Hardware,London,United Kingdom,Europe,2020,$144M,
Xiaohongshu,$20B,3/20/16,E-commerce & direct-to-consumer,Shanghai,China,Asia,2013,$1B,GGV Capital
Anduril,$8B,9/24/21,Hardware,,United States,North America,2017,$2B,Founders Fund
";

fn write_companies(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn config_for(file: &NamedTempFile, out: &std::path::Path) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.input.path = file.path().to_path_buf();
    config.output.dir = out.to_path_buf();
    config
}

// ==================== Tests ====================

#[test]
fn test_full_run_writes_charts_and_report() {
    let file = write_companies(COMPANIES);
    let out = tempdir().unwrap();
    let report = run_analysis(config_for(&file, out.path())).unwrap();

    assert_eq!(report.overview.rows, 12);
    assert_eq!(report.overview.oldest_founded, Some(2002));
    assert_eq!(report.checksum.len(), 64);
    assert_eq!(report.source.as_deref(), Some(file.path()));

    for name in [
        "valuation_box_plot",
        "top_countries",
        "recent_joiners_map",
        "global_map",
        "focus_continent_map",
    ] {
        assert!(out.path().join("charts").join(format!("{}.json", name)).exists());
    }

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(written["checksum"], report.checksum.as_str());
    assert!(written.get("charts").is_none());
}

#[test]
fn test_missing_data_comparison() {
    let file = write_companies(COMPANIES);
    let report = AnalysisPipeline::with_config(config_for(&file, tempdir().unwrap().path()))
        .run()
        .unwrap();

    // Two blank investors and one blank city
    assert_eq!(report.missing.counts.total, 3);
    assert_eq!(report.missing.rows_with_missing, vec![6, 9, 11]);
    assert_eq!(report.missing.rows_dropped.n_rows, 9);
    assert_eq!(report.missing.columns_dropped.n_columns, report.overview.columns - 2);
    // The last row's blank city has nothing below it
    assert_eq!(report.missing.imputed.remaining_missing, 1);
}

#[test]
fn test_investor_queries() {
    let file = write_companies(COMPANIES);
    let report = AnalysisPipeline::with_config(config_for(&file, tempdir().unwrap().path()))
        .run()
        .unwrap();

    let matches: Vec<_> = report
        .criteria_matches
        .iter()
        .map(|r| (r.city.as_deref().unwrap_or(""), r.company.as_str()))
        .collect();
    assert_eq!(matches, vec![("London", "Nothing")]);

    assert_eq!(report.country_sums.entries()[0].country, "China");
    assert_eq!(report.country_sums.get("China"), Some(300.0));
    assert_eq!(report.country_sums.get("Germany"), Some(25.0));

    let top: Vec<_> = report.top_countries.iter().map(|e| e.country.as_str()).collect();
    assert_eq!(top, vec!["Sweden", "Germany", "France"]);

    let recent: Vec<_> =
        report.recent_joiners.entries().iter().map(|e| e.country.as_str()).collect();
    assert_eq!(recent, vec!["United States", "Germany", "France", "United Kingdom"]);

    let europe: Vec<_> = report.continent_sums.iter().map(|e| e.country.as_str()).collect();
    assert_eq!(europe, vec!["Sweden", "Germany", "France"]);
}

#[test]
fn test_skipped_rows_keep_source_numbering() {
    let file = write_companies(&COMPANIES.replace("$46B", "n/a"));
    let mut config = config_for(&file, tempdir().unwrap().path());
    config.input.parse_policy = ParsePolicy::Skip;
    let report = AnalysisPipeline::with_config(config).run().unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].row, 3);
    assert_eq!(report.overview.rows, 11);
    // Same rows as the full file: numbering does not shift past the skipped row
    assert_eq!(report.missing.rows_with_missing, vec![6, 9, 11]);
    let reviewed: Vec<_> = report.missing.review.iter().map(|r| r.row).collect();
    assert_eq!(reviewed, vec![6, 9, 11]);
}

#[test]
fn test_malformed_criteria_do_not_stop_the_run() {
    let file = write_companies(COMPANIES);
    let mut config = config_for(&file, tempdir().unwrap().path());
    config.queries.criteria = vec![
        SearchCriterion::new("London", ""),
        SearchCriterion::new("London", "Hardware"),
    ];
    let report = AnalysisPipeline::with_config(config).run().unwrap();

    assert!(report.criteria_matches.is_empty());
    assert!(report.criteria_error.is_some());
    assert_eq!(report.country_sums.get("China"), Some(300.0));
}

#[test]
fn test_missing_input_is_load_error() {
    let mut config = AnalysisConfig::default();
    config.input.path = "/no/such/companies.csv".into();
    let err = AnalysisPipeline::with_config(config).run().unwrap_err();
    assert!(matches!(err, AnalysisError::Load(LoadError::NotFound(_))));
}

#[test]
fn test_bad_valuation_aborts_by_default() {
    let file = write_companies(&COMPANIES.replace("$46B", "n/a"));
    let err = AnalysisPipeline::with_config(config_for(&file, tempdir().unwrap().path()))
        .run()
        .unwrap_err();
    match err {
        AnalysisError::Parse(e) => {
            assert_eq!(e.row, 3);
            assert_eq!(e.column, "Valuation");
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_config_file_drives_run() {
    let file = write_companies(COMPANIES);
    let out = tempdir().unwrap();
    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        "[input]\npath = {:?}\n\n[queries]\ntop_n = 1\nexcluded_countries = []\n\n[output]\ndir = {:?}\nwrite_charts = false\n",
        file.path(),
        out.path()
    )
    .unwrap();

    let config = AnalysisConfig::from_file(config_file.path()).unwrap();
    let report = run_analysis(config).unwrap();
    assert_eq!(report.top_countries.len(), 1);
    assert_eq!(report.top_countries[0].country, "China");
    assert!(out.path().join("report.json").exists());
    assert!(!out.path().join("charts").exists());
}
