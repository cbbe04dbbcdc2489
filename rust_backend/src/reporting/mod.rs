//! Console tables and chart files for an analysis run.
//!
//! # Modules
//!
//! - [`tables`]: Aligned plain-text tables for the terminal
//! - [`charts`]: Plotly figure JSON for the box plot, bar chart and maps

pub mod charts;
pub mod tables;

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};

pub use charts::{bar_chart, box_plot, valuation_map, ChartArtifact, GeoScope};
pub use tables::format_table;

/// Pretty-print `value` as JSON at `path`, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> AnalysisResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| AnalysisError::Output {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).map_err(|source| AnalysisError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}
