//! Plotly figure JSON for the analysis charts.
//!
//! Each chart is a complete `{"data": [...], "layout": {...}}` figure that
//! `Plotly.newPlot` or `plotly.io.from_json` can render unchanged.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{json, Value};

use crate::algorithms::analysis::{AggregateView, BoxPlotStats, CountryTotal};
use crate::core::domain::columns;
use crate::error::AnalysisResult;

/// Largest marker diameter in pixels on the maps.
const MAX_MARKER_SIZE: f64 = 20.0;

/// Map projection scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GeoScope {
    World,
    Continent(String),
}

impl GeoScope {
    /// Scope for a continent name, falling back to the world for names
    /// Plotly has no scope for.
    pub fn for_continent(name: &str) -> Self {
        let scope = name.trim().to_lowercase();
        match scope.as_str() {
            "europe" | "asia" | "africa" | "north america" | "south america" => {
                GeoScope::Continent(scope)
            }
            _ => GeoScope::World,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            GeoScope::World => "world",
            GeoScope::Continent(scope) => scope,
        }
    }
}

/// A named figure ready to be written as `<name>.json`.
#[derive(Debug, Clone, Serialize)]
pub struct ChartArtifact {
    pub name: String,
    pub title: String,
    pub figure: Value,
}

impl ChartArtifact {
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }

    /// Write the figure into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> AnalysisResult<PathBuf> {
        let path = dir.join(self.file_name());
        super::write_json(&path, &self.figure)?;
        Ok(path)
    }
}

/// Box plot of the per-country sums.
///
/// Plotly computes its own quartiles; the precomputed ones ride along in
/// `layout.meta` so the outlier countries can be read from the file.
pub fn box_plot(view: &AggregateView, stats: Option<&BoxPlotStats>) -> ChartArtifact {
    let title = "Sum of valuation per country".to_string();
    let countries: Vec<&str> = view.entries().iter().map(|e| e.country.as_str()).collect();
    let figure = json!({
        "data": [{
            "type": "box",
            "name": columns::VALUATION_NUM,
            "y": view.values(),
            "text": countries,
            "boxpoints": "outliers",
            "hoverinfo": "y+text",
        }],
        "layout": {
            "title": { "text": title },
            "yaxis": { "title": { "text": "Valuation (billions)" } },
            "meta": stats,
        },
    });
    ChartArtifact {
        name: "valuation_box_plot".to_string(),
        title,
        figure,
    }
}

/// Horizontal bar chart, largest sum on top.
pub fn bar_chart(name: &str, title: &str, entries: &[CountryTotal]) -> ChartArtifact {
    let x: Vec<f64> = entries.iter().map(|e| e.valuation).collect();
    let y: Vec<&str> = entries.iter().map(|e| e.country.as_str()).collect();
    let figure = json!({
        "data": [{
            "type": "bar",
            "orientation": "h",
            "x": x,
            "y": y,
        }],
        "layout": {
            "title": { "text": title },
            "xaxis": { "title": { "text": columns::VALUATION_NUM } },
            "yaxis": {
                "title": { "text": columns::COUNTRY },
                "autorange": "reversed",
            },
        },
    });
    ChartArtifact {
        name: name.to_string(),
        title: title.to_string(),
        figure,
    }
}

/// Bubble map with one trace per country, sized by summed valuation.
pub fn valuation_map(
    name: &str,
    title: &str,
    entries: &[CountryTotal],
    scope: GeoScope,
) -> ChartArtifact {
    let max = entries.iter().map(|e| e.valuation).fold(0.0_f64, f64::max);
    let sizeref = if max > 0.0 {
        2.0 * max / (MAX_MARKER_SIZE * MAX_MARKER_SIZE)
    } else {
        1.0
    };

    let traces: Vec<Value> = entries
        .iter()
        .map(|e| {
            json!({
                "type": "scattergeo",
                "mode": "markers",
                "name": e.country,
                "locationmode": "country names",
                "locations": [e.country],
                "text": [format!("{}: {:.2}B ({} companies)", e.country, e.valuation, e.companies)],
                "marker": {
                    "size": [e.valuation],
                    "sizemode": "area",
                    "sizeref": sizeref,
                    "sizemin": 1,
                },
            })
        })
        .collect();

    let figure = json!({
        "data": traces,
        "layout": {
            "title": { "text": title },
            "geo": { "scope": scope.as_str() },
            "legend": { "title": { "text": columns::COUNTRY } },
        },
    });
    ChartArtifact {
        name: name.to_string(),
        title: title.to_string(),
        figure,
    }
}
