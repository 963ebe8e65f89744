//! World choropleth rendering
//!
//! [`PlotlyHtmlRenderer`] writes a standalone HTML page that draws the
//! figure with plotly.js. Nothing downstream reads the page.

use crate::geocode::EnrichedScoreTable;
use crate::{Result, COUNTRY_COLUMN, ISO_COLUMN, SCORE_COLUMN};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// plotly.js bundle loaded by the rendered page
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// ColorBrewer RdYlGn, red (low) → yellow → green (high)
pub const RD_YL_GN: [&str; 11] = [
    "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#d9ef8b", "#a6d96a",
    "#66bd63", "#1a9850", "#006837",
];

/// Presentation sink for the enriched table
pub trait ChartRenderer {
    fn render(&self, table: &EnrichedScoreTable) -> Result<()>;
}

impl<R: ChartRenderer + ?Sized> ChartRenderer for &R {
    fn render(&self, table: &EnrichedScoreTable) -> Result<()> {
        (**self).render(table)
    }
}

/// Plotly choropleth figure: locations by ISO code, colored by score,
/// hover label the country name
pub fn choropleth_figure(table: &EnrichedScoreTable, title: &str) -> Value {
    let locations: Vec<&str> = table.rows.iter().map(|r| r.iso_alpha.as_str()).collect();
    let scores: Vec<i64> = table.rows.iter().map(|r| r.score).collect();
    let countries: Vec<&str> = table.rows.iter().map(|r| r.country.as_str()).collect();

    let last = (RD_YL_GN.len() - 1) as f64;
    let colorscale: Vec<Value> = RD_YL_GN
        .iter()
        .enumerate()
        .map(|(i, color)| json!([i as f64 / last, color]))
        .collect();

    json!({
        "data": [{
            "type": "choropleth",
            "locationmode": "ISO-3",
            "locations": locations,
            "z": scores,
            "text": countries,
            "hovertemplate": format!(
                "<b>%{{text}}</b><br>{}=%{{location}}<br>{}=%{{z}}<extra></extra>",
                ISO_COLUMN, SCORE_COLUMN
            ),
            "colorscale": colorscale,
            "colorbar": { "title": { "text": SCORE_COLUMN } },
        }],
        "layout": {
            "title": { "text": title },
            "geo": { "showframe": false, "projection": { "type": "natural earth" } },
            "meta": { "hover_name": COUNTRY_COLUMN },
        }
    })
}

/// Wrap a figure into a self-contained HTML page
pub fn figure_html(figure: &Value, title: &str) -> String {
    // Keep "</script>" inside string data from closing the script element
    let figure = figure.to_string().replace("</", "<\\/");
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:90vh;"></div>
<script>
const figure = {figure};
Plotly.newPlot("chart", figure.data, figure.layout, {{responsive: true}});
</script>
</body>
</html>
"#,
        title = html_escape(title),
        cdn = PLOTLY_CDN,
        figure = figure,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders the choropleth as an HTML page on disk
#[derive(Debug, Clone)]
pub struct PlotlyHtmlRenderer {
    pub output_path: PathBuf,
    pub title: String,
}

impl PlotlyHtmlRenderer {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            title: "Pandemic-ready score by country".to_string(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl ChartRenderer for PlotlyHtmlRenderer {
    fn render(&self, table: &EnrichedScoreTable) -> Result<()> {
        let figure = choropleth_figure(table, &self.title);
        if let Some(parent) = self.output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.output_path, figure_html(&figure, &self.title))?;

        info!(
            "Choropleth of {} countries written to {:?}, open it in a browser",
            table.len(),
            self.output_path
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{EnrichedRow, UNRESOLVED_ISO};
    use tempfile::tempdir;

    fn table() -> EnrichedScoreTable {
        EnrichedScoreTable {
            rows: vec![
                EnrichedRow {
                    country: "Chad".into(),
                    score: 2,
                    iso_alpha: "TCD".into(),
                },
                EnrichedRow {
                    country: "Atlantis".into(),
                    score: 7,
                    iso_alpha: UNRESOLVED_ISO.into(),
                },
            ],
        }
    }

    #[test]
    fn test_figure_columns() {
        let figure = choropleth_figure(&table(), "t");
        let trace = &figure["data"][0];

        assert_eq!(trace["type"], "choropleth");
        assert_eq!(trace["locations"], json!(["TCD", " "]));
        assert_eq!(trace["z"], json!([2, 7]));
        assert_eq!(trace["text"], json!(["Chad", "Atlantis"]));
    }

    #[test]
    fn test_colorscale_runs_red_to_green() {
        let figure = choropleth_figure(&table(), "t");
        let scale = figure["data"][0]["colorscale"].as_array().unwrap();

        assert_eq!(scale.len(), RD_YL_GN.len());
        assert_eq!(scale[0], json!([0.0, "#a50026"]));
        assert_eq!(scale[10], json!([1.0, "#006837"]));
    }

    #[test]
    fn test_html_escapes_script_close() {
        let mut t = table();
        t.rows[0].country = "</script><b>".into();
        let html = figure_html(&choropleth_figure(&t, "a < b"), "a < b");

        assert!(html.contains("<title>a &lt; b</title>"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_render_writes_page() {
        let dir = tempdir().unwrap();
        let renderer = PlotlyHtmlRenderer::new(dir.path().join("maps/world.html"));

        renderer.render(&table()).unwrap();

        let html = std::fs::read_to_string(renderer.output_path()).unwrap();
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("\"TCD\""));
    }
}
