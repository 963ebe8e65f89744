//! Pipeline orchestration
//!
//! Runs loader → scorer → table → geocode → render/export, each stage
//! consuming the previous stage's output.

use crate::config::ProfilingConfig;
use crate::export::{self, ExportFormat};
use crate::geocode::{self, CountryCodeResolver, EnrichedScoreTable};
use crate::loader::{self, Dataset};
use crate::render::ChartRenderer;
use crate::scorer::{self, ScoringReport};
use crate::table::{self, ScoreTable};
use crate::{ProfilingError, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Everything a run produced
#[derive(Debug, Clone, Default)]
pub struct PipelineOutcome {
    pub report: ScoringReport,
    pub table: ScoreTable,
    /// `None` when the score table was empty and enrichment was refused
    pub enriched: Option<EnrichedScoreTable>,
    pub exported: Vec<PathBuf>,
}

impl PipelineOutcome {
    pub fn completed(&self) -> bool {
        self.enriched.is_some()
    }
}

/// Load the configured documents and run every stage
pub fn run<R: CountryCodeResolver>(
    config: &ProfilingConfig,
    resolver: R,
    renderer: Option<&dyn ChartRenderer>,
) -> Result<PipelineOutcome> {
    let dataset = loader::load_or_empty(&config.data_path, &config.weights_path);
    run_dataset(&dataset, config, resolver, renderer)
}

/// Run every stage after loading on an already loaded dataset
pub fn run_dataset<R: CountryCodeResolver>(
    dataset: &Dataset,
    config: &ProfilingConfig,
    resolver: R,
    renderer: Option<&dyn ChartRenderer>,
) -> Result<PipelineOutcome> {
    let report = scorer::assess_risk(dataset, &config.scorer_config());
    info!("Pandemic-ready scores by country:");
    for entry in report.ranked.iter() {
        info!("  {:>6} | {}", entry.score, entry.country);
    }

    let table = table::project(&report.ranked);

    let enriched = match geocode::enrich(&table, resolver) {
        Ok(enriched) => enriched,
        Err(ProfilingError::EmptyScoreTable) => {
            info!("Nothing to render or export");
            return Ok(PipelineOutcome {
                report,
                table,
                ..PipelineOutcome::default()
            });
        }
        Err(e) => return Err(e),
    };

    if let Some(renderer) = renderer {
        // Presentation only, exports still run
        if let Err(e) = renderer.render(&enriched) {
            error!("Choropleth rendering failed: {}", e);
        }
    }

    let exported = export_all(&enriched, &config.output_base, &config.formats)?;

    Ok(PipelineOutcome {
        report,
        table,
        enriched: Some(enriched),
        exported,
    })
}

/// Export in every requested format, in order.
///
/// Every format is attempted; the first failure is returned once all have run.
pub fn export_all(
    table: &EnrichedScoreTable,
    base: &Path,
    formats: &[ExportFormat],
) -> Result<Vec<PathBuf>> {
    let mut exported = Vec::with_capacity(formats.len());
    let mut first_error = None;

    for format in formats {
        match export::export(table, base, *format) {
            Ok(path) => exported.push(path),
            Err(e) => {
                error!("{} export failed: {}", format, e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(exported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countries::IsoCountryDatabase;
    use crate::geocode::UNRESOLVED_ISO;
    use std::cell::RefCell;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[derive(Default)]
    struct RecordingRenderer {
        rendered: RefCell<Vec<EnrichedScoreTable>>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&self, table: &EnrichedScoreTable) -> Result<()> {
            self.rendered.borrow_mut().push(table.clone());
            Ok(())
        }
    }

    struct FailingRenderer;

    impl ChartRenderer for FailingRenderer {
        fn render(&self, _table: &EnrichedScoreTable) -> Result<()> {
            Err(ProfilingError::Io(std::io::Error::other("no display")))
        }
    }

    fn json_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn config(data: &Path, weights: &Path, out: &Path) -> ProfilingConfig {
        ProfilingConfig {
            data_path: data.to_path_buf(),
            weights_path: weights.to_path_buf(),
            output_base: out.join("country_pandemic_risk 2020-05-10 09:05"),
            chart_path: None,
            ..ProfilingConfig::default()
        }
    }

    #[test]
    fn test_end_to_end() {
        let data = json_file(
            r#"{
                "United_States": {"beds": 2.8, "doctors": 2.6},
                "Atlantis": {"beds": 0.5, "doctors": 0},
                "South_Africa": {"beds": 2.3},
                "France": {"beds": 6.0, "doctors": 3.3}
            }"#,
        );
        let weights = json_file(r#"{"beds": 1, "doctors": 2}"#);
        let out = tempdir().unwrap();
        let config = config(data.path(), weights.path(), out.path());
        let renderer = RecordingRenderer::default();

        let outcome = run(&config, IsoCountryDatabase::with_defaults(), Some(&renderer)).unwrap();

        // Atlantis 0.5 → 1 (ties away), South Africa truncated at doctors → 2
        let order: Vec<(&str, i64)> = outcome
            .table
            .rows
            .iter()
            .map(|r| (r.country.as_str(), r.score))
            .collect();
        assert_eq!(
            order,
            [("Atlantis", 1), ("South Africa", 2), ("United States", 8), ("France", 13)]
        );
        assert_eq!(outcome.report.diagnostics.len(), 2);

        let enriched = outcome.enriched.as_ref().unwrap();
        let codes: Vec<&str> = enriched.rows.iter().map(|r| r.iso_alpha.as_str()).collect();
        assert_eq!(codes, [UNRESOLVED_ISO, "ZAF", "USA", "FRA"]);
        assert_eq!(renderer.rendered.borrow().len(), 1);

        assert_eq!(outcome.exported.len(), 2);
        assert!(outcome.exported.iter().all(|p| p.exists()));
        assert_eq!(&export::read_csv(&outcome.exported[0]).unwrap(), enriched);
    }

    #[test]
    fn test_empty_documents_stop_before_enrichment() {
        let data = json_file("{}");
        let weights = json_file("{}");
        let out = tempdir().unwrap();
        let config = config(data.path(), weights.path(), out.path());
        let renderer = RecordingRenderer::default();

        let outcome = run(&config, IsoCountryDatabase::with_defaults(), Some(&renderer)).unwrap();

        assert!(outcome.report.ranked.is_empty());
        assert!(outcome.table.is_empty());
        assert!(!outcome.completed());
        assert!(outcome.exported.is_empty());
        assert!(renderer.rendered.borrow().is_empty());
    }

    #[test]
    fn test_load_failure_degrades_to_empty_run() {
        let out = tempdir().unwrap();
        let config = config(Path::new("missing.json"), Path::new("missing.json"), out.path());

        let outcome = run(&config, IsoCountryDatabase::with_defaults(), None).unwrap();
        assert!(!outcome.completed());
    }

    #[test]
    fn test_render_failure_does_not_block_export() {
        let dataset = Dataset {
            countries: [("Peru".to_string(), [("beds", 1.6)].into_iter().collect())]
                .into_iter()
                .collect(),
            weights: [("beds", 1.0)].into_iter().collect(),
        };
        let out = tempdir().unwrap();
        let mut config = config(Path::new("-"), Path::new("-"), out.path());
        config.formats = vec![ExportFormat::Csv];

        let outcome = run_dataset(
            &dataset,
            &config,
            IsoCountryDatabase::with_defaults(),
            Some(&FailingRenderer),
        )
        .unwrap();

        assert_eq!(outcome.exported.len(), 1);
        assert!(outcome.exported[0].exists());
    }

    #[test]
    fn test_failed_export_does_not_block_other_formats() {
        let out = tempdir().unwrap();
        let base = out.path().join("risk");
        std::fs::create_dir_all(export::output_path(&base, ExportFormat::Csv)).unwrap();
        let table = EnrichedScoreTable {
            rows: vec![crate::geocode::EnrichedRow {
                country: "Peru".into(),
                score: 2,
                iso_alpha: "PER".into(),
            }],
        };

        let result = export_all(&table, &base, &[ExportFormat::Csv, ExportFormat::Excel]);

        assert!(result.is_err());
        assert!(export::output_path(&base, ExportFormat::Excel).exists());
    }

    #[test]
    fn test_string_attributes_survive_the_run() {
        let data = json_file(
            r#"{
                "France": {"beds": 6, "doctors": "", "continent": "Europe"},
                "Peru": {"beds": 1.6, "doctors": 1.3, "continent": "South America"}
            }"#,
        );
        let weights = json_file(r#"{"beds": 1, "doctors": 2}"#);
        let out = tempdir().unwrap();
        let config = config(data.path(), weights.path(), out.path());

        let outcome = run(&config, IsoCountryDatabase::with_defaults(), None).unwrap();

        assert_eq!(outcome.report.ranked.get("Peru"), Some(4));
        assert_eq!(outcome.report.ranked.get("France"), Some(6));
        assert_eq!(outcome.report.diagnostics.len(), 1);
        assert!(outcome.completed());
        assert_eq!(outcome.exported.len(), 2);
    }
}
