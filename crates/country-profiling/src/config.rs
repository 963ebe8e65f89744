//! Run configuration

use crate::export::ExportFormat;
use crate::scorer::{MissingPropertyPolicy, ScorerConfig};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "Data/world_data_10-05-2020.json";
pub const DEFAULT_WEIGHTS_PATH: &str = "Data/world_data_10-05-2020--list_country_properties.json";
pub const DEFAULT_OUTPUT_PREFIX: &str = "Results/countryProfiling/country_pandemic_risk";

/// Format of the run stamp appended to the default output path
pub const RUN_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Everything a run needs; no field is computed from the wall clock
#[derive(Debug, Clone)]
pub struct ProfilingConfig {
    pub data_path: PathBuf,
    pub weights_path: PathBuf,
    /// Export path without extension
    pub output_base: PathBuf,
    pub missing_policy: MissingPropertyPolicy,
    /// Formats exported, in order
    pub formats: Vec<ExportFormat>,
    /// Where the choropleth page goes; `None` disables rendering
    pub chart_path: Option<PathBuf>,
}

impl Default for ProfilingConfig {
    /// Fixed default paths with an unstamped output base
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            weights_path: PathBuf::from(DEFAULT_WEIGHTS_PATH),
            output_base: PathBuf::from(DEFAULT_OUTPUT_PREFIX),
            missing_policy: MissingPropertyPolicy::default(),
            formats: vec![ExportFormat::Csv, ExportFormat::Excel],
            chart_path: Some(std::env::temp_dir().join("country_pandemic_risk.html")),
        }
    }
}

impl ProfilingConfig {
    /// Default configuration whose output base carries a precomputed run stamp
    pub fn with_stamp(stamp: &str) -> Self {
        Self {
            output_base: stamped_output_base(stamp),
            ..Self::default()
        }
    }

    pub fn scorer_config(&self) -> ScorerConfig {
        ScorerConfig {
            missing_policy: self.missing_policy,
        }
    }
}

/// `<prefix> <stamp>`
pub fn stamped_output_base(stamp: &str) -> PathBuf {
    PathBuf::from(format!("{} {}", DEFAULT_OUTPUT_PREFIX, stamp))
}

/// Stamp identifying a run in its output file names
pub fn run_stamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format(RUN_STAMP_FORMAT).to_string()
}
