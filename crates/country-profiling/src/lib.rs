//! Country Pandemic-Readiness Profiling
//!
//! Scores every country of a static attribute snapshot against a set of
//! property weights, ranks the countries, attaches ISO 3166-1 alpha-3 codes,
//! renders a world choropleth and exports the ranked table.
//!
//! # Pipeline
//!
//! ```text
//! loader ─▶ scorer ─▶ table ─▶ geocode ─▶ render / export
//! ```
//!
//! Every stage is a plain function from the previous stage's output to its
//! own; [`pipeline::run`] composes them.
//!
//! # Scoring Model
//!
//! ```text
//! Score(c) = round( Σ wᵢ·vᵢ )   over properties i in weight order
//! ```
//!
//! | Condition              | Effect                                          |
//! |------------------------|-------------------------------------------------|
//! | property absent        | stop summing for this country (`Truncate`)      |
//! | weight falsy or text   | property ignored                                |
//! | value falsy or text    | contributes nothing, diagnostic emitted         |
//! | both truthy            | `w · v` added                                   |

use thiserror::Error;

pub mod config;
pub mod countries;
pub mod export;
pub mod geocode;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod scorer;
pub mod table;

pub use config::ProfilingConfig;
pub use countries::IsoCountryDatabase;
pub use export::ExportFormat;
pub use geocode::{CountryCodeResolver, EnrichedScoreTable, UNRESOLVED_ISO};
pub use loader::{CountryData, CountryRecord, Dataset, PropertyValue, PropertyWeights};
pub use render::{ChartRenderer, PlotlyHtmlRenderer};
pub use scorer::{MissingPropertyPolicy, RankedResult, ScoreDiagnostic, ScorerConfig};
pub use table::ScoreTable;

/// Header of the country column in every exported table
pub const COUNTRY_COLUMN: &str = "Country";

/// Header of the score column in every exported table
pub const SCORE_COLUMN: &str = "Pandemic-ready score";

/// Header of the ISO code column in every exported table
pub const ISO_COLUMN: &str = "iso_alpha";

#[derive(Error, Debug)]
pub enum ProfilingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("Score table is empty, generate a risk table first")]
    EmptyScoreTable,
    #[error("No ISO 3166 country matches {0:?}")]
    UnresolvedCountry(String),
    #[error("Malformed table: {0}")]
    MalformedTable(String),
}

pub type Result<T> = std::result::Result<T, ProfilingError>;
