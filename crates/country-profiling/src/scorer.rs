//! Risk scoring implementation
//!
//! Each country's score is the weighted sum of its truthy properties, taken
//! in weight-document order and rounded to an integer:
//!
//! ```text
//! Score(c) = round( Σ wᵢ·vᵢ )
//! ```
//!
//! A property missing from a country stops the sum for that country under
//! [`MissingPropertyPolicy::Truncate`], so the score only reflects the
//! properties processed before it. A falsy value never stops the sum.

use crate::loader::{CountryRecord, Dataset, PropertyWeights};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// What the scorer does when a weighted property is absent from a country
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingPropertyPolicy {
    /// Stop scoring the country at the first missing property
    #[default]
    Truncate,
    /// Ignore the missing property and keep going
    Skip,
}

impl FromStr for MissingPropertyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "truncate" => Ok(Self::Truncate),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown missing-property policy: {other}")),
        }
    }
}

/// Scorer configuration
#[derive(Debug, Clone, Default)]
pub struct ScorerConfig {
    pub missing_policy: MissingPropertyPolicy,
}

/// Non-fatal conditions met while scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScoreDiagnostic {
    /// Weighted property absent from the country's record
    MissingProperty { country: String, property: String },
    /// Weighted property present but falsy, contributes nothing
    FalsyValue { country: String, property: String, value: String },
    /// Weighted property holds a non-empty string, array or object; contributes nothing
    NonNumericValue { country: String, property: String, value: String },
}

impl fmt::Display for ScoreDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreDiagnostic::MissingProperty { country, property } => {
                write!(f, "MISSING {} for {}", property, country)
            }
            ScoreDiagnostic::FalsyValue { country, property, value } => {
                write!(f, "{} - {} = {}", country, property, value)
            }
            ScoreDiagnostic::NonNumericValue { country, property, value } => {
                write!(f, "{} - {} = {} (not a number)", country, property, value)
            }
        }
    }
}

/// Integer score of one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryScore {
    /// Country key as it appears in the data document
    pub country: String,
    pub score: i64,
}

/// Countries ordered by ascending score; ties keep data-document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedResult {
    pub entries: Vec<CountryScore>,
}

impl RankedResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryScore> {
        self.entries.iter()
    }

    pub fn get(&self, country: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.country == country)
            .map(|e| e.score)
    }
}

/// Scoring output: the ranking plus everything worth reporting
#[derive(Debug, Clone, Default)]
pub struct ScoringReport {
    pub ranked: RankedResult,
    pub diagnostics: Vec<ScoreDiagnostic>,
}

/// Score every country and rank them
pub fn assess_risk(dataset: &Dataset, config: &ScorerConfig) -> ScoringReport {
    let mut diagnostics = Vec::new();

    let mut entries: Vec<CountryScore> = dataset
        .countries
        .iter()
        .map(|(country, record)| CountryScore {
            country: country.clone(),
            score: score_country(country, record, &dataset.weights, config, &mut diagnostics),
        })
        .collect();

    // Stable: equal scores keep data-document order
    entries.sort_by_key(|e| e.score);

    info!(
        "Scored {} countries against {} properties ({} diagnostics)",
        entries.len(),
        dataset.weights.len(),
        diagnostics.len()
    );

    ScoringReport {
        ranked: RankedResult { entries },
        diagnostics,
    }
}

/// Score a single country
fn score_country(
    country: &str,
    record: &CountryRecord,
    weights: &PropertyWeights,
    config: &ScorerConfig,
    diagnostics: &mut Vec<ScoreDiagnostic>,
) -> i64 {
    let mut risk = 0.0;

    for (property, weight) in weights.iter() {
        let Some(value) = record.get(property) else {
            emit(
                diagnostics,
                ScoreDiagnostic::MissingProperty {
                    country: country.to_string(),
                    property: property.clone(),
                },
            );
            match config.missing_policy {
                MissingPropertyPolicy::Truncate => break,
                MissingPropertyPolicy::Skip => continue,
            }
        };

        let Some(weight) = weight.factor() else {
            continue;
        };

        if let Some(v) = value.factor() {
            debug!("{}: {} += {} * {}", country, property, weight, v);
            risk += weight * v;
            continue;
        }

        let falsy = value.is_falsy();
        let (country, property, value) = (country.to_string(), property.clone(), value.to_string());
        emit(
            diagnostics,
            if falsy {
                ScoreDiagnostic::FalsyValue { country, property, value }
            } else {
                ScoreDiagnostic::NonNumericValue { country, property, value }
            },
        );
    }

    round_score(risk)
}

fn emit(diagnostics: &mut Vec<ScoreDiagnostic>, diagnostic: ScoreDiagnostic) {
    warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}

/// Round half away from zero, saturating at the `i64` range (NaN → 0)
pub fn round_score(risk: f64) -> i64 {
    risk.round() as i64
}
