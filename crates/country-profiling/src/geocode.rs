//! ISO alpha-3 enrichment of the score table

use crate::table::ScoreTable;
use crate::{ProfilingError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// ISO code recorded for countries the resolver could not match
pub const UNRESOLVED_ISO: &str = " ";

/// Maps a free-form country name to its ISO 3166-1 alpha-3 code
pub trait CountryCodeResolver {
    fn resolve_alpha3(&self, country: &str) -> Result<String>;
}

impl<R: CountryCodeResolver + ?Sized> CountryCodeResolver for &R {
    fn resolve_alpha3(&self, country: &str) -> Result<String> {
        (**self).resolve_alpha3(country)
    }
}

/// One row of the enriched table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub country: String,
    pub score: i64,
    /// Alpha-3 code, or [`UNRESOLVED_ISO`]
    pub iso_alpha: String,
}

impl EnrichedRow {
    pub fn is_resolved(&self) -> bool {
        self.iso_alpha != UNRESOLVED_ISO
    }
}

/// Score table with an ISO code per row, in ranking order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedScoreTable {
    pub rows: Vec<EnrichedRow>,
}

impl EnrichedScoreTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &EnrichedRow> {
        self.rows.iter().filter(|r| !r.is_resolved())
    }
}

/// Attach an ISO alpha-3 code to every row.
///
/// Each distinct display name is resolved once. Rows whose name cannot be
/// resolved keep their place with [`UNRESOLVED_ISO`]. An empty table is
/// refused with [`ProfilingError::EmptyScoreTable`].
pub fn enrich<R: CountryCodeResolver>(table: &ScoreTable, resolver: R) -> Result<EnrichedScoreTable> {
    if table.is_empty() {
        error!("Score table is empty, generate a risk table first");
        return Err(ProfilingError::EmptyScoreTable);
    }

    let mut codes: IndexMap<&str, String> = IndexMap::new();
    for country in table.unique_countries() {
        let code = match resolver.resolve_alpha3(country) {
            Ok(code) => code,
            Err(e) => {
                warn!(country, "could not add ISO 3 code: {}", e);
                UNRESOLVED_ISO.to_string()
            }
        };
        codes.insert(country, code);
    }

    let rows: Vec<EnrichedRow> = table
        .rows
        .iter()
        .map(|r| EnrichedRow {
            country: r.country.clone(),
            score: r.score,
            iso_alpha: codes
                .get(r.country.as_str())
                .cloned()
                .unwrap_or_else(|| UNRESOLVED_ISO.to_string()),
        })
        .collect();

    let resolved = rows.iter().filter(|r| r.is_resolved()).count();
    info!("Resolved ISO codes for {}/{} rows", resolved, rows.len());

    Ok(EnrichedScoreTable { rows })
}
