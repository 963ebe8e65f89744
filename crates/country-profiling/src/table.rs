//! Row-oriented projection of the ranking

use crate::scorer::RankedResult;
use serde::{Deserialize, Serialize};

/// One row of the score table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    /// Display name (underscores replaced by spaces)
    pub country: String,
    /// Original key in the data document
    pub key: String,
    pub score: i64,
}

/// Ranked countries as (Country, Score) rows, in ranking order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub rows: Vec<ScoreRow>,
}

impl ScoreTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display names in row order, first occurrence only
    pub fn unique_countries(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.rows
            .iter()
            .map(|r| r.country.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

/// Display form of a data-document country key
pub fn display_name(key: &str) -> String {
    key.replace('_', " ")
}

/// Project the ranking into a table
pub fn project(ranked: &RankedResult) -> ScoreTable {
    ScoreTable {
        rows: ranked
            .iter()
            .map(|e| ScoreRow {
                country: display_name(&e.country),
                key: e.country.clone(),
                score: e.score,
            })
            .collect(),
    }
}
