use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ActivityClassification, BracketTable};

/// Target tables for classifications that are routed by payroll ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioRouting {
    /// Table used when payroll / trailing revenue reaches the threshold.
    pub high_ratio_table_id: String,
    /// Table used below the threshold.
    pub low_ratio_table_id: String,
}

/// Read-only lookup data consumed by the engine.
///
/// Owned by the caller; the engine only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    classifications: HashMap<String, ActivityClassification>,
    bracket_tables: HashMap<String, BracketTable>,
    pub ratio_routing: RatioRouting,
}

impl ReferenceData {
    pub fn new(
        classifications: impl IntoIterator<Item = ActivityClassification>,
        bracket_tables: impl IntoIterator<Item = BracketTable>,
        ratio_routing: RatioRouting,
    ) -> Self {
        Self {
            classifications: classifications
                .into_iter()
                .map(|c| (c.code.clone(), c))
                .collect(),
            bracket_tables: bracket_tables
                .into_iter()
                .map(|t| (t.id.clone(), t))
                .collect(),
            ratio_routing,
        }
    }

    pub fn classification(
        &self,
        code: &str,
    ) -> Option<&ActivityClassification> {
        self.classifications.get(code)
    }

    pub fn bracket_table(
        &self,
        id: &str,
    ) -> Option<&BracketTable> {
        self.bracket_tables.get(id)
    }

    /// Classification codes, sorted.
    pub fn classification_codes(&self) -> Vec<&str> {
        let mut codes: Vec<_> = self.classifications.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Bracket table identifiers, sorted.
    pub fn bracket_table_ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.bracket_tables.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Table identifiers referenced by classifications or routing but not
    /// present in the bracket table set, sorted and deduplicated.
    pub fn dangling_table_ids(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = self
            .classifications
            .values()
            .filter(|c| !c.requires_ratio_routing)
            .map(|c| c.bracket_table_id.as_str())
            .chain([
                self.ratio_routing.high_ratio_table_id.as_str(),
                self.ratio_routing.low_ratio_table_id.as_str(),
            ])
            .filter(|id| !self.bracket_tables.contains_key(*id))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}
