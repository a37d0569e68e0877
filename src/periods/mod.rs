//! Payment-term configuration by premium tier
//!
//! Each configuration entry maps a set of catalogue premiums to the ordered
//! list of payment terms offered for them. Services consume the table
//! through the [`PeriodConfigProvider`] trait so the source (built-in,
//! JSON, CSV, reload-per-call) stays interchangeable.

pub mod loader;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One configuration entry: a set of premiums sharing an ordered term list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodConfigEntry {
    /// Catalogue premiums this entry applies to
    pub premiums: Vec<f64>,

    /// Payment terms offered, in presentation order
    pub terms: Vec<u32>,
}

/// Ordered period-configuration table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodTable {
    entries: Vec<PeriodConfigEntry>,
}

impl PeriodTable {
    /// Create a table from configuration entries, preserving their order
    pub fn new(entries: Vec<PeriodConfigEntry>) -> Self {
        Self { entries }
    }

    /// Built-in catalogue used when no configuration file is present
    pub fn default_table() -> Self {
        Self::new(vec![
            PeriodConfigEntry {
                premiums: vec![100.0, 150.0, 200.0, 250.0],
                terms: vec![4, 5],
            },
            PeriodConfigEntry {
                premiums: vec![300.0, 350.0, 380.0, 400.0],
                terms: vec![4, 5, 6],
            },
            PeriodConfigEntry {
                premiums: vec![450.0, 500.0, 600.0],
                terms: vec![5, 6, 7],
            },
            PeriodConfigEntry {
                premiums: vec![700.0, 800.0, 900.0, 1000.0],
                terms: vec![6, 7],
            },
        ])
    }

    /// Terms configured for a premium: the term list of the first entry
    /// whose premium set contains the value, or empty if none matches
    ///
    /// Matching is exact f64 equality. Premiums are catalogue values passed
    /// through verbatim (100.0, 300.0, ...), not computed floats; callers
    /// must not round or re-derive them.
    pub fn terms_for_premium(&self, premium: f64) -> Vec<u32> {
        self.entries
            .iter()
            .find(|entry| entry.premiums.contains(&premium))
            .map(|entry| entry.terms.clone())
            .unwrap_or_default()
    }

    /// Access the raw configuration entries
    pub fn entries(&self) -> &[PeriodConfigEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Source of valid payment terms for a premium
pub trait PeriodConfigProvider: Send + Sync {
    /// Ordered terms configured for the premium; empty when unconfigured
    fn terms_for_premium(&self, premium: f64) -> Vec<u32>;
}

impl PeriodConfigProvider for PeriodTable {
    fn terms_for_premium(&self, premium: f64) -> Vec<u32> {
        PeriodTable::terms_for_premium(self, premium)
    }
}

/// Provider that re-reads the JSON configuration on every lookup, so file
/// edits take effect without a restart
///
/// A load failure is logged and answered as "no configured terms".
#[derive(Debug, Clone)]
pub struct FilePeriodProvider {
    path: PathBuf,
}

impl FilePeriodProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PeriodConfigProvider for FilePeriodProvider {
    fn terms_for_premium(&self, premium: f64) -> Vec<u32> {
        match loader::load_periods_json(&self.path) {
            Ok(table) => table.terms_for_premium(premium),
            Err(err) => {
                log::warn!(
                    "failed to load period configuration from {}: {}",
                    self.path.display(),
                    err
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_lookup() {
        let table = PeriodTable::default_table();
        assert_eq!(table.terms_for_premium(300.0), vec![4, 5, 6]);
        assert_eq!(table.terms_for_premium(100.0), vec![4, 5]);
        assert_eq!(table.terms_for_premium(1000.0), vec![6, 7]);
    }

    #[test]
    fn test_unconfigured_premium_is_empty() {
        let table = PeriodTable::default_table();
        assert!(table.terms_for_premium(123.45).is_empty());
    }

    #[test]
    fn test_first_matching_entry_wins() {
        let table = PeriodTable::new(vec![
            PeriodConfigEntry {
                premiums: vec![500.0],
                terms: vec![4],
            },
            PeriodConfigEntry {
                premiums: vec![500.0],
                terms: vec![6, 7],
            },
        ]);
        assert_eq!(table.terms_for_premium(500.0), vec![4]);
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = PeriodTable::default_table();
        assert!(table.terms_for_premium(300.0000001).is_empty());
    }

    #[test]
    fn test_missing_file_provider_answers_empty() {
        let provider = FilePeriodProvider::new("does/not/exist.json");
        assert!(PeriodConfigProvider::terms_for_premium(&provider, 300.0).is_empty());
    }
}
