//! Period-configuration loaders
//!
//! Loads the premium -> payment-terms catalogue from JSON or long-format
//! CSV files in data/.

use std::error::Error;
use std::fs::File;
use std::path::Path;

use super::{PeriodConfigEntry, PeriodTable};

/// Default path to the period-configuration file
pub const DEFAULT_PERIODS_PATH: &str = "data/periods.json";

/// Load the period table from a JSON file
///
/// File shape: `[{"premiums": [...], "terms": [...]}, ...]`
pub fn load_periods_json(path: &Path) -> Result<PeriodTable, Box<dyn Error>> {
    let file = File::open(path)?;
    load_periods_json_from_reader(file)
}

/// Load the JSON period table from any reader (e.g., string buffer)
pub fn load_periods_json_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<PeriodTable, Box<dyn Error>> {
    let entries: Vec<PeriodConfigEntry> = serde_json::from_reader(reader)?;
    Ok(PeriodTable::new(entries))
}

/// Load the period table from a long-format CSV file
///
/// Columns: `premium,term`. Consecutive rows sharing a premium accumulate
/// terms in file order, each group becoming one configuration entry.
pub fn load_periods_csv(path: &Path) -> Result<PeriodTable, Box<dyn Error>> {
    let file = File::open(path)?;
    load_periods_csv_from_reader(file)
}

/// Load the CSV period table from any reader
pub fn load_periods_csv_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<PeriodTable, Box<dyn Error>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut entries: Vec<PeriodConfigEntry> = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let premium: f64 = record[0].parse()?;
        let term: u32 = record[1].parse()?;

        match entries.last_mut() {
            Some(entry) if entry.premiums == [premium] => entry.terms.push(term),
            _ => entries.push(PeriodConfigEntry {
                premiums: vec![premium],
                terms: vec![term],
            }),
        }
    }

    Ok(PeriodTable::new(entries))
}

/// Load the period table from the default location
pub fn load_default_periods() -> Result<PeriodTable, Box<dyn Error>> {
    load_periods_json(Path::new(DEFAULT_PERIODS_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_table() {
        let json = r#"[
            {"premiums": [100.0, 150.0], "terms": [4, 5]},
            {"premiums": [300.0], "terms": [4, 5, 6]}
        ]"#;

        let table = load_periods_json_from_reader(json.as_bytes()).unwrap();
        assert_eq!(table.entries().len(), 2);
        assert_eq!(table.terms_for_premium(150.0), vec![4, 5]);
        assert_eq!(table.terms_for_premium(300.0), vec![4, 5, 6]);
    }

    #[test]
    fn test_load_csv_groups_consecutive_rows() {
        let csv = "premium,term\n100,4\n100,5\n300,4\n300,5\n300,6\n";

        let table = load_periods_csv_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.entries().len(), 2);
        assert_eq!(table.terms_for_premium(100.0), vec![4, 5]);
        assert_eq!(table.terms_for_premium(300.0), vec![4, 5, 6]);
    }

    #[test]
    fn test_load_csv_rejects_bad_rows() {
        let csv = "premium,term\n100,notaterm\n";
        assert!(load_periods_csv_from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_load_json_rejects_malformed_shape() {
        let json = r#"{"premiums": [100.0]}"#;
        assert!(load_periods_json_from_reader(json.as_bytes()).is_err());
    }
}
