//! Presentation records for per-term quote breakdowns

use serde::{Deserialize, Serialize};

use super::formula::QuoteFigures;

/// Format a figure with the two-decimal presentation precision
fn format2(value: f64) -> String {
    format!("{:.2}", value)
}

/// String-formatted breakdown for a single payment term
///
/// Numeric fields carry two decimals; the payout table is encoded as a
/// JSON array so the record stays flat for transport and caching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDetail {
    pub return_percentage: String,
    pub effective_annual_rate: String,
    pub total_contribution: String,
    pub total_gain: String,
    pub total_payout: String,
    pub profitability: String,
    pub payout_table: String,
}

impl QuoteDetail {
    /// Build the formatted breakdown from computed figures
    pub fn from_figures(figures: &QuoteFigures) -> Self {
        Self {
            return_percentage: format2(figures.return_percentage),
            effective_annual_rate: format2(figures.implicit_annual_rate),
            total_contribution: format2(figures.amounts.total_contribution),
            total_gain: format2(figures.amounts.total_gain),
            total_payout: format2(figures.amounts.total_payout),
            profitability: format2(figures.amounts.profitability),
            payout_table: serde_json::to_string(&figures.payout_table).unwrap(),
        }
    }
}

/// One term's quote inside a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermQuote {
    pub term: u32,
    pub detail: QuoteDetail,
}

/// The full per-premium quote bundle
///
/// Also the exact shape of a collection cache entry; the term order
/// preserves the period-configuration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionResult {
    pub premium: f64,
    pub terms: Vec<u32>,
    pub quotes: Vec<TermQuote>,
    pub count: usize,
    pub image_url: Option<String>,
}

impl CollectionResult {
    /// Result for a premium with no configured terms
    pub fn empty(premium: f64) -> Self {
        Self {
            premium,
            terms: Vec::new(),
            quotes: Vec::new(),
            count: 0,
            image_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::formula::quote_figures;
    use crate::quote::Sex;

    #[test]
    fn test_detail_formatting() {
        let figures = quote_figures(18, Sex::M, 300.0, 4).unwrap();
        let detail = QuoteDetail::from_figures(&figures);

        assert_eq!(detail.return_percentage, "111.06");
        assert_eq!(detail.total_contribution, "14400.00");
        assert_eq!(detail.total_payout, "15992.64");
        assert_eq!(detail.total_gain, "1592.64");
        assert_eq!(detail.profitability, "12807.36");
    }

    #[test]
    fn test_payout_table_encoding_round_trips() {
        let figures = quote_figures(25, Sex::F, 380.0, 6).unwrap();
        let detail = QuoteDetail::from_figures(&figures);

        let decoded: Vec<f64> = serde_json::from_str(&detail.payout_table).unwrap();
        assert_eq!(decoded, figures.payout_table);
        assert_eq!(decoded.len(), 6);
    }

    #[test]
    fn test_empty_collection_shape() {
        let result = CollectionResult::empty(42.0);
        assert_eq!(result.count, 0);
        assert!(result.terms.is_empty());
        assert!(result.quotes.is_empty());
        assert!(result.image_url.is_none());
    }
}
