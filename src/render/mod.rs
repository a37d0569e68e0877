//! Collection visualization: chart rendering and temporary hosting
//!
//! Rendering is best-effort from the services' point of view: a failure
//! here surfaces as "no image produced", never as a request failure.

mod chart;
mod upload;

pub use chart::SvgChartRenderer;
pub use upload::TmpfilesClient;

use std::path::PathBuf;

use thiserror::Error;

use crate::quote::QuoteFigures;

/// Rendering or hosting failure
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not write image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("image upload failed: {0}")]
    Upload(String),
}

/// One chart row per payment term
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub term: u32,
    pub payout_table: Vec<f64>,
    pub total_contribution: f64,
    pub total_payout: f64,
    pub total_gain: f64,
    pub return_percentage: f64,
}

/// Data bundle handed to a renderer
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Monthly premium the collection was computed for
    pub premium: f64,

    /// File name without extension
    pub file_stem: String,

    /// Per-term rows, in collection order
    pub rows: Vec<ChartRow>,
}

impl ChartSpec {
    /// Build the bundle from the per-term figures of a collection
    pub fn from_figures(premium: f64, file_stem: String, computed: &[(u32, QuoteFigures)]) -> Self {
        let rows = computed
            .iter()
            .map(|(term, figures)| ChartRow {
                term: *term,
                payout_table: figures.payout_table.clone(),
                total_contribution: figures.amounts.total_contribution,
                total_payout: figures.amounts.total_payout,
                total_gain: figures.amounts.total_gain,
                return_percentage: figures.return_percentage,
            })
            .collect();

        Self {
            premium,
            file_stem,
            rows,
        }
    }
}

/// A rendered collection image on disk, optionally with a public URL
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub path: PathBuf,
    pub url: Option<String>,
}

/// Renders a collection summary image
pub trait CollectionRenderer: Send + Sync {
    fn render(&self, spec: &ChartSpec) -> Result<RenderedImage, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::formula::quote_figures;
    use crate::quote::Sex;

    #[test]
    fn test_chart_spec_from_figures() {
        let computed: Vec<(u32, QuoteFigures)> = [4u32, 5, 6]
            .iter()
            .map(|&term| (term, quote_figures(18, Sex::M, 300.0, term).unwrap()))
            .collect();

        let spec = ChartSpec::from_figures(300.0, "collection_premium300".to_string(), &computed);

        assert_eq!(spec.rows.len(), 3);
        assert_eq!(spec.rows[0].term, 4);
        assert_eq!(spec.rows[0].payout_table.len(), 4);
        assert_eq!(spec.rows[2].term, 6);
        assert_eq!(spec.rows[2].payout_table.len(), 6);
    }
}
