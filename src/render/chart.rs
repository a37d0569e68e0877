//! SVG chart + summary-table renderer
//!
//! Produces a single SVG file: the per-term payout curves on top, the
//! summary table underneath.

use std::fs;
use std::path::PathBuf;

use super::upload::TmpfilesClient;
use super::{ChartSpec, CollectionRenderer, RenderError, RenderedImage};

const WIDTH: f64 = 900.0;
const CHART_HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 50.0;
const TABLE_ROW_HEIGHT: f64 = 34.0;

/// Percentage axis range; payout values live in [60, 140]
const PCT_MIN: f64 = 50.0;
const PCT_MAX: f64 = 150.0;

const SERIES_COLORS: [&str; 3] = ["#FF6B35", "#004E89", "#1B998B"];

/// Renderer writing the collection summary as an SVG file
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    output_dir: PathBuf,
    uploader: Option<TmpfilesClient>,
}

impl SvgChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            uploader: None,
        }
    }

    /// Also upload each rendered file to the temporary host
    pub fn with_uploader(mut self, uploader: TmpfilesClient) -> Self {
        self.uploader = Some(uploader);
        self
    }

    fn x_for_year(max_years: usize, year: usize) -> f64 {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let span = (max_years.max(2) - 1) as f64;
        MARGIN_LEFT + plot_width * (year as f64 - 1.0) / span
    }

    fn y_for_pct(pct: f64) -> f64 {
        let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        MARGIN_TOP + plot_height * (PCT_MAX - pct) / (PCT_MAX - PCT_MIN)
    }

    fn build_svg(spec: &ChartSpec) -> String {
        let max_years = spec
            .rows
            .iter()
            .map(|row| row.payout_table.len())
            .max()
            .unwrap_or(1);
        let table_top = CHART_HEIGHT + 30.0;
        let total_height = table_top + TABLE_ROW_HEIGHT * (spec.rows.len() + 1) as f64 + 30.0;

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{total_height}" font-family="Helvetica, Arial, sans-serif">"#
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r##"<rect width="{WIDTH}" height="{total_height}" fill="#FFFFFF"/>"##
        ));
        svg.push('\n');

        // Title
        svg.push_str(&format!(
            r#"<text x="{}" y="32" font-size="18" font-weight="bold" text-anchor="middle">Payout evolution per term for a monthly premium of {:.0}</text>"#,
            WIDTH / 2.0,
            spec.premium
        ));
        svg.push('\n');

        // Horizontal grid lines and percentage labels
        let mut pct = PCT_MIN;
        while pct <= PCT_MAX {
            let y = Self::y_for_pct(pct);
            svg.push_str(&format!(
                r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#DDDDDD" stroke-dasharray="4 4"/>"##,
                WIDTH - MARGIN_RIGHT
            ));
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{pct:.0}%</text>"#,
                MARGIN_LEFT - 8.0,
                y + 4.0
            ));
            svg.push('\n');
            pct += 20.0;
        }

        // Year axis labels
        for year in 1..=max_years {
            let x = Self::x_for_year(max_years, year);
            svg.push_str(&format!(
                r#"<text x="{x:.1}" y="{:.1}" font-size="11" text-anchor="middle">Year {year}</text>"#,
                CHART_HEIGHT - MARGIN_BOTTOM + 20.0
            ));
            svg.push('\n');
        }

        // One polyline and legend entry per term
        for (idx, row) in spec.rows.iter().enumerate() {
            let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
            let points: Vec<String> = row
                .payout_table
                .iter()
                .enumerate()
                .map(|(year_idx, &value)| {
                    format!(
                        "{:.1},{:.1}",
                        Self::x_for_year(max_years, year_idx + 1),
                        Self::y_for_pct(value)
                    )
                })
                .collect();
            svg.push_str(&format!(
                r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="2.5"/>"#,
                points.join(" ")
            ));
            svg.push('\n');
            for point in &points {
                let (x, y) = point.split_once(',').unwrap_or(("0", "0"));
                svg.push_str(&format!(r#"<circle cx="{x}" cy="{y}" r="3.5" fill="{color}"/>"#));
            }
            svg.push('\n');
            let legend_y = MARGIN_TOP + 18.0 * idx as f64;
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{color}"/>"#,
                MARGIN_LEFT + 10.0,
                legend_y
            ));
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" font-size="12">{} years</text>"#,
                MARGIN_LEFT + 28.0,
                legend_y + 10.0,
                row.term
            ));
            svg.push('\n');
        }

        // Summary table
        let columns = ["Years", "Contribution", "Payout", "Gain", "Return %"];
        let col_width = (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / columns.len() as f64;
        for (col, label) in columns.iter().enumerate() {
            let x = MARGIN_LEFT + col_width * col as f64;
            svg.push_str(&format!(
                r##"<rect x="{x:.1}" y="{table_top:.1}" width="{col_width:.1}" height="{TABLE_ROW_HEIGHT}" fill="#004E89"/>"##
            ));
            svg.push_str(&format!(
                r##"<text x="{:.1}" y="{:.1}" font-size="13" font-weight="bold" fill="#FFFFFF" text-anchor="middle">{label}</text>"##,
                x + col_width / 2.0,
                table_top + 22.0
            ));
        }
        svg.push('\n');

        for (row_idx, row) in spec.rows.iter().enumerate() {
            let y = table_top + TABLE_ROW_HEIGHT * (row_idx + 1) as f64;
            let fill = if row_idx % 2 == 0 { "#FFFFFF" } else { "#F0F0F0" };
            let cells = [
                row.term.to_string(),
                format_amount(row.total_contribution),
                format_amount(row.total_payout),
                format_amount(row.total_gain),
                format!("{:.2}%", row.return_percentage),
            ];
            for (col, cell) in cells.iter().enumerate() {
                let x = MARGIN_LEFT + col_width * col as f64;
                svg.push_str(&format!(
                    r##"<rect x="{x:.1}" y="{y:.1}" width="{col_width:.1}" height="{TABLE_ROW_HEIGHT}" fill="{fill}" stroke="#DDDDDD"/>"##
                ));
                svg.push_str(&format!(
                    r#"<text x="{:.1}" y="{:.1}" font-size="13" text-anchor="middle">{cell}</text>"#,
                    x + col_width / 2.0,
                    y + 22.0
                ));
            }
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl CollectionRenderer for SvgChartRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<RenderedImage, RenderError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.svg", spec.file_stem));
        fs::write(&path, Self::build_svg(spec))?;
        log::info!("collection image written to {}", path.display());

        let url = self.uploader.as_ref().and_then(|uploader| {
            match uploader.upload(&path) {
                Ok(url) => Some(url),
                Err(err) => {
                    log::warn!("image upload failed: {}", err);
                    None
                }
            }
        });

        Ok(RenderedImage { path, url })
    }
}

/// Format a currency amount with two decimals and a thin-space thousands
/// separator, e.g. 15992.64 -> "15 992.64"
fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (integer, decimals) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, decimals)
}
