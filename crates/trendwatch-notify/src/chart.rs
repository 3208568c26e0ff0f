//! SVG chart rendering for alert emails.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};
use trendwatch_core::error::AlertError;
use trendwatch_core::traits::ChartRenderer;
use trendwatch_core::types::{ChartArtifact, MovingAverageSeries, PriceSeries};
use uuid::Uuid;

const CLOSE_COLOR: &str = "#1f77b4";
const MA_COLOR: &str = "#ff7f0e";
const HIGHLIGHT_COLOR: &str = "#ffe9a8";

/// Renders close and moving average as an in-memory SVG.
#[derive(Debug, Clone, Copy)]
pub struct SvgChartRenderer {
    width: u32,
    height: u32,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
        }
    }
}

impl SvgChartRenderer {
    /// Create a renderer with the given canvas size in pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(200),
            height: height.max(150),
        }
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(
        &self,
        series: &PriceSeries,
        moving_average: &MovingAverageSeries,
        window: usize,
    ) -> Result<ChartArtifact, AlertError> {
        let latest = series
            .latest_date()
            .ok_or_else(|| AlertError::Chart(format!("{} has no price data", series.ticker)))?;

        let closes: Vec<f64> = series
            .iter()
            .map(|p| p.close.to_f64().unwrap_or_default())
            .collect();
        let averages: Vec<Option<f64>> = moving_average
            .values()
            .iter()
            .map(|v| v.and_then(|d| d.to_f64()))
            .collect();

        let mut svg = String::new();
        self.write_svg(&mut svg, &series.ticker, latest, &closes, &averages, window)
            .map_err(|e| AlertError::Chart(e.to_string()))?;

        Ok(ChartArtifact {
            file_name: format!("{}_{}.svg", file_stem(&series.ticker), latest),
            content_type: "image/svg+xml".to_string(),
            bytes: svg.into_bytes(),
        })
    }
}

impl SvgChartRenderer {
    fn write_svg(
        &self,
        svg: &mut String,
        ticker: &str,
        latest: NaiveDate,
        closes: &[f64],
        averages: &[Option<f64>],
        window: usize,
    ) -> fmt::Result {
        let (min, max) = closes
            .iter()
            .copied()
            .chain(averages.iter().flatten().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        let width = self.width as f64;
        let height = self.height as f64;
        let left = 70.0;
        let right = 20.0;
        let top = 60.0;
        let bottom = 40.0;
        let plot_width = width - left - right;
        let plot_height = height - top - bottom;

        let range = max - min;
        let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
        let scale_x = if closes.len() > 1 {
            plot_width / (closes.len() - 1) as f64
        } else {
            0.0
        };
        let x = |i: usize| left + i as f64 * scale_x;
        let y = |v: f64| {
            if range > 0.0 {
                top + plot_height - (v - min) * scale_y
            } else {
                top + plot_height / 2.0
            }
        };

        let ticker = xml_text(ticker);

        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
            w = self.width,
            h = self.height
        )?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;

        // Most recent `window` days
        let highlighted = window.min(closes.len());
        if highlighted > 0 {
            let start = x(closes.len() - highlighted);
            let end = x(closes.len() - 1);
            writeln!(
                svg,
                r#"<rect class="window" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" fill-opacity="0.6"/>"#,
                start,
                top,
                (end - start).max(1.0),
                plot_height,
                HIGHLIGHT_COLOR
            )?;
        }

        // Axes and y ticks
        writeln!(
            svg,
            r#"<line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="black"/><line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="black"/>"#,
            l = left,
            t = top,
            b = top + plot_height,
            r = left + plot_width
        )?;
        for step in 0..=4 {
            let value = min + range * step as f64 / 4.0;
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{:.2}</text>"#,
                left - 6.0,
                y(value) + 4.0,
                value
            )?;
        }
        writeln!(
            svg,
            r#"<text x="16" y="{:.1}" transform="rotate(-90 16 {:.1})" text-anchor="middle">USD</text>"#,
            top + plot_height / 2.0,
            top + plot_height / 2.0
        )?;

        // Close and moving average
        let close_points: Vec<String> = closes
            .iter()
            .enumerate()
            .map(|(i, &v)| format!("{:.1},{:.1}", x(i), y(v)))
            .collect();
        writeln!(
            svg,
            r#"<polyline class="close" fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
            CLOSE_COLOR,
            close_points.join(" ")
        )?;

        let ma_points: Vec<String> = averages
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| format!("{:.1},{:.1}", x(i), y(v))))
            .collect();
        if !ma_points.is_empty() {
            writeln!(
                svg,
                r#"<polyline class="ma" fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
                MA_COLOR,
                ma_points.join(" ")
            )?;
        }

        // Title and legend
        writeln!(
            svg,
            r#"<text x="{:.1}" y="20" text-anchor="middle" font-size="16">{}</text><text x="{:.1}" y="38" text-anchor="middle">{}</text>"#,
            width / 2.0,
            ticker,
            width / 2.0,
            latest
        )?;
        let legend_x = left + 10.0;
        writeln!(
            svg,
            r#"<line x1="{lx:.1}" y1="{y1:.1}" x2="{lx2:.1}" y2="{y1:.1}" stroke="{}" stroke-width="2"/><text x="{tx:.1}" y="{ty1:.1}">{}</text>"#,
            CLOSE_COLOR,
            ticker,
            lx = legend_x,
            lx2 = legend_x + 20.0,
            y1 = top + 12.0,
            tx = legend_x + 26.0,
            ty1 = top + 16.0
        )?;
        writeln!(
            svg,
            r#"<line x1="{lx:.1}" y1="{y2:.1}" x2="{lx2:.1}" y2="{y2:.1}" stroke="{}" stroke-width="2"/><text x="{tx:.1}" y="{ty2:.1}">{}-day MA</text>"#,
            MA_COLOR,
            window,
            lx = legend_x,
            lx2 = legend_x + 20.0,
            y2 = top + 30.0,
            tx = legend_x + 26.0,
            ty2 = top + 34.0
        )?;
        svg.push_str("</svg>\n");

        Ok(())
    }
}

/// Escape text content for an SVG `<text>` node.
fn xml_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Persist a chart under `dir` with a name unique to this run.
pub fn write_run_scoped(artifact: &ChartArtifact, dir: &Path) -> Result<PathBuf, AlertError> {
    fs::create_dir_all(dir)?;

    let stem = artifact
        .file_name
        .strip_suffix(".svg")
        .unwrap_or(&artifact.file_name);
    let path = dir.join(format!("{}_{}.svg", stem, Uuid::new_v4().simple()));
    fs::write(&path, &artifact.bytes)?;

    Ok(path)
}

fn file_stem(ticker: &str) -> String {
    ticker
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
