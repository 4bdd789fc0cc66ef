//! Orbit plot rendered from a simulator report: X against Y on equal axes.

use std::fs;
use std::path::Path;

use mission_export::report::{POSITIONAL_PREFIX, ReportTable};
use plotters::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("report has no rows to plot")]
    Empty,
    #[error("report has no X/Y columns")]
    MissingAxes,
    #[error("output path contains invalid UTF-8")]
    InvalidPath,
    #[error("failed to create plot directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("drawing failed: {0}")]
    Drawing(String),
}

/// Image size and whether to draw text (caption, axis labels).
///
/// Text rendering needs a system font; unlabelled plots do not.
#[derive(Debug, Clone, Copy)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    pub labels: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 900,
            height: 900,
            labels: true,
        }
    }
}

/// Axis ranges of a plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// Pick the X and Y position columns: `*.X`/`*.Y` by name, or the second and
/// third columns of a headerless report. Named reports without position
/// columns have nothing to plot.
pub fn select_axes(table: &ReportTable) -> Option<(usize, usize)> {
    let by_suffix = |suffix: &str| {
        table
            .columns
            .iter()
            .position(|name| name == suffix.trim_start_matches('.') || name.ends_with(suffix))
    };
    let headerless = table.columns.iter().all(|name| name.starts_with(POSITIONAL_PREFIX));
    match (by_suffix(".X"), by_suffix(".Y")) {
        (Some(x), Some(y)) => Some((x, y)),
        _ if headerless && table.columns.len() >= 3 => Some((1, 2)),
        _ => None,
    }
}

/// Square bounds around `points` with a 10% margin so the orbit keeps its shape.
pub fn equal_aspect_bounds(points: &[(f64, f64)]) -> Option<Bounds> {
    let (first_x, first_y) = *points.first()?;
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first_x, first_x, first_y, first_y);
    for &(x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let center_x = 0.5 * (min_x + max_x);
    let center_y = 0.5 * (min_y + max_y);
    let mut half = 0.5 * (max_x - min_x).max(max_y - min_y) * 1.1;
    if !(half.is_finite() && half > 0.0) {
        half = 1.0;
    }
    Some(Bounds {
        x: (center_x - half, center_x + half),
        y: (center_y - half, center_y + half),
    })
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn drawing<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Drawing(err.to_string())
}

/// Render the XY trajectory of `table` to a PNG at `output`.
pub fn render_orbit(
    table: &ReportTable,
    output: &Path,
    options: &PlotOptions,
) -> Result<Bounds, PlotError> {
    let (x_idx, y_idx) = select_axes(table).ok_or(PlotError::MissingAxes)?;
    let points: Vec<(f64, f64)> = table
        .rows
        .iter()
        .filter_map(|row| Some((*row.get(x_idx)?, *row.get(y_idx)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    let bounds = equal_aspect_bounds(&points).ok_or(PlotError::Empty)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = output.to_str().ok_or(PlotError::InvalidPath)?;
    let root = BitMapBackend::new(output_str, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;

    let x_name = &table.columns[x_idx];
    let y_name = &table.columns[y_idx];
    let font_family = select_font_family();

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if options.labels {
        builder
            .caption(
                format!("Orbit in the XY plane ({y_name} vs {x_name})"),
                FontDesc::new(font_family, 24.0, FontStyle::Bold),
            )
            .x_label_area_size(50)
            .y_label_area_size(90);
    }
    let mut chart = builder
        .build_cartesian_2d(bounds.x.0..bounds.x.1, bounds.y.0..bounds.y.1)
        .map_err(drawing)?;

    if options.labels {
        chart
            .configure_mesh()
            .x_desc(format!("{x_name} (km)"))
            .y_desc(format!("{y_name} (km)"))
            .label_style(FontDesc::new(font_family, 16.0, FontStyle::Normal))
            .x_labels(6)
            .y_labels(6)
            .draw()
            .map_err(drawing)?;
    }

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(drawing)?;

    let start_color = RGBColor(20, 160, 60);
    let end_color = RGBColor(210, 100, 20);
    if let (Some(&start), Some(&end)) = (points.first(), points.last()) {
        chart
            .draw_series(std::iter::once(Circle::new(start, 5, start_color.filled())))
            .map_err(drawing)?;
        chart
            .draw_series(std::iter::once(Circle::new(end, 5, end_color.filled())))
            .map_err(drawing)?;
    }

    root.present().map_err(drawing)?;
    log::info!("orbit plot written to {}", output.display());
    Ok(bounds)
}
