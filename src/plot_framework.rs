// src/plot_framework.rs

use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, Cross, PathElement, Text, TriangleMarker};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;
use std::ops::Range;
use std::path::Path;

use crate::font_config::{
    FONT_TUPLE_ANNOTATION, FONT_TUPLE_AXIS_LABEL, FONT_TUPLE_CHART_TITLE, FONT_TUPLE_LEGEND,
    FONT_TUPLE_MAIN_TITLE, FONT_TUPLE_MESSAGE,
};
use crate::constants::{LINE_WIDTH_LEGEND, MARKER_SIZE, PLOT_HEIGHT, PLOT_WIDTH};

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Min/max of the finite values, or `None` when there are none.
pub fn finite_bounds<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Time axis range: exact data span, widened only when the span is empty.
pub fn time_axis_range(min_t: f64, max_t: f64) -> Range<f64> {
    if max_t > min_t {
        min_t..max_t
    } else {
        let (lo, hi) = calculate_range(min_t, max_t);
        lo..hi
    }
}

/// Y-axis tick text, compact for large magnitudes and precise for small ones.
pub fn format_tick_value(y: f64) -> String {
    // Rounding residue around a zero tick would print as "-0.000".
    let y = if y.abs() < 1e-9 { 0.0 } else { y };
    let magnitude = y.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", y / 1_000_000.0)
    } else if magnitude >= 10_000.0 {
        format!("{:.0}k", y / 1000.0)
    } else if magnitude >= 100.0 || y.fract() == 0.0 {
        format!("{y:.0}")
    } else if magnitude >= 1.0 {
        format!("{y:.1}")
    } else {
        format!("{y:.3}")
    }
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, Shift>,
    subject: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    const CHAR_WIDTH_RATIO: f32 = 0.6;
    const LINE_HEIGHT_SPACING: i32 = 4;

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (x_range.end - x_range.start, y_range.end - y_range.start);
    let message = format!("{subject} Data Unavailable:\n{reason}");

    let (_, font_size) = FONT_TUPLE_MESSAGE;
    let estimated_char_width = (font_size as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = font_size + LINE_HEIGHT_SPACING;

    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) as i32;
    let estimated_text_width = max_line_length.saturating_mul(estimated_char_width);
    let estimated_text_height = (lines.len() as i32).saturating_mul(estimated_line_height);

    let center_x = width / 2 - estimated_text_width / 2;
    let center_y = height / 2 - estimated_text_height / 2;

    for (i, line) in lines.iter().enumerate() {
        let text_style = FONT_TUPLE_MESSAGE.into_font().color(&RED);
        area.draw(&Text::new(
            *line,
            (center_x, center_y + i as i32 * estimated_line_height),
            text_style,
        ))?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
}

#[derive(Clone)]
pub struct PlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub x_label: String,
    pub y_label: String,
}

impl PlotConfig {
    pub fn has_data(&self) -> bool {
        self.series.iter().any(|s| !s.data.is_empty())
    }

    pub fn has_valid_ranges(&self) -> bool {
        self.x_range.end > self.x_range.start && self.y_range.end > self.y_range.start
    }
}

/// One cell of a panel grid.
#[derive(Clone)]
pub enum Panel {
    Chart(PlotConfig),
    /// Intentionally blank cell.
    Spacer,
}

/// Draws a single line chart using a PlotConfig struct.
fn draw_line_chart(
    area: &DrawingArea<BitMapBackend, Shift>,
    plot_config: &PlotConfig,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(&plot_config.title, FONT_TUPLE_CHART_TITLE)
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(plot_config.x_range.clone(), plot_config.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_labels(10)
        .y_labels(10)
        .y_label_formatter(&|y| format_tick_value(*y))
        .light_line_style(WHITE.mix(0.7))
        .label_style(FONT_TUPLE_AXIS_LABEL)
        .draw()?;

    let mut legend_series_count = 0;
    for s in &plot_config.series {
        if s.data.is_empty() {
            continue;
        }
        let series = chart.draw_series(LineSeries::new(
            s.data.iter().cloned(),
            s.color.stroke_width(s.stroke_width),
        ))?;
        if !s.label.is_empty() {
            let color = s.color;
            series.label(&s.label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
            });
            legend_series_count += 1;
        }
    }

    if legend_series_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(FONT_TUPLE_LEGEND)
            .draw()?;
    }
    Ok(())
}

fn draw_main_title(
    root_area: &DrawingArea<BitMapBackend, Shift>,
    main_title: &str,
) -> Result<(), Box<dyn Error>> {
    root_area.draw(&Text::new(
        main_title,
        (10, 10),
        FONT_TUPLE_MAIN_TITLE.into_font().color(&BLACK),
    ))?;
    Ok(())
}

/// Creates a grid image of `rows` x `cols` panels, filled row by row.
///
/// Spacer cells stay blank. Charts without data or with empty ranges get a
/// placeholder message instead. Returns whether any chart was drawn.
pub fn draw_panel_grid(
    output_path: &Path,
    main_title: &str,
    (rows, cols): (usize, usize),
    panels: &[Panel],
) -> Result<bool, Box<dyn Error>> {
    let root_area = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    draw_main_title(&root_area, main_title)?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly((rows, cols));
    let mut any_chart_drawn = false;

    for (area, panel) in sub_plot_areas.iter().zip(panels) {
        let Panel::Chart(plot_config) = panel else {
            continue;
        };
        let has_data = plot_config.has_data();
        if has_data && plot_config.has_valid_ranges() {
            draw_line_chart(area, plot_config)?;
            any_chart_drawn = true;
        } else {
            let reason = if !has_data {
                "No data points"
            } else {
                "Invalid ranges"
            };
            draw_unavailable_message(area, &plot_config.title, reason)?;
        }
    }

    root_area.present()?;
    if any_chart_drawn {
        tracing::info!("  Panel plot saved as '{}'.", output_path.display());
    } else {
        tracing::warn!(
            "  '{}' saved with placeholder messages only: no panel had data to plot.",
            output_path.display()
        );
    }
    Ok(any_chart_drawn)
}

/// Marker drawn for each point of a scatter series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Triangle,
    Cross,
}

/// A point placed on a categorical x-axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    /// Index into [`ScatterConfig::categories`].
    pub category: usize,
    pub value: f64,
    /// Text drawn right of the point; empty for none.
    pub annotation: String,
}

#[derive(Debug, Clone)]
pub struct ScatterSeries {
    pub label: String,
    pub color: RGBColor,
    pub marker: MarkerShape,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone)]
pub struct ScatterConfig {
    pub title: String,
    /// Category labels in x-axis order.
    pub categories: Vec<String>,
    pub y_range: Range<f64>,
    pub series: Vec<ScatterSeries>,
    pub x_label: String,
    pub y_label: String,
    pub show_legend: bool,
}

/// Integer domain of a categorical axis with `count` slots.
///
/// plotters' integer ranges include their end value, so `count` categories
/// span `0..count - 1`.
pub fn category_axis(count: usize) -> Range<i32> {
    let last = count.saturating_sub(1) as i32;
    0..last
}

fn draw_category_scatter_chart(
    area: &DrawingArea<BitMapBackend, Shift>,
    config: &ScatterConfig,
) -> Result<(), Box<dyn Error>> {
    let categories = &config.categories;

    let mut chart = ChartBuilder::on(area)
        .caption(&config.title, FONT_TUPLE_CHART_TITLE)
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(
            category_axis(categories.len()).into_segmented(),
            config.y_range.clone(),
        )?;

    chart
        .configure_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .x_labels(categories.len())
        .x_label_formatter(&|v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => categories
                .get(*i as usize)
                .cloned()
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .y_labels(10)
        .y_label_formatter(&|y| format_tick_value(*y))
        .light_line_style(WHITE.mix(0.7))
        .label_style(FONT_TUPLE_AXIS_LABEL)
        .draw()?;

    for s in &config.series {
        let color = s.color;
        let coords: Vec<(SegmentValue<i32>, f64)> = s
            .points
            .iter()
            .map(|p| (SegmentValue::CenterOf(p.category as i32), p.value))
            .collect();

        let show_label = config.show_legend && !s.label.is_empty();
        match s.marker {
            MarkerShape::Circle => {
                let anno = chart.draw_series(
                    coords
                        .iter()
                        .map(|c| Circle::new(c.clone(), MARKER_SIZE, color.filled())),
                )?;
                if show_label {
                    anno.label(&s.label).legend(move |(x, y)| {
                        Circle::new((x + 10, y), MARKER_SIZE, color.filled())
                    });
                }
            }
            MarkerShape::Triangle => {
                let anno = chart.draw_series(
                    coords
                        .iter()
                        .map(|c| TriangleMarker::new(c.clone(), MARKER_SIZE, color.filled())),
                )?;
                if show_label {
                    anno.label(&s.label).legend(move |(x, y)| {
                        TriangleMarker::new((x + 10, y), MARKER_SIZE, color.filled())
                    });
                }
            }
            MarkerShape::Cross => {
                let anno = chart.draw_series(
                    coords
                        .iter()
                        .map(|c| Cross::new(c.clone(), MARKER_SIZE, color.stroke_width(2))),
                )?;
                if show_label {
                    anno.label(&s.label).legend(move |(x, y)| {
                        Cross::new((x + 10, y), MARKER_SIZE, color.stroke_width(2))
                    });
                }
            }
        }

        chart.draw_series(s.points.iter().zip(coords.iter()).filter_map(|(p, c)| {
            if p.annotation.is_empty() {
                None
            } else {
                Some(Text::new(
                    p.annotation.clone(),
                    c.clone(),
                    FONT_TUPLE_ANNOTATION.into_font().color(&BLACK),
                ))
            }
        }))?;
    }

    if config.show_legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(FONT_TUPLE_LEGEND)
            .draw()?;
    }
    Ok(())
}

/// Creates a single-chart image with a categorical-x scatter plot.
pub fn draw_category_scatter_plot(
    output_path: &Path,
    main_title: &str,
    config: &ScatterConfig,
) -> Result<bool, Box<dyn Error>> {
    let root_area = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    draw_main_title(&root_area, main_title)?;
    let area = root_area.margin(50, 5, 5, 5);

    let has_points = !config.categories.is_empty()
        && config.series.iter().any(|s| !s.points.is_empty());
    let valid_range = config.y_range.end > config.y_range.start;
    if has_points && valid_range {
        draw_category_scatter_chart(&area, config)?;
    } else {
        let reason = if !has_points {
            "No data points"
        } else {
            "Invalid ranges"
        };
        draw_unavailable_message(&area, &config.title, reason)?;
    }

    root_area.present()?;
    tracing::info!("  Scatter plot saved as '{}'.", output_path.display());
    Ok(has_points && valid_range)
}
