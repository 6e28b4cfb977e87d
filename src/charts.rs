use anyhow::Result;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::path::Path;

/// One bar of a chart: a category label, its value and its fill color.
pub struct Bar {
    pub label: &'static str,
    pub value: u32,
    pub color: RGBColor,
}

pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A one-shot bar chart definition. The two instances below are fixed
/// datasets; they share nothing with the map or with each other.
pub struct BarChart {
    pub value_label: &'static str,
    pub orientation: Orientation,
    pub bar_border: Option<RGBColor>,
    pub bars: Vec<Bar>,
}

/// Funding breakdown, drawn as horizontal bars with white bar borders.
pub fn funding_chart() -> BarChart {
    BarChart {
        value_label: "Amount (in Lakhs)",
        orientation: Orientation::Horizontal,
        bar_border: Some(hex_color("#ffffff")),
        bars: vec![
            Bar { label: "Corp. Grants", value: 120, color: hex_color("#1e3a8a") },
            Bar { label: "Donations", value: 190, color: hex_color("#f97316") },
            Bar { label: "Govt. Aid", value: 30, color: hex_color("#60a5fa") },
        ],
    }
}

/// Student counts per city, drawn as vertical bars from a zero baseline.
pub fn students_chart() -> BarChart {
    let color = hex_color("#1e3a8a");
    BarChart {
        value_label: "Number of Students",
        orientation: Orientation::Vertical,
        bar_border: None,
        bars: vec![
            Bar { label: "Delhi", value: 2500, color },
            Bar { label: "Mumbai", value: 3200, color },
            Bar { label: "Pune", value: 1500, color },
            Bar { label: "Nagpur", value: 1300, color },
        ],
    }
}

pub fn render_bar_chart(spec: &BarChart, path: &Path, width: u32, height: u32) -> Result<()> {
    let root = SVGBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_value = spec.bars.iter().map(|b| b.value).max().unwrap_or(0);
    // Headroom so the longest bar stays clear of the plot edge.
    let axis_max = max_value + max_value / 10 + 1;
    let count = spec.bars.len();

    match spec.orientation {
        Orientation::Horizontal => {
            let mut chart = ChartBuilder::on(&root)
                .margin(12)
                .x_label_area_size(36)
                .y_label_area_size(96)
                .build_cartesian_2d(0u32..axis_max, (0..count).into_segmented())?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(count)
                .y_label_formatter(&|seg: &SegmentValue<usize>| segment_label(spec, seg))
                .x_desc(spec.value_label)
                .draw()?;

            chart.draw_series(spec.bars.iter().enumerate().map(|(i, bar)| {
                let mut rect = Rectangle::new(
                    [(0, SegmentValue::Exact(i)), (bar.value, SegmentValue::Exact(i + 1))],
                    bar.color.filled(),
                );
                rect.set_margin(6, 6, 0, 0);
                rect
            }))?;

            if let Some(border) = spec.bar_border {
                chart.draw_series(spec.bars.iter().enumerate().map(|(i, bar)| {
                    let mut rect = Rectangle::new(
                        [(0, SegmentValue::Exact(i)), (bar.value, SegmentValue::Exact(i + 1))],
                        ShapeStyle {
                            color: border.to_rgba(),
                            filled: false,
                            stroke_width: 1,
                        },
                    );
                    rect.set_margin(6, 6, 0, 0);
                    rect
                }))?;
            }
        }
        Orientation::Vertical => {
            let mut chart = ChartBuilder::on(&root)
                .margin(12)
                .x_label_area_size(32)
                .y_label_area_size(56)
                .build_cartesian_2d((0..count).into_segmented(), 0u32..axis_max)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(count)
                .x_label_formatter(&|seg: &SegmentValue<usize>| segment_label(spec, seg))
                .y_desc(spec.value_label)
                .draw()?;

            chart.draw_series(spec.bars.iter().enumerate().map(|(i, bar)| {
                let mut rect = Rectangle::new(
                    [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), bar.value)],
                    bar.color.filled(),
                );
                rect.set_margin(0, 0, 6, 6);
                rect
            }))?;

            if let Some(border) = spec.bar_border {
                chart.draw_series(spec.bars.iter().enumerate().map(|(i, bar)| {
                    let mut rect = Rectangle::new(
                        [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), bar.value)],
                        ShapeStyle {
                            color: border.to_rgba(),
                            filled: false,
                            stroke_width: 1,
                        },
                    );
                    rect.set_margin(0, 0, 6, 6);
                    rect
                }))?;
            }
        }
    }

    // No legend: these are single-series charts, the axis labels carry it.
    root.present()?;
    Ok(())
}

fn segment_label(spec: &BarChart, seg: &SegmentValue<usize>) -> String {
    match seg {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => spec
            .bars
            .get(*i)
            .map(|bar| bar.label.to_string())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

fn hex_color(hex: &str) -> RGBColor {
    let hex = hex.trim_start_matches('#');
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    RGBColor(r, g, b)
}
