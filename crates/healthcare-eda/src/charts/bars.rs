//! Categorical bar charts.

use super::DrawResult;
use plotters::prelude::*;
use std::path::Path;

/// Fill of the bars.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BarFill {
    Solid(RGBColor),
    /// One palette colour per bar.
    Palette,
}

pub(crate) struct BarChart<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub bars: &'a [(String, f64)],
    pub fill: BarFill,
}

pub(crate) fn draw(path: &Path, size: (u32, u32), plot: &BarChart<'_>) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let n = plot.bars.len() as u32;
    let y_max = plot.bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(plot.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..n).into_segmented(), 0f64..y_top)?;

    let labels = plot.bars;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map(|(label, _)| label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc(plot.x_desc)
        .y_desc(plot.y_desc)
        .draw()?;

    let fill = plot.fill;
    chart.draw_series(
        Histogram::vertical(&chart)
            .style_func(move |x, _| {
                let index = match x {
                    SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => *i as usize,
                    SegmentValue::Last => 0,
                };
                match fill {
                    BarFill::Solid(color) => color.filled(),
                    BarFill::Palette => Palette99::pick(index).filled(),
                }
            })
            .margin(8)
            .data(
                plot.bars
                    .iter()
                    .enumerate()
                    .map(|(i, (_, value))| (i as u32, *value)),
            ),
    )?;

    root.present()?;
    Ok(())
}
