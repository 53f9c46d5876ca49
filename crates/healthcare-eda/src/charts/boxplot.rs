//! Horizontal box-and-whisker plots, one box per group.

use super::DrawResult;
use plotters::prelude::*;
use std::path::Path;

pub(crate) fn draw(
    path: &Path,
    size: (u32, u32),
    title: &str,
    x_desc: &str,
    groups: &[(String, Vec<f64>)],
) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<String> = groups.iter().map(|(label, _)| label.clone()).collect();
    let (lo, hi) = groups
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let (lo, hi) = if lo.is_finite() && hi.is_finite() {
        (lo as f32, hi as f32)
    } else {
        (0.0, 1.0)
    };
    let pad = ((hi - lo) * 0.05).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(120)
        .build_cartesian_2d(lo - pad..hi + pad, labels[..].into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(x_desc)
        .draw()?;

    chart.draw_series(groups.iter().enumerate().map(|(i, (_, values))| {
        let quartiles = Quartiles::new(values);
        Boxplot::new_horizontal(SegmentValue::CenterOf(&labels[i]), &quartiles)
            .width(20)
            .whisker_width(0.5)
            .style(&Palette99::pick(i))
    }))?;

    root.present()?;
    Ok(())
}
