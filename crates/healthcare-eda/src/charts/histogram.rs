//! Fixed-width histograms.

use super::DrawResult;
use plotters::prelude::*;
use std::path::Path;

/// One histogram bin, `[start, end)`; the last bin is closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: u32,
}

/// Split the range of `values` into `bins` equal-width bins.
///
/// A constant input gets a unit-wide range centred on the value.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0u32; bins];
    for v in finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count,
        })
        .collect()
}

pub(crate) fn draw(
    path: &Path,
    size: (u32, u32),
    title: &str,
    x_desc: &str,
    bins: &[HistogramBin],
) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let x_min = bins.first().map_or(0.0, |b| b.start);
    let x_max = bins.last().map_or(1.0, |b| b.end);
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0u32..y_max + y_max / 10 + 1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("Count")
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.start, 0), (b.end, b.count)], RED.mix(0.7).filled())
    }))?;
    chart.draw_series(
        bins.iter()
            .map(|b| Rectangle::new([(b.start, 0), (b.end, b.count)], BLACK.stroke_width(1))),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bins_cover_range() {
        let bins = histogram_bins(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[3].end, 4.0);
        // maximum lands in the last bin
        let counts: Vec<u32> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_bins_total_matches_input() {
        let values: Vec<f64> = (0..137).map(|v| v as f64 * 1.7).collect();
        let bins = histogram_bins(&values, 50);
        assert_eq!(bins.len(), 50);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u32>(), 137);
    }

    #[test]
    fn test_bins_constant_input() {
        let bins = histogram_bins(&[7.0, 7.0], 10);
        assert_eq!(bins.first().unwrap().start, 6.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u32>(), 2);
    }

    #[test]
    fn test_bins_empty() {
        assert!(histogram_bins(&[], 50).is_empty());
        assert!(histogram_bins(&[f64::NAN], 50).is_empty());
    }
}
