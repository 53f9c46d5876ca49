//! Annotated correlation heatmap.

use super::DrawResult;
use crate::types::CorrelationMatrix;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

/// Diverging blue-white-red scale over `[-1, 1]`.
pub fn coolwarm(value: f64) -> RGBColor {
    let t = ((value.clamp(-1.0, 1.0) + 1.0) / 2.0).clamp(0.0, 1.0);
    let (from, to, t) = if t < 0.5 {
        (COOL, NEUTRAL, t * 2.0)
    } else {
        (NEUTRAL, WARM, (t - 0.5) * 2.0)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

pub(crate) fn draw(path: &Path, size: (u32, u32), title: &str, matrix: &CorrelationMatrix) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 20))?;

    let (width, height) = root.dim_in_pixel();
    let n = matrix.columns.len().max(1) as i32;
    let label_width = 180;
    let label_height = 40;
    let grid = (width as i32 - label_width - 20)
        .min(height as i32 - label_height - 20)
        .max(n);
    let cell = grid / n;
    let (left, top) = (label_width, 10);

    let centered = ("sans-serif", 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let row_label = ("sans-serif", 13)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));

    for (row, name) in matrix.columns.iter().enumerate() {
        let y0 = top + row as i32 * cell;
        root.draw(&Text::new(
            name.clone(),
            (left - 8, y0 + cell / 2),
            row_label.clone(),
        ))?;

        for col in 0..matrix.columns.len() {
            let x0 = left + col as i32 * cell;
            let corners = [(x0, y0), (x0 + cell, y0 + cell)];
            let value = matrix.get(row, col);

            let fill = value.map_or(RGBColor(200, 200, 200), coolwarm);
            root.draw(&Rectangle::new(corners, fill.filled()))?;
            root.draw(&Rectangle::new(corners, BLACK.stroke_width(1)))?;

            let annotation = value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));
            root.draw(&Text::new(
                annotation,
                (x0 + cell / 2, y0 + cell / 2),
                centered.clone(),
            ))?;
        }
    }

    let label_y = top + n * cell + label_height / 2;
    for (col, name) in matrix.columns.iter().enumerate() {
        let x = left + col as i32 * cell + cell / 2;
        root.draw(&Text::new(name.clone(), (x, label_y), centered.clone()))?;
    }

    root.present()?;
    Ok(())
}
