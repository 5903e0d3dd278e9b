//! Pie and donut sectors from clamped magnitudes.

use super::{Arc, Point, Tone, polar_to_cartesian};
use crate::models::NormalizedSeries;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PieLayout {
    pub center: Point,
    pub radius: f64,
    /// `0` for a pie, `> 0` for a donut.
    pub inner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub index: usize,
    pub label: String,
    pub value: f64,
    /// Share of the total in `[0, 1]`.
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub outer: Arc,
    pub inner_radius: f64,
    pub path: String,
    pub label_anchor: Point,
    pub tone: Tone,
}

/// SVG path for an annular sector; a full turn is drawn as two half arcs.
pub fn sector_path(center: Point, outer: f64, inner: f64, start: f64, end: f64) -> String {
    if end - start >= 360.0 - 1e-9 {
        let mid = start + 180.0;
        let o1 = Arc::new(center, outer, start, mid);
        let o2 = Arc::new(center, outer, mid, start + 360.0);
        let mut d = format!(
            "{} A {r:.3} {r:.3} 0 0 1 {:.3} {:.3}",
            o1.path_data(),
            o2.end.x,
            o2.end.y,
            r = outer
        );
        if inner > 0.0 {
            let i1 = polar_to_cartesian(center, inner, start);
            let i2 = polar_to_cartesian(center, inner, mid);
            d.push_str(&format!(
                " M {:.3} {:.3} A {r:.3} {r:.3} 0 0 0 {:.3} {:.3} A {r:.3} {r:.3} 0 0 0 {:.3} {:.3}",
                i1.x,
                i1.y,
                i2.x,
                i2.y,
                i1.x,
                i1.y,
                r = inner
            ));
        }
        return d + " Z";
    }

    let o = Arc::new(center, outer, start, end);
    let large = u8::from(o.large_arc);
    if inner > 0.0 {
        let i_end = polar_to_cartesian(center, inner, end);
        let i_start = polar_to_cartesian(center, inner, start);
        format!(
            "{} L {:.3} {:.3} A {r:.3} {r:.3} 0 {} 0 {:.3} {:.3} Z",
            o.path_data(),
            i_end.x,
            i_end.y,
            large,
            i_start.x,
            i_start.y,
            r = inner
        )
    } else {
        format!("{} L {:.3} {:.3} Z", o.path_data(), center.x, center.y)
    }
}

/// Sectors clockwise from 12 o'clock; an all-zero series yields no slices.
pub fn layout_pie(series: &NormalizedSeries, layout: &PieLayout) -> Vec<PieSlice> {
    let magnitudes = series.magnitudes();
    let total: f64 = magnitudes.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut angle = 0.0;
    series
        .labels()
        .iter()
        .zip(magnitudes)
        .enumerate()
        .map(|(i, (label, value))| {
            let fraction = value / total;
            let start_angle = angle;
            let end_angle = angle + fraction * 360.0;
            angle = end_angle;
            let label_radius = if layout.inner_radius > 0.0 {
                (layout.radius + layout.inner_radius) / 2.0
            } else {
                layout.radius * 0.65
            };
            PieSlice {
                index: i,
                label: label.clone(),
                value,
                fraction,
                start_angle,
                end_angle,
                outer: Arc::new(layout.center, layout.radius, start_angle, end_angle),
                inner_radius: layout.inner_radius,
                path: sector_path(
                    layout.center,
                    layout.radius,
                    layout.inner_radius,
                    start_angle,
                    end_angle,
                ),
                label_anchor: polar_to_cartesian(
                    layout.center,
                    label_radius,
                    (start_angle + end_angle) / 2.0,
                ),
                tone: Tone::Series(i),
            }
        })
        .collect()
}
