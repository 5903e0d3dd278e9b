//! Category bars (vertical, horizontal, stacked), line/area polylines and scatter markers.

use super::{PlotArea, Point, Rect, Tone, ValueScale};
use crate::models::{MultiSeries, NormalizedSeries, magnitude};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGeometry {
    pub index: usize,
    pub label: String,
    /// Value as received (may be negative).
    pub value: f64,
    /// Drawn size: `value` clamped to `>= 0`.
    pub magnitude: f64,
    pub rect: Rect,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedColumn {
    pub index: usize,
    pub label: String,
    pub total: f64,
    pub segments: Vec<BarGeometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub name: String,
    pub points: Vec<Point>,
    pub values: Vec<f64>,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGeometry {
    pub labels: Vec<String>,
    pub lines: Vec<Polyline>,
    pub domain_min: f64,
    pub domain_max: f64,
    pub baseline_y: f64,
    /// Fill between each line and the baseline.
    pub filled: bool,
}

fn max_magnitude(values: &[f64]) -> f64 {
    values.iter().map(|v| magnitude(*v)).fold(0.0, f64::max)
}

/// Vertical bars, one per label, heights from clamped magnitudes.
pub fn layout_bars(series: &NormalizedSeries, area: &PlotArea, bar_width_ratio: f64) -> Vec<BarGeometry> {
    let max = max_magnitude(series.values());
    let slot = area.slot_width(series.len());
    let bar_w = slot * bar_width_ratio;
    series
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let m = magnitude(value);
            let h = if max > 0.0 { m / max * area.height } else { 0.0 };
            let x = area.left + i as f64 * slot + (slot - bar_w) / 2.0;
            BarGeometry {
                index: i,
                label: label.to_string(),
                value,
                magnitude: m,
                rect: Rect::new(x, area.bottom() - h, bar_w, h),
                tone: Tone::Series(0),
            }
        })
        .collect()
}

/// Horizontal bars growing right from the left edge, first label on top.
pub fn layout_horizontal_bars(
    series: &NormalizedSeries,
    area: &PlotArea,
    bar_width_ratio: f64,
) -> Vec<BarGeometry> {
    let max = max_magnitude(series.values());
    let slot = area.slot_height(series.len());
    let bar_h = slot * bar_width_ratio;
    series
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let m = magnitude(value);
            let w = if max > 0.0 { m / max * area.width } else { 0.0 };
            let y = area.top + i as f64 * slot + (slot - bar_h) / 2.0;
            BarGeometry {
                index: i,
                label: label.to_string(),
                value,
                magnitude: m,
                rect: Rect::new(area.left, y, w, bar_h),
                tone: Tone::Series(0),
            }
        })
        .collect()
}

/// Stacked columns: each series adds a segment on top of the previous ones.
pub fn layout_stacked_bars(
    multi: &MultiSeries,
    area: &PlotArea,
    bar_width_ratio: f64,
) -> Vec<StackedColumn> {
    let n = multi.labels().len();
    let totals: Vec<f64> = (0..n)
        .map(|i| {
            multi
                .series()
                .iter()
                .map(|s| magnitude(s.values[i]))
                .sum::<f64>()
        })
        .collect();
    let max = totals.iter().copied().fold(0.0, f64::max);
    let slot = area.slot_width(n);
    let bar_w = slot * bar_width_ratio;
    let px_per_unit = if max > 0.0 { area.height / max } else { 0.0 };

    (0..n)
        .map(|i| {
            let x = area.left + i as f64 * slot + (slot - bar_w) / 2.0;
            let mut top = area.bottom();
            let segments = multi
                .series()
                .iter()
                .enumerate()
                .map(|(k, s)| {
                    let value = s.values[i];
                    let m = magnitude(value);
                    let h = m * px_per_unit;
                    top -= h;
                    BarGeometry {
                        index: i,
                        label: s.name.clone(),
                        value,
                        magnitude: m,
                        rect: Rect::new(x, top, bar_w, h),
                        tone: Tone::Series(k),
                    }
                })
                .collect();
            StackedColumn {
                index: i,
                label: multi.labels()[i].clone(),
                total: totals[i],
                segments,
            }
        })
        .collect()
}

/// X position of category `i` of `n`: slot centers, a single point sits mid-area.
pub fn category_x(area: &PlotArea, i: usize, n: usize) -> f64 {
    let slot = area.slot_width(n);
    area.left + slot * (i as f64 + 0.5)
}

/// One polyline per series over a signed domain `min(0, data)..max(0, data)`.
pub fn layout_lines(multi: &MultiSeries, area: &PlotArea, filled: bool) -> LineGeometry {
    let n = multi.labels().len();
    let finite = multi
        .series()
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let scale = ValueScale::new(lo, hi, area.top, area.bottom());

    let lines = multi
        .series()
        .iter()
        .enumerate()
        .map(|(k, s)| {
            let values: Vec<f64> = s
                .values
                .iter()
                .map(|v| if v.is_finite() { *v } else { 0.0 })
                .collect();
            Polyline {
                name: s.name.clone(),
                points: values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| Point::new(category_x(area, i, n), scale.to_px(*v)))
                    .collect(),
                values,
                tone: Tone::Series(k),
            }
        })
        .collect();

    LineGeometry {
        labels: multi.labels().to_vec(),
        lines,
        domain_min: scale.min,
        domain_max: scale.max,
        baseline_y: scale.to_px(0.0),
        filled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NamedValues;

    fn area() -> PlotArea {
        PlotArea::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn negative_bar_clamps_to_zero() {
        let s = NormalizedSeries::from_pairs(vec!["Jan".into()], vec![-5.0]);
        let bars = layout_bars(&s, &area(), 0.5);
        assert_eq!(bars[0].magnitude, 0.0);
        assert_eq!(bars[0].value, -5.0);
        assert_eq!(bars[0].rect.height, 0.0);
    }

    #[test]
    fn tallest_bar_fills_area() {
        let s = NormalizedSeries::from_pairs(vec!["a".into(), "b".into()], vec![10.0, 5.0]);
        let bars = layout_bars(&s, &area(), 0.5);
        assert_eq!(bars[0].rect.height, 100.0);
        assert_eq!(bars[1].rect.height, 50.0);
        assert_eq!(bars[0].rect.width, 25.0);
    }

    #[test]
    fn stacked_segments_sit_on_each_other() {
        let m = MultiSeries::new(
            vec!["q1".into()],
            vec![
                NamedValues { name: "a".into(), values: vec![30.0] },
                NamedValues { name: "b".into(), values: vec![10.0] },
            ],
        );
        let cols = layout_stacked_bars(&m, &area(), 0.5);
        let segs = &cols[0].segments;
        assert_eq!(cols[0].total, 40.0);
        assert!((segs[0].rect.y - segs[1].rect.bottom()).abs() < 1e-9);
        assert!((segs[1].rect.y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn lines_keep_sign_and_single_point_is_centered() {
        let m = MultiSeries::new(
            vec!["x".into()],
            vec![NamedValues { name: "a".into(), values: vec![-4.0] }],
        );
        let g = layout_lines(&m, &area(), false);
        assert_eq!(g.domain_min, -4.0);
        assert_eq!(g.lines[0].points[0].x, 50.0);
        assert_eq!(g.lines[0].points[0].y, 100.0);
    }
}
