//! Funnel: stacked trapezoids whose widths taper continuously from stage to stage.

use super::{Point, Tone, ratio};
use crate::models::magnitude;
use serde::Serialize;

/// Width of the last stage's bottom edge relative to its own top edge.
pub const LAST_STAGE_TAPER: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStage {
    pub label: String,
    pub value: f64,
    pub percentage: Option<f64>,
    pub conversion: Option<f64>,
}

impl FunnelStage {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            percentage: None,
            conversion: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FunnelLayout {
    pub center_x: f64,
    pub top: f64,
    pub stage_height: f64,
    pub gap: f64,
    pub max_width: f64,
    pub min_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStageGeometry {
    pub index: usize,
    pub label: String,
    pub value: f64,
    /// Relative to the first stage.
    pub percentage: f64,
    /// Relative to the previous stage.
    pub conversion: f64,
    pub top_width: f64,
    pub bottom_width: f64,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub polygon: Vec<Point>,
    pub label_anchor: Point,
    pub tone: Tone,
}

/// `value_i / value_0 * 100`; every stage reads `0` when the first stage is `0`.
pub fn funnel_percentages(values: &[f64]) -> Vec<f64> {
    let first = values.first().copied().map(magnitude).unwrap_or(0.0);
    values
        .iter()
        .map(|v| {
            if first > 0.0 {
                magnitude(*v) / first * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

/// `value_i / value_{i-1} * 100`; `100` for the first stage, `0` after a zero stage.
pub fn funnel_conversions(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if i == 0 {
                return 100.0;
            }
            let prev = magnitude(values[i - 1]);
            if prev == 0.0 {
                0.0
            } else {
                magnitude(*v) / prev * 100.0
            }
        })
        .collect()
}

pub fn layout_funnel(stages: &[FunnelStage], layout: &FunnelLayout) -> Vec<FunnelStageGeometry> {
    if stages.is_empty() {
        return Vec::new();
    }
    let values: Vec<f64> = stages.iter().map(|s| magnitude(s.value)).collect();
    let max_value = values.iter().copied().fold(0.0, f64::max);
    let ratios: Vec<f64> = values.iter().map(|v| ratio(*v, max_value)).collect();
    let percentages = funnel_percentages(&values);
    let conversions = funnel_conversions(&values);
    let width_for = |r: f64| layout.min_width + (layout.max_width - layout.min_width) * r;

    stages
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let top_width = width_for(ratios[i]);
            let bottom_ratio = ratios
                .get(i + 1)
                .copied()
                .unwrap_or(ratios[i] * LAST_STAGE_TAPER);
            let bottom_width = width_for(bottom_ratio);
            let y0 = layout.top + i as f64 * (layout.stage_height + layout.gap);
            let y1 = y0 + layout.stage_height;
            let cx = layout.center_x;
            FunnelStageGeometry {
                index: i,
                label: stage.label.clone(),
                value: values[i],
                percentage: stage.percentage.unwrap_or(percentages[i]),
                conversion: stage.conversion.unwrap_or(conversions[i]),
                top_width,
                bottom_width,
                polygon: vec![
                    Point::new(cx - top_width / 2.0, y0),
                    Point::new(cx + top_width / 2.0, y0),
                    Point::new(cx + bottom_width / 2.0, y1),
                    Point::new(cx - bottom_width / 2.0, y1),
                ],
                label_anchor: Point::new(cx, (y0 + y1) / 2.0),
                tone: Tone::Series(i),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> FunnelLayout {
        FunnelLayout {
            center_x: 200.0,
            top: 0.0,
            stage_height: 50.0,
            gap: 0.0,
            max_width: 300.0,
            min_width: 60.0,
        }
    }

    #[test]
    fn widths_interpolate_between_stages() {
        let stages = [FunnelStage::new("a", 100.0), FunnelStage::new("b", 50.0)];
        let g = layout_funnel(&stages, &layout());
        assert_eq!(g[0].top_width, 300.0);
        assert_eq!(g[0].bottom_width, g[1].top_width);
        assert_eq!(g[1].top_width, 180.0);
        // last stage tapers to 0.8 of its own ratio
        assert!((g[1].bottom_width - (60.0 + 240.0 * 0.4)).abs() < 1e-9);
    }

    #[test]
    fn overrides_win_over_derived_rates() {
        let mut b = FunnelStage::new("b", 50.0);
        b.percentage = Some(12.0);
        let g = layout_funnel(&[FunnelStage::new("a", 100.0), b], &layout());
        assert_eq!(g[1].percentage, 12.0);
        assert_eq!(g[1].conversion, 50.0);
    }

    #[test]
    fn zero_first_stage_does_not_divide_by_zero() {
        let values = [0.0, 10.0, 5.0];
        assert_eq!(funnel_percentages(&values), vec![0.0, 0.0, 0.0]);
        assert_eq!(funnel_conversions(&values), vec![100.0, 0.0, 50.0]);
    }

    #[test]
    fn single_stage_is_valid() {
        let g = layout_funnel(&[FunnelStage::new("only", 7.0)], &layout());
        assert_eq!(g.len(), 1);
        assert_eq!(g[0].percentage, 100.0);
        assert_eq!(g[0].conversion, 100.0);
        assert_eq!(g[0].polygon.len(), 4);
    }
}
