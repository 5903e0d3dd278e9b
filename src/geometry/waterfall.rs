//! Waterfall: bars anchored on a running total threaded through the point sequence.
//!
//! The running total is computed once as an explicit fold into [`WaterfallStep`]s;
//! all vertical positioning reads from those steps.

use super::{PlotArea, Point, Rect, Segment, Tone, ValueScale};
use crate::models::WaterfallKind;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallPoint {
    pub label: String,
    pub value: f64,
    pub kind: WaterfallKind,
}

impl WaterfallPoint {
    pub fn new(label: impl Into<String>, value: f64, kind: WaterfallKind) -> Self {
        Self {
            label: label.into(),
            value,
            kind,
        }
    }

    /// Kind inferred from the sign when the backend did not send one.
    pub fn inferred(label: impl Into<String>, value: f64, kind: Option<WaterfallKind>) -> Self {
        let kind = kind.unwrap_or(if value < 0.0 {
            WaterfallKind::Decrease
        } else {
            WaterfallKind::Increase
        });
        Self::new(label, value, kind)
    }
}

/// A point together with the running total before and after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallStep {
    pub label: String,
    pub value: f64,
    pub kind: WaterfallKind,
    pub before: f64,
    pub after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallBar {
    pub index: usize,
    pub label: String,
    pub value: f64,
    pub kind: WaterfallKind,
    /// Value the bar is drawn from (`0` for totals, the prior total otherwise).
    pub start_value: f64,
    pub end_value: f64,
    pub rect: Rect,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallGeometry {
    pub steps: Vec<WaterfallStep>,
    pub bars: Vec<WaterfallBar>,
    pub connectors: Vec<Segment>,
    pub domain_min: f64,
    pub domain_max: f64,
    pub baseline_y: f64,
}

/// Fold the points into steps: `total` resets the running total, the others add to it.
pub fn running_totals(points: &[WaterfallPoint]) -> Vec<WaterfallStep> {
    points
        .iter()
        .scan(0.0_f64, |total, p| {
            let before = *total;
            let after = match p.kind {
                WaterfallKind::Total => p.value,
                WaterfallKind::Increase | WaterfallKind::Decrease => before + p.value,
            };
            *total = after;
            Some(WaterfallStep {
                label: p.label.clone(),
                value: p.value,
                kind: p.kind,
                before,
                after,
            })
        })
        .collect()
}

/// Vertical domain: `min(0, totals)` to `max(0, totals, |deltas|)`.
///
/// Only increase/decrease steps contribute their magnitude; a total is drawn
/// from the baseline to its own value.
pub fn waterfall_domain(steps: &[WaterfallStep]) -> (f64, f64) {
    let min = steps.iter().map(|s| s.after).fold(0.0, f64::min);
    let max = steps
        .iter()
        .map(|s| match s.kind {
            WaterfallKind::Total => s.after,
            WaterfallKind::Increase | WaterfallKind::Decrease => s.after.max(s.value.abs()),
        })
        .fold(0.0, f64::max);
    (min, max)
}

pub fn layout_waterfall(
    points: &[WaterfallPoint],
    area: &PlotArea,
    bar_width_ratio: f64,
) -> WaterfallGeometry {
    let steps = running_totals(points);
    let (domain_min, domain_max) = waterfall_domain(&steps);
    let scale = ValueScale::new(domain_min, domain_max, area.top, area.bottom());
    let slot = area.slot_width(steps.len());
    let bar_w = slot * bar_width_ratio;

    let bars: Vec<WaterfallBar> = steps
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let (start_value, end_value, tone) = match s.kind {
                WaterfallKind::Total => (0.0, s.after, Tone::Neutral),
                WaterfallKind::Increase => (s.before, s.after, Tone::Positive),
                WaterfallKind::Decrease => (s.before, s.after, Tone::Negative),
            };
            let x = area.left + i as f64 * slot + (slot - bar_w) / 2.0;
            WaterfallBar {
                index: i,
                label: s.label.clone(),
                value: s.value,
                kind: s.kind,
                start_value,
                end_value,
                rect: Rect::from_span(x, bar_w, scale.to_px(start_value), scale.to_px(end_value)),
                tone,
            }
        })
        .collect();

    let connectors = bars
        .windows(2)
        .filter(|pair| pair[1].kind != WaterfallKind::Total)
        .map(|pair| {
            let y = scale.to_px(pair[0].end_value);
            Segment::new(
                Point::new(pair[0].rect.right(), y),
                Point::new(pair[1].rect.x, y),
            )
        })
        .collect();

    WaterfallGeometry {
        steps,
        bars,
        connectors,
        domain_min,
        domain_max,
        baseline_y: scale.to_px(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WaterfallKind::*;

    fn sample() -> Vec<WaterfallPoint> {
        vec![
            WaterfallPoint::new("Start", 1000.0, Total),
            WaterfallPoint::new("Sales", 500.0, Increase),
            WaterfallPoint::new("Costs", -300.0, Decrease),
            WaterfallPoint::new("End", 1200.0, Total),
        ]
    }

    fn area() -> PlotArea {
        PlotArea::new(0.0, 0.0, 400.0, 300.0)
    }

    #[test]
    fn totals_reset_and_deltas_accumulate() {
        let totals: Vec<f64> = running_totals(&sample()).iter().map(|s| s.after).collect();
        assert_eq!(totals, vec![1000.0, 1500.0, 1200.0, 1200.0]);
    }

    #[test]
    fn domain_considers_deltas_and_negative_totals() {
        let pts = vec![
            WaterfallPoint::new("a", -200.0, Decrease),
            WaterfallPoint::new("b", 50.0, Increase),
        ];
        let steps = running_totals(&pts);
        assert_eq!(waterfall_domain(&steps), (-200.0, 200.0));
    }

    #[test]
    fn negative_total_does_not_mirror_above_baseline() {
        let steps = running_totals(&[WaterfallPoint::new("Loss", -500.0, Total)]);
        assert_eq!(waterfall_domain(&steps), (-500.0, 0.0));

        let steps = running_totals(&[
            WaterfallPoint::new("Open", -500.0, Total),
            WaterfallPoint::new("Refund", 120.0, Increase),
        ]);
        assert_eq!(waterfall_domain(&steps), (-500.0, 120.0));
    }

    #[test]
    fn total_bars_start_at_baseline() {
        let g = layout_waterfall(&sample(), &area(), 0.6);
        assert_eq!(g.bars[0].start_value, 0.0);
        assert!((g.bars[0].rect.bottom() - g.baseline_y).abs() < 1e-9);
        assert_eq!(g.bars[1].start_value, 1000.0);
        assert_eq!(g.bars[2].start_value, 1500.0);
        assert_eq!(g.bars[2].end_value, 1200.0);
    }

    #[test]
    fn connectors_skip_total_bars() {
        let g = layout_waterfall(&sample(), &area(), 0.6);
        // 0->1 and 1->2 connect; 2->3 leads into a total
        assert_eq!(g.connectors.len(), 2);
        let c = g.connectors[1];
        assert!((c.from.y - g.bars[2].rect.y).abs() < 1e-9);
    }

    #[test]
    fn empty_and_single_inputs_are_valid() {
        let g = layout_waterfall(&[], &area(), 0.6);
        assert!(g.bars.is_empty());
        let g = layout_waterfall(&[WaterfallPoint::new("x", 5.0, Increase)], &area(), 0.6);
        assert_eq!(g.bars.len(), 1);
        assert!(g.connectors.is_empty());
    }
}
