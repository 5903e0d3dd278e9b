//! Dual bars per category (actual vs. budget, this year vs. last year) on one shared scale.

use super::{PlotArea, Rect, Tone};
use crate::models::magnitude;
use serde::Serialize;

/// Achievement rate at or above which a budget bar reads as on target.
pub const ACHIEVED_RATE: f64 = 100.0;
/// Achievement rate below which a budget bar reads as off target.
pub const WARNING_RATE: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    /// Primary = actual, reference = budget; ratio = achievement rate.
    Budget,
    /// Primary = current period, reference = previous year; ratio = signed growth.
    YearOverYear,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonGroup {
    pub index: usize,
    pub label: String,
    pub primary: f64,
    pub reference: f64,
    /// Achievement rate or YoY growth in percent; `None` when the reference is `0`.
    pub ratio: Option<f64>,
    pub primary_bar: Rect,
    pub reference_bar: Rect,
    pub primary_tone: Tone,
    pub slot: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonGeometry {
    pub kind: ComparisonKind,
    /// Shared across both series.
    pub max_value: f64,
    pub baseline_y: f64,
    pub groups: Vec<ComparisonGroup>,
}

/// `actual / budget * 100`.
pub fn achievement_rate(actual: f64, budget: f64) -> Option<f64> {
    if budget == 0.0 || !budget.is_finite() || !actual.is_finite() {
        None
    } else {
        Some(actual / budget * 100.0)
    }
}

/// `(current - previous) / |previous| * 100`, sign preserved.
pub fn yoy_growth(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        None
    } else {
        Some((current - previous) / previous.abs() * 100.0)
    }
}

pub fn achievement_tone(rate: Option<f64>) -> Tone {
    match rate {
        Some(r) if r >= ACHIEVED_RATE => Tone::Positive,
        Some(r) if r >= WARNING_RATE => Tone::Warning,
        Some(_) => Tone::Negative,
        None => Tone::Neutral,
    }
}

pub fn growth_tone(growth: Option<f64>) -> Tone {
    match growth {
        Some(g) if g >= 0.0 => Tone::Positive,
        Some(_) => Tone::Negative,
        None => Tone::Neutral,
    }
}

/// Lay out `labels.len()` groups, each with the primary bar left of the reference bar.
pub fn layout_comparison(
    kind: ComparisonKind,
    labels: &[String],
    primary: &[f64],
    reference: &[f64],
    area: &PlotArea,
    bar_width_ratio: f64,
) -> ComparisonGeometry {
    let n = labels.len().min(primary.len()).min(reference.len());
    let max_value = primary[..n]
        .iter()
        .chain(reference[..n].iter())
        .map(|v| magnitude(*v))
        .fold(0.0, f64::max);
    let baseline_y = area.bottom();
    let slot = area.slot_width(n);
    let bar_w = slot * bar_width_ratio / 2.0;
    let height_of = |v: f64| {
        if max_value > 0.0 {
            magnitude(v) / max_value * area.height
        } else {
            0.0
        }
    };

    let groups = (0..n)
        .map(|i| {
            let (p, r) = (primary[i], reference[i]);
            let ratio = match kind {
                ComparisonKind::Budget => achievement_rate(p, r),
                ComparisonKind::YearOverYear => yoy_growth(p, r),
            };
            let primary_tone = match kind {
                ComparisonKind::Budget => achievement_tone(ratio),
                ComparisonKind::YearOverYear => growth_tone(ratio),
            };
            let slot_x = area.left + i as f64 * slot;
            let x0 = slot_x + (slot - 2.0 * bar_w) / 2.0;
            let hp = height_of(p);
            let hr = height_of(r);
            ComparisonGroup {
                index: i,
                label: labels[i].clone(),
                primary: p,
                reference: r,
                ratio,
                primary_bar: Rect::new(x0, baseline_y - hp, bar_w, hp),
                reference_bar: Rect::new(x0 + bar_w, baseline_y - hr, bar_w, hr),
                primary_tone,
                slot: Rect::new(slot_x, area.top, slot, area.height),
            }
        })
        .collect();

    ComparisonGeometry {
        kind,
        max_value,
        baseline_y,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("L{i}")).collect()
    }

    #[test]
    fn budget_tones_follow_achievement_rate() {
        assert_eq!(achievement_tone(achievement_rate(120.0, 100.0)), Tone::Positive);
        assert_eq!(achievement_tone(achievement_rate(85.0, 100.0)), Tone::Warning);
        assert_eq!(achievement_tone(achievement_rate(50.0, 100.0)), Tone::Negative);
        assert_eq!(achievement_tone(achievement_rate(50.0, 0.0)), Tone::Neutral);
    }

    #[test]
    fn yoy_growth_keeps_sign() {
        assert_eq!(yoy_growth(80.0, 100.0), Some(-20.0));
        assert_eq!(yoy_growth(-50.0, -100.0), Some(50.0));
        assert_eq!(yoy_growth(5.0, 0.0), None);
    }

    #[test]
    fn both_series_share_one_scale() {
        let area = PlotArea::new(0.0, 0.0, 200.0, 100.0);
        let g = layout_comparison(
            ComparisonKind::Budget,
            &labels(2),
            &[50.0, 200.0],
            &[100.0, 100.0],
            &area,
            0.8,
        );
        assert_eq!(g.max_value, 200.0);
        assert_eq!(g.groups[1].primary_bar.height, 100.0);
        assert_eq!(g.groups[0].reference_bar.height, 50.0);
        assert_eq!(g.groups[0].primary_bar.bottom(), g.baseline_y);
        assert_eq!(g.groups[0].primary_tone, Tone::Negative);
    }

    #[test]
    fn negative_values_draw_as_zero_height() {
        let area = PlotArea::new(0.0, 0.0, 100.0, 100.0);
        let g = layout_comparison(
            ComparisonKind::YearOverYear,
            &labels(1),
            &[-10.0],
            &[10.0],
            &area,
            0.8,
        );
        assert_eq!(g.groups[0].primary_bar.height, 0.0);
        assert_eq!(g.groups[0].ratio, Some(-200.0));
        assert_eq!(g.groups[0].primary_tone, Tone::Negative);
    }
}
