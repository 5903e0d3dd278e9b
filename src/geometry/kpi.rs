//! KPI card (headline value, change vs. previous, sparkline) and progress bar.

use super::comparison::{growth_tone, yoy_growth};
use super::{PlotArea, Point, Rect, Tone, ValueScale, clamp};
use crate::models::NormalizedSeries;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub label: String,
    pub value: f64,
    pub previous: Option<f64>,
    /// Signed change vs. `previous`, in percent.
    pub change: Option<f64>,
    pub tone: Tone,
    pub unit: Option<String>,
    pub sparkline: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressGeometry {
    pub value: f64,
    pub target: f64,
    /// Clamped to `[0, 100]`.
    pub percentage: f64,
    pub track: Rect,
    pub fill: Rect,
    pub tone: Tone,
}

/// Headline = `value` or the last point; previous = `previous` or the point before it.
pub fn layout_kpi_card(
    title: &str,
    series: &NormalizedSeries,
    value: Option<f64>,
    previous: Option<f64>,
    unit: Option<&str>,
    sparkline_area: &PlotArea,
) -> KpiCard {
    let values = series.values();
    let headline = value.or_else(|| values.last().copied()).unwrap_or(0.0);
    let previous = previous.or_else(|| {
        if value.is_none() && values.len() >= 2 {
            Some(values[values.len() - 2])
        } else {
            None
        }
    });
    let change = previous.and_then(|p| yoy_growth(headline, p));
    let label = if title.is_empty() {
        series.labels().last().cloned().unwrap_or_default()
    } else {
        title.to_string()
    };

    KpiCard {
        label,
        value: headline,
        previous,
        change,
        tone: growth_tone(change),
        unit: unit.map(str::to_string),
        sparkline: sparkline(values, sparkline_area),
    }
}

/// Min/max-scaled polyline across the full area width.
pub fn sparkline(values: &[f64], area: &PlotArea) -> Vec<Point> {
    if values.is_empty() {
        return Vec::new();
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scale = ValueScale::new(lo, hi, area.top, area.bottom());
    let step = if values.len() > 1 {
        area.width / (values.len() - 1) as f64
    } else {
        0.0
    };
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = if values.len() > 1 {
                area.left + step * i as f64
            } else {
                area.left + area.width / 2.0
            };
            Point::new(x, scale.to_px(*v))
        })
        .collect()
}

pub fn layout_progress(value: f64, target: f64, area: &PlotArea, bar_height: f64) -> ProgressGeometry {
    let percentage = if target > 0.0 {
        clamp(value / target * 100.0, 0.0, 100.0)
    } else {
        0.0
    };
    let h = bar_height.min(area.height).max(0.0);
    let y = area.top + (area.height - h) / 2.0;
    let track = Rect::new(area.left, y, area.width, h);
    let tone = if percentage >= 100.0 {
        Tone::Positive
    } else if percentage >= 80.0 {
        Tone::Warning
    } else {
        Tone::Negative
    };
    ProgressGeometry {
        value,
        target,
        percentage,
        fill: Rect::new(area.left, y, area.width * percentage / 100.0, h),
        track,
        tone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> PlotArea {
        PlotArea::new(0.0, 0.0, 100.0, 20.0)
    }

    #[test]
    fn kpi_uses_last_two_points() {
        let s = NormalizedSeries::from_pairs(
            vec!["Jan".into(), "Feb".into()],
            vec![100.0, 110.0],
        );
        let k = layout_kpi_card("", &s, None, None, Some("€"), &area());
        assert_eq!(k.value, 110.0);
        assert_eq!(k.previous, Some(100.0));
        assert!((k.change.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(k.tone, Tone::Positive);
        assert_eq!(k.label, "Feb");
        assert_eq!(k.sparkline.len(), 2);
    }

    #[test]
    fn explicit_value_without_previous_has_no_change() {
        let k = layout_kpi_card("Revenue", &NormalizedSeries::default(), Some(5.0), None, None, &area());
        assert_eq!(k.value, 5.0);
        assert_eq!(k.change, None);
        assert_eq!(k.tone, Tone::Neutral);
        assert!(k.sparkline.is_empty());
    }

    #[test]
    fn progress_clamps_overshoot() {
        let p = layout_progress(150.0, 100.0, &area(), 10.0);
        assert_eq!(p.percentage, 100.0);
        assert_eq!(p.fill.width, 100.0);
        let p = layout_progress(5.0, 0.0, &area(), 10.0);
        assert_eq!(p.percentage, 0.0);
    }
}
