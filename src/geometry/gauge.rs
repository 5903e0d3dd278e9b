//! Gauge: a value arc over a fixed 270° track with red/yellow/green threshold zones.

use super::{Arc, Point, Segment, Tone, clamp, polar_to_cartesian, ratio};
use crate::models::Thresholds;
use serde::Serialize;

pub const GAUGE_START_ANGLE: f64 = -225.0;
pub const GAUGE_END_ANGLE: f64 = 45.0;
pub const GAUGE_SWEEP: f64 = GAUGE_END_ANGLE - GAUGE_START_ANGLE;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeLayout {
    pub center: Point,
    pub radius: f64,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeZone {
    pub tone: Tone,
    pub from_value: f64,
    pub to_value: f64,
    pub arc: Arc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeGeometry {
    pub value: f64,
    pub max_value: f64,
    /// `clamp(value, 0, max) / max * 100`.
    pub percentage: f64,
    pub status: Tone,
    pub track: Arc,
    pub zones: Vec<GaugeZone>,
    pub value_arc: Arc,
    pub needle: Segment,
    pub stroke_width: f64,
}

/// Percentage of `max_value` covered by `value`, clamped to `[0, 100]`.
pub fn gauge_percentage(value: f64, max_value: f64) -> f64 {
    ratio(value, max_value) * 100.0
}

/// Angle on the gauge track for a percentage; never leaves the track.
pub fn percentage_to_angle(percentage: f64) -> f64 {
    let a = GAUGE_START_ANGLE + clamp(percentage, 0.0, 100.0) / 100.0 * GAUGE_SWEEP;
    a.min(GAUGE_END_ANGLE)
}

/// Status tone for a value against ascending thresholds.
///
/// Misordered thresholds are not corrected; the comparison runs as written.
pub fn gauge_status(value: f64, thresholds: &Thresholds) -> Tone {
    if value >= thresholds.yellow {
        Tone::Positive
    } else if value >= thresholds.red {
        Tone::Warning
    } else {
        Tone::Negative
    }
}

fn zone_angle(threshold: f64, max_value: f64) -> f64 {
    percentage_to_angle(gauge_percentage(threshold, max_value))
}

/// Lay out the threshold zones: red `[0, red]`, yellow `[red, yellow]`, green `[yellow, green]`.
pub fn threshold_zones(
    thresholds: &Thresholds,
    max_value: f64,
    layout: &GaugeLayout,
) -> Vec<GaugeZone> {
    let bounds = [
        (Tone::Negative, 0.0, thresholds.red),
        (Tone::Warning, thresholds.red, thresholds.yellow),
        (Tone::Positive, thresholds.yellow, thresholds.green),
    ];
    bounds
        .into_iter()
        .map(|(tone, from_value, to_value)| GaugeZone {
            tone,
            from_value,
            to_value,
            arc: Arc::new(
                layout.center,
                layout.radius,
                zone_angle(from_value, max_value),
                zone_angle(to_value, max_value),
            ),
        })
        .collect()
}

pub fn layout_gauge(
    value: f64,
    max_value: f64,
    thresholds: &Thresholds,
    layout: &GaugeLayout,
) -> GaugeGeometry {
    let percentage = gauge_percentage(value, max_value);
    if value > max_value || value < 0.0 {
        log::debug!("gauge value {} clamped to [0, {}]", value, max_value);
    }
    let end_angle = percentage_to_angle(percentage);
    let needle_tip = polar_to_cartesian(
        layout.center,
        (layout.radius - layout.stroke_width).max(0.0),
        end_angle,
    );

    GaugeGeometry {
        value,
        max_value,
        percentage,
        status: gauge_status(value, thresholds),
        track: Arc::new(
            layout.center,
            layout.radius,
            GAUGE_START_ANGLE,
            GAUGE_END_ANGLE,
        ),
        zones: threshold_zones(thresholds, max_value, layout),
        value_arc: Arc::new(layout.center, layout.radius, GAUGE_START_ANGLE, end_angle),
        needle: Segment::new(layout.center, needle_tip),
        stroke_width: layout.stroke_width,
    }
}
