//! Radar: N axes around a center, one closed polygon per dataset, concentric grid rings.

use super::{Point, Segment, Tone, clamp, point_on_circle, ratio};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarLayout {
    pub center: Point,
    pub radius: f64,
    pub levels: usize,
    /// Label distance as a multiple of `radius`.
    pub label_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarDataset {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub label: String,
    pub angle: f64,
    pub spoke: Segment,
    pub label_anchor: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPolygon {
    pub name: String,
    /// Values after clamping to `[0, max_value]`.
    pub values: Vec<f64>,
    pub points: Vec<Point>,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarGeometry {
    pub max_value: f64,
    pub axes: Vec<RadarAxis>,
    /// Ring `i` (1-based) evaluated at `max_value * i / levels`.
    pub rings: Vec<Vec<Point>>,
    pub datasets: Vec<RadarPolygon>,
}

/// Angle of axis `k` out of `n`: `k·360/n - 90` (axis 0 points up).
pub fn axis_angle(k: usize, n: usize) -> f64 {
    if n == 0 {
        return -90.0;
    }
    k as f64 * 360.0 / n as f64 - 90.0
}

/// Position of `value` on axis `k` of `n`.
pub fn radar_point(layout: &RadarLayout, k: usize, n: usize, value: f64, max_value: f64) -> Point {
    let r = layout.radius * ratio(value.min(max_value), max_value);
    point_on_circle(layout.center, r, axis_angle(k, n))
}

/// Scale maximum: the explicit one when positive, else the data maximum, else `1`.
pub fn radar_max(datasets: &[RadarDataset], explicit: Option<f64>) -> f64 {
    if let Some(m) = explicit.filter(|m| *m > 0.0 && m.is_finite()) {
        return m;
    }
    let data_max = datasets
        .iter()
        .flat_map(|d| d.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);
    if data_max > 0.0 { data_max } else { 1.0 }
}

pub fn layout_radar(
    labels: &[String],
    datasets: &[RadarDataset],
    max_value: Option<f64>,
    layout: &RadarLayout,
) -> RadarGeometry {
    let n = labels.len();
    let max_value = radar_max(datasets, max_value);
    if n == 0 {
        return RadarGeometry {
            max_value,
            axes: Vec::new(),
            rings: Vec::new(),
            datasets: Vec::new(),
        };
    }

    let axes = labels
        .iter()
        .enumerate()
        .map(|(k, label)| {
            let angle = axis_angle(k, n);
            RadarAxis {
                label: label.clone(),
                angle,
                spoke: Segment::new(
                    layout.center,
                    point_on_circle(layout.center, layout.radius, angle),
                ),
                label_anchor: point_on_circle(
                    layout.center,
                    layout.radius * layout.label_offset,
                    angle,
                ),
            }
        })
        .collect();

    let levels = layout.levels.max(1);
    let rings = (1..=levels)
        .map(|i| {
            let level_value = max_value * i as f64 / levels as f64;
            (0..n)
                .map(|k| radar_point(layout, k, n, level_value, max_value))
                .collect()
        })
        .collect();

    let datasets = datasets
        .iter()
        .enumerate()
        .map(|(idx, d)| {
            let values: Vec<f64> = (0..n)
                .map(|k| clamp(d.values.get(k).copied().unwrap_or(0.0), 0.0, max_value))
                .collect();
            let points = values
                .iter()
                .enumerate()
                .map(|(k, v)| radar_point(layout, k, n, *v, max_value))
                .collect();
            RadarPolygon {
                name: d.name.clone(),
                values,
                points,
                tone: Tone::Series(idx),
            }
        })
        .collect();

    RadarGeometry {
        max_value,
        axes,
        rings,
        datasets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> RadarLayout {
        RadarLayout {
            center: Point::new(0.0, 0.0),
            radius: 100.0,
            levels: 4,
            label_offset: 1.1,
        }
    }

    #[test]
    fn first_axis_points_up() {
        assert_eq!(axis_angle(0, 5), -90.0);
        let p = radar_point(&layout(), 0, 4, 50.0, 100.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y + 50.0).abs() < 1e-9);
    }

    #[test]
    fn values_clamp_to_max_and_zero() {
        let labels: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let d = RadarDataset {
            name: "d".into(),
            values: vec![150.0, -3.0, 50.0],
        };
        let g = layout_radar(&labels, &[d], Some(100.0), &layout());
        assert_eq!(g.datasets[0].values, vec![100.0, 0.0, 50.0]);
        assert!((g.datasets[0].points[0].distance(Point::new(0.0, 0.0)) - 100.0).abs() < 1e-9);
        assert_eq!(g.rings.len(), 4);
        assert_eq!(g.rings[0].len(), 3);
    }

    #[test]
    fn single_axis_is_degenerate_but_valid() {
        let g = layout_radar(
            &["only".to_string()],
            &[RadarDataset { name: "d".into(), values: vec![1.0] }],
            None,
            &layout(),
        );
        assert_eq!(g.axes.len(), 1);
        assert_eq!(g.max_value, 1.0);
    }
}
