//! Pure geometry for the chart families: data + layout parameters in, drawable primitives out.
//!
//! - Gauge arcs over a fixed 270° sweep
//! - Funnel trapezoids with continuous tapering between stages
//! - Radar polar layouts with grid rings
//! - Waterfall bars anchored on a running total
//! - Budget / year-over-year dual bars on a shared scale
//! - Plain bars, lines, scatter, pie and donut sectors, KPI cards, progress bars
//!
//! Angles are in degrees. Screen coordinates grow right (x) and down (y).

pub mod cartesian;
pub mod comparison;
pub mod funnel;
pub mod gauge;
pub mod kpi;
pub mod pie;
pub mod radar;
pub mod waterfall;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned rectangle; `width`/`height` are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Rectangle spanning two y coordinates in either order.
    pub fn from_span(x: f64, width: f64, y_a: f64, y_b: f64) -> Self {
        Self::new(x, y_a.min(y_b), width, (y_a - y_b).abs())
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

/// Circular arc swept clockwise (on screen) from `start_angle` to `end_angle`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub start: Point,
    pub end: Point,
    /// SVG large-arc flag: set iff the angular span exceeds 180°.
    pub large_arc: bool,
}

impl Arc {
    /// Build an arc in the gauge/pie convention (0° points up, angles grow clockwise).
    pub fn new(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
            start: polar_to_cartesian(center, radius, start_angle),
            end: polar_to_cartesian(center, radius, end_angle),
            large_arc: end_angle - start_angle > 180.0,
        }
    }

    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// SVG path data (`M .. A ..`) for this arc.
    pub fn path_data(&self) -> String {
        format!(
            "M {:.3} {:.3} A {:.3} {:.3} 0 {} 1 {:.3} {:.3}",
            self.start.x,
            self.start.y,
            self.radius,
            self.radius,
            u8::from(self.large_arc),
            self.end.x,
            self.end.y
        )
    }

    /// Approximate the arc with `segments + 1` points (at least 2).
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| {
                let t = i as f64 / segments as f64;
                polar_to_cartesian(
                    self.center,
                    self.radius,
                    self.start_angle + self.span() * t,
                )
            })
            .collect()
    }
}

/// Semantic fill for a primitive; the renderer maps it to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "tone", content = "index", rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Warning,
    Negative,
    Neutral,
    /// The comparison bar (budget, previous year).
    Reference,
    /// Palette colour `i`.
    Series(usize),
}

/// Drawable region inside the padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Width of one of `n` equal category slots.
    pub fn slot_width(&self, n: usize) -> f64 {
        if n == 0 { 0.0 } else { self.width / n as f64 }
    }

    pub fn slot_height(&self, n: usize) -> f64 {
        if n == 0 { 0.0 } else { self.height / n as f64 }
    }
}

/// Linear map from a value domain onto a vertical pixel span (larger values go up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
    pub top_px: f64,
    pub bottom_px: f64,
}

impl ValueScale {
    /// A zero-width domain is widened by one unit so the map stays finite.
    pub fn new(min: f64, max: f64, top_px: f64, bottom_px: f64) -> Self {
        let (min, max) = if (max - min).abs() < 1e-12 {
            (min, min + 1.0)
        } else {
            (min, max)
        };
        Self {
            min,
            max,
            top_px,
            bottom_px,
        }
    }

    #[inline]
    pub fn to_px(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        self.bottom_px - (v - self.min) / span * (self.bottom_px - self.top_px)
    }
}

/// Gauge/pie convention: `x = cx + r·cos(θ-90°)`, `y = cy + r·sin(θ-90°)`.
#[inline]
pub fn polar_to_cartesian(center: Point, radius: f64, angle_deg: f64) -> Point {
    point_on_circle(center, radius, angle_deg - 90.0)
}

/// Plain polar conversion, 0° pointing right.
#[inline]
pub fn point_on_circle(center: Point, radius: f64, angle_deg: f64) -> Point {
    let rad = angle_deg.to_radians();
    Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}

/// Clamp that maps NaN to `lo`.
#[inline]
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() || v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// Ratio `v / max` clamped to `[0, 1]`; `0` when `max` is not positive.
#[inline]
pub fn ratio(v: f64, max: f64) -> f64 {
    if max > 0.0 && max.is_finite() {
        clamp(v / max, 0.0, 1.0)
    } else {
        0.0
    }
}

/// Ray-casting point-in-polygon test.
pub fn polygon_contains(points: &[Point], p: Point) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
