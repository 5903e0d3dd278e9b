//! Tap handling on a laid-out [`ChartView`].
//!
//! Hit regions come straight from the computed geometry, so a tap resolves against
//! exactly what was drawn.

use crate::dispatch::ChartView;
use crate::geometry::cartesian::LineGeometry;
use crate::geometry::pie::PieSlice;
use crate::geometry::{Point, polygon_contains};
use serde::Serialize;

/// Distance in px within which a tap selects a line or radar vertex.
pub const POINT_HIT_RADIUS: f64 = 8.0;

/// The element under a tap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementHit {
    pub index: usize,
    pub label: String,
    pub value: f64,
    /// Owning series for multi-series views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

impl ElementHit {
    fn new(index: usize, label: impl Into<String>, value: f64) -> Self {
        Self {
            index,
            label: label.into(),
            value,
            series: None,
        }
    }

    fn in_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }
}

/// Receiver for element taps.
pub trait ChartEventSink {
    fn on_element_tap(&mut self, hit: &ElementHit);
}

impl<F> ChartEventSink for F
where
    F: FnMut(&ElementHit),
{
    fn on_element_tap(&mut self, hit: &ElementHit) {
        self(hit)
    }
}

/// Resolve `point` to the element drawn there, if any.
pub fn hit_test(view: &ChartView, point: Point) -> Option<ElementHit> {
    match view {
        ChartView::Bar { bars } | ChartView::HorizontalBar { bars } => bars
            .iter()
            .find(|b| b.rect.contains(point))
            .map(|b| ElementHit::new(b.index, &b.label, b.value)),
        ChartView::StackedBar { columns } => columns.iter().find_map(|c| {
            c.segments
                .iter()
                .find(|s| s.rect.contains(point))
                .map(|s| ElementHit::new(c.index, &c.label, s.value).in_series(&s.label))
        }),
        ChartView::Line(g) | ChartView::Area(g) | ChartView::Trend(g) | ChartView::Scatter(g) => {
            nearest_line_point(g, point)
        }
        ChartView::Pie { slices } | ChartView::Donut { slices } => slice_at(slices, point),
        ChartView::Radar(g) => g
            .datasets
            .iter()
            .flat_map(|d| {
                d.points.iter().enumerate().map(move |(k, p)| (d, k, p.distance(point)))
            })
            .filter(|(_, _, dist)| *dist <= POINT_HIT_RADIUS)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(d, k, _)| {
                let label = g.axes.get(k).map(|a| a.label.as_str()).unwrap_or_default();
                ElementHit::new(k, label, d.values[k]).in_series(&d.name)
            }),
        ChartView::Gauge(g) => {
            let dist = g.track.center.distance(point);
            let half = g.stroke_width / 2.0;
            (dist <= g.track.radius + half).then(|| ElementHit::new(0, "", g.value))
        }
        ChartView::Funnel { stages } => stages
            .iter()
            .find(|s| polygon_contains(&s.polygon, point))
            .map(|s| ElementHit::new(s.index, &s.label, s.value)),
        ChartView::Waterfall(g) => g
            .bars
            .iter()
            .find(|b| b.rect.contains(point))
            .map(|b| ElementHit::new(b.index, &b.label, b.value)),
        ChartView::BudgetComparison(g) | ChartView::YoyComparison(g) => g
            .groups
            .iter()
            .find(|grp| grp.slot.contains(point))
            .map(|grp| {
                if grp.reference_bar.contains(point) {
                    ElementHit::new(grp.index, &grp.label, grp.reference).in_series("reference")
                } else {
                    ElementHit::new(grp.index, &grp.label, grp.primary)
                }
            }),
        ChartView::Progress(p) => p
            .track
            .contains(point)
            .then(|| ElementHit::new(0, "", p.value)),
        ChartView::KpiCard(_)
        | ChartView::Table(_)
        | ChartView::Empty { .. }
        | ChartView::Unsupported { .. } => None,
    }
}

/// Hit-test and forward a hit to `sink`.
pub fn tap<S: ChartEventSink + ?Sized>(
    view: &ChartView,
    point: Point,
    sink: &mut S,
) -> Option<ElementHit> {
    let hit = hit_test(view, point);
    match &hit {
        Some(h) => sink.on_element_tap(h),
        None => log::trace!("tap at ({:.1}, {:.1}) hit nothing", point.x, point.y),
    }
    hit
}

fn nearest_line_point(g: &LineGeometry, point: Point) -> Option<ElementHit> {
    g.lines
        .iter()
        .flat_map(|line| {
            line.points
                .iter()
                .enumerate()
                .map(move |(i, p)| (line, i, p.distance(point)))
        })
        .filter(|(_, _, dist)| *dist <= POINT_HIT_RADIUS)
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(line, i, _)| {
            let label = g.labels.get(i).cloned().unwrap_or_default();
            ElementHit::new(i, label, line.values[i]).in_series(&line.name)
        })
}

fn slice_at(slices: &[PieSlice], point: Point) -> Option<ElementHit> {
    let first = slices.first()?;
    let center = first.outer.center;
    let dist = center.distance(point);
    if dist > first.outer.radius || dist < first.inner_radius {
        return None;
    }
    // 0° at 12 o'clock, clockwise.
    let angle = ((point.y - center.y).atan2(point.x - center.x).to_degrees() + 90.0)
        .rem_euclid(360.0);
    slices
        .iter()
        .find(|s| s.fraction > 0.0 && angle >= s.start_angle && angle < s.end_angle)
        .map(|s| ElementHit::new(s.index, &s.label, s.value))
}
