//! Chart dispatch: map a descriptor's type tag to an extraction strategy and a geometry
//! module, producing one [`ChartView`].
//!
//! Routing is a pure function of the type tag ([`ChartRoute::for_type`]). Types the
//! backend knows but this crate does not lay out end in [`ChartView::Unsupported`];
//! descriptors without data end in [`ChartView::Empty`]. Neither is an error.

use crate::config::LayoutParams;
use crate::geometry::cartesian::{
    BarGeometry, LineGeometry, StackedColumn, layout_bars, layout_horizontal_bars, layout_lines,
    layout_stacked_bars,
};
use crate::geometry::comparison::{ComparisonGeometry, ComparisonKind, layout_comparison};
use crate::geometry::funnel::{FunnelLayout, FunnelStage, FunnelStageGeometry, layout_funnel};
use crate::geometry::gauge::{GaugeGeometry, GaugeLayout, layout_gauge};
use crate::geometry::kpi::{KpiCard, ProgressGeometry, layout_kpi_card, layout_progress};
use crate::geometry::pie::{PieLayout, PieSlice, layout_pie};
use crate::geometry::radar::{RadarDataset, RadarGeometry, RadarLayout, layout_radar};
use crate::geometry::waterfall::{WaterfallGeometry, WaterfallPoint, layout_waterfall};
use crate::geometry::PlotArea;
use crate::models::{
    ChartDescriptor, ChartType, DataItem, MultiSeries, NamedValues, Row, Thresholds, WaterfallKind,
    label_of,
};
use crate::normalize::{normalize, normalize_all};
use serde::Serialize;
use serde_json::Value;

/// Default gauge / progress scale when the descriptor gives none.
pub const DEFAULT_MAX_VALUE: f64 = 100.0;

/// One routing target per implemented chart family, plus `Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartRoute {
    Line,
    Area,
    Bar,
    HorizontalBar,
    StackedBar,
    Scatter,
    Pie,
    Donut,
    Radar,
    Gauge,
    Funnel,
    Waterfall,
    BudgetComparison,
    YoyComparison,
    KpiCard,
    Trend,
    Progress,
    Table,
    Unsupported,
}

impl ChartRoute {
    pub fn for_type(chart_type: &ChartType) -> Self {
        match chart_type {
            ChartType::Line => ChartRoute::Line,
            ChartType::Area => ChartRoute::Area,
            ChartType::Bar => ChartRoute::Bar,
            ChartType::HorizontalBar => ChartRoute::HorizontalBar,
            ChartType::StackedBar => ChartRoute::StackedBar,
            ChartType::Scatter => ChartRoute::Scatter,
            ChartType::Pie => ChartRoute::Pie,
            ChartType::Donut => ChartRoute::Donut,
            ChartType::Radar => ChartRoute::Radar,
            ChartType::Gauge => ChartRoute::Gauge,
            ChartType::Funnel => ChartRoute::Funnel,
            ChartType::Waterfall => ChartRoute::Waterfall,
            ChartType::BudgetComparison => ChartRoute::BudgetComparison,
            ChartType::YoyComparison => ChartRoute::YoyComparison,
            ChartType::KpiCard => ChartRoute::KpiCard,
            ChartType::Trend => ChartRoute::Trend,
            ChartType::Progress => ChartRoute::Progress,
            ChartType::Table => ChartRoute::Table,
            ChartType::Heatmap
            | ChartType::Treemap
            | ChartType::Sankey
            | ChartType::Map
            | ChartType::Candlestick
            | ChartType::Boxplot
            | ChartType::Other(_) => ChartRoute::Unsupported,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ChartRoute::Unsupported)
    }
}

/// Plain rows-and-columns passthrough for `table` descriptors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The outcome of dispatching one descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ChartView {
    /// No data to draw; render the empty state.
    Empty { chart_type: String },
    /// Placeholder for chart types without a layout.
    Unsupported { chart_type: String },
    Bar { bars: Vec<BarGeometry> },
    HorizontalBar { bars: Vec<BarGeometry> },
    StackedBar { columns: Vec<StackedColumn> },
    Line(LineGeometry),
    Area(LineGeometry),
    Trend(LineGeometry),
    Scatter(LineGeometry),
    Pie { slices: Vec<PieSlice> },
    Donut { slices: Vec<PieSlice> },
    Radar(RadarGeometry),
    Gauge(GaugeGeometry),
    Funnel { stages: Vec<FunnelStageGeometry> },
    Waterfall(WaterfallGeometry),
    BudgetComparison(ComparisonGeometry),
    YoyComparison(ComparisonGeometry),
    KpiCard(KpiCard),
    Progress(ProgressGeometry),
    Table(TableView),
}

impl ChartView {
    pub fn is_empty(&self) -> bool {
        matches!(self, ChartView::Empty { .. })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, ChartView::Unsupported { .. })
    }
}

/// Dispatch using the first value series.
pub fn dispatch(descriptor: &ChartDescriptor, layout: &LayoutParams) -> ChartView {
    dispatch_series(descriptor, 0, layout)
}

/// Dispatch with an explicit value series for single-series chart families.
pub fn dispatch_series(
    descriptor: &ChartDescriptor,
    series_index: usize,
    layout: &LayoutParams,
) -> ChartView {
    let route = ChartRoute::for_type(&descriptor.chart_type);
    let empty = || ChartView::Empty {
        chart_type: descriptor.chart_type.to_string(),
    };
    let area = layout.plot_area();
    let ratio = layout.bar_width_ratio;

    match route {
        ChartRoute::Unsupported => {
            log::debug!("chart type `{}` has no layout", descriptor.chart_type);
            return ChartView::Unsupported {
                chart_type: descriptor.chart_type.to_string(),
            };
        }
        ChartRoute::Bar | ChartRoute::HorizontalBar => {
            let series = normalize(descriptor, series_index);
            if series.is_empty() {
                return empty();
            }
            if route == ChartRoute::Bar {
                ChartView::Bar {
                    bars: layout_bars(&series, &area, ratio),
                }
            } else {
                ChartView::HorizontalBar {
                    bars: layout_horizontal_bars(&series, &area, ratio),
                }
            }
        }
        ChartRoute::StackedBar => {
            let multi = normalize_all(descriptor);
            if multi.is_empty() {
                return empty();
            }
            ChartView::StackedBar {
                columns: layout_stacked_bars(&multi, &area, ratio),
            }
        }
        ChartRoute::Line | ChartRoute::Area | ChartRoute::Scatter => {
            let multi = normalize_all(descriptor);
            if multi.is_empty() {
                return empty();
            }
            let geometry = layout_lines(&multi, &area, route == ChartRoute::Area);
            match route {
                ChartRoute::Area => ChartView::Area(geometry),
                ChartRoute::Scatter => ChartView::Scatter(geometry),
                _ => ChartView::Line(geometry),
            }
        }
        ChartRoute::Trend => {
            let series = normalize(descriptor, series_index);
            if series.is_empty() {
                return empty();
            }
            let (labels, values) = series.into_parts();
            let multi = MultiSeries::new(
                labels,
                vec![NamedValues {
                    name: descriptor.title.clone().unwrap_or_default(),
                    values,
                }],
            );
            ChartView::Trend(layout_lines(&multi, &area, false))
        }
        ChartRoute::Pie | ChartRoute::Donut => {
            let series = normalize(descriptor, series_index);
            let inner_radius = if route == ChartRoute::Donut {
                layout.radius() * layout.donut_inner_ratio
            } else {
                0.0
            };
            let slices = layout_pie(
                &series,
                &PieLayout {
                    center: layout.center(),
                    radius: layout.radius(),
                    inner_radius,
                },
            );
            if slices.is_empty() {
                return empty();
            }
            if route == ChartRoute::Donut {
                ChartView::Donut { slices }
            } else {
                ChartView::Pie { slices }
            }
        }
        ChartRoute::Radar => {
            let multi = normalize_all(descriptor);
            if multi.is_empty() {
                return empty();
            }
            let datasets: Vec<RadarDataset> = multi
                .series()
                .iter()
                .map(|s| RadarDataset {
                    name: s.name.clone(),
                    values: s.values.clone(),
                })
                .collect();
            let radius = layout.radius() / layout.radar_label_offset.max(1.0);
            ChartView::Radar(layout_radar(
                multi.labels(),
                &datasets,
                descriptor.options.max_value,
                &RadarLayout {
                    center: layout.center(),
                    radius,
                    levels: descriptor.options.levels.unwrap_or(layout.radar_levels),
                    label_offset: layout.radar_label_offset,
                },
            ))
        }
        ChartRoute::Gauge => {
            let series = normalize(descriptor, series_index);
            let Some(value) = descriptor
                .options
                .value
                .or_else(|| series.values().first().copied())
            else {
                return empty();
            };
            let max_value = descriptor.options.max_value.unwrap_or(DEFAULT_MAX_VALUE);
            let thresholds = descriptor
                .options
                .thresholds
                .unwrap_or_else(|| Thresholds::default_for(max_value));
            let stroke = layout.gauge_stroke_width;
            ChartView::Gauge(layout_gauge(
                value,
                max_value,
                &thresholds,
                &GaugeLayout {
                    center: layout.center(),
                    radius: (layout.radius() - stroke / 2.0).max(0.0),
                    stroke_width: stroke,
                },
            ))
        }
        ChartRoute::Funnel => {
            let series = normalize(descriptor, series_index);
            if series.is_empty() {
                return empty();
            }
            let stages: Vec<FunnelStage> = series
                .iter()
                .enumerate()
                .map(|(i, (label, value))| {
                    let item = series_item(descriptor, series_index, i);
                    FunnelStage {
                        label: label.to_string(),
                        value,
                        percentage: item.and_then(|p| p.percentage),
                        conversion: item.and_then(|p| p.conversion),
                    }
                })
                .collect();
            ChartView::Funnel {
                stages: layout_funnel(&stages, &funnel_layout(layout, &area, stages.len())),
            }
        }
        ChartRoute::Waterfall => {
            let series = normalize(descriptor, series_index);
            if series.is_empty() {
                return empty();
            }
            let points: Vec<WaterfallPoint> = series
                .iter()
                .enumerate()
                .map(|(i, (label, value))| {
                    let kind = match series_item(descriptor, series_index, i) {
                        Some(item) => item.kind,
                        None => descriptor.raw_data.get(i).and_then(row_kind),
                    };
                    WaterfallPoint::inferred(label, value, kind)
                })
                .collect();
            ChartView::Waterfall(layout_waterfall(&points, &area, ratio))
        }
        ChartRoute::BudgetComparison | ChartRoute::YoyComparison => {
            let multi = normalize_all(descriptor);
            if multi.is_empty() || multi.series().len() < 2 {
                return empty();
            }
            let kind = if route == ChartRoute::BudgetComparison {
                ComparisonKind::Budget
            } else {
                ComparisonKind::YearOverYear
            };
            let geometry = layout_comparison(
                kind,
                multi.labels(),
                &multi.series()[0].values,
                &multi.series()[1].values,
                &area,
                ratio,
            );
            match kind {
                ComparisonKind::Budget => ChartView::BudgetComparison(geometry),
                ComparisonKind::YearOverYear => ChartView::YoyComparison(geometry),
            }
        }
        ChartRoute::KpiCard => {
            let series = normalize(descriptor, series_index);
            if series.is_empty() && descriptor.options.value.is_none() {
                return empty();
            }
            let spark = PlotArea::new(
                area.left,
                area.top + area.height * 2.0 / 3.0,
                area.width,
                area.height / 3.0,
            );
            ChartView::KpiCard(layout_kpi_card(
                descriptor.title.as_deref().unwrap_or(""),
                &series,
                descriptor.options.value,
                descriptor.options.previous,
                descriptor.options.unit.as_deref(),
                &spark,
            ))
        }
        ChartRoute::Progress => {
            let series = normalize(descriptor, series_index);
            let Some(value) = descriptor
                .options
                .value
                .or_else(|| series.values().last().copied())
            else {
                return empty();
            };
            let target = descriptor
                .options
                .target
                .or(descriptor.options.max_value)
                .unwrap_or(DEFAULT_MAX_VALUE);
            ChartView::Progress(layout_progress(value, target, &area, 24.0))
        }
        ChartRoute::Table => match table_view(descriptor) {
            Some(table) => ChartView::Table(table),
            None => empty(),
        },
    }
}

fn series_item(descriptor: &ChartDescriptor, series_index: usize, i: usize) -> Option<&DataItem> {
    descriptor
        .series
        .get(series_index)
        .and_then(|s| s.data.get(i))
}

/// Waterfall kind from a tabular row's `type` column.
fn row_kind(row: &Row) -> Option<WaterfallKind> {
    row.get("type").and_then(Value::as_str).and_then(WaterfallKind::parse)
}

fn funnel_layout(layout: &LayoutParams, area: &PlotArea, stages: usize) -> FunnelLayout {
    let gaps = layout.funnel_gap * stages.saturating_sub(1) as f64;
    FunnelLayout {
        center_x: area.center().x,
        top: area.top,
        stage_height: ((area.height - gaps) / stages.max(1) as f64).max(0.0),
        gap: layout.funnel_gap,
        max_width: area.width,
        min_width: area.width * layout.funnel_min_width_ratio,
    }
}

fn table_view(descriptor: &ChartDescriptor) -> Option<TableView> {
    if descriptor.has_series() {
        let multi = normalize_all(descriptor);
        if multi.is_empty() {
            return None;
        }
        let mut columns = vec![String::from("name")];
        columns.extend(multi.series().iter().map(|s| s.name.clone()));
        let rows = multi
            .labels()
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let mut row = vec![label.clone()];
                row.extend(
                    multi
                        .series()
                        .iter()
                        .map(|s| label_of(&Value::from(s.values[i]))),
                );
                row
            })
            .collect();
        return Some(TableView { columns, rows });
    }

    let first = descriptor.raw_data.first()?;
    let columns: Vec<String> = if descriptor.options.columns.is_empty() {
        first.keys().cloned().collect()
    } else {
        descriptor.options.columns.clone()
    };
    let rows = descriptor
        .raw_data
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(c).map(label_of).unwrap_or_default())
                .collect()
        })
        .collect();
    Some(TableView { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unimplemented_types_route_to_unsupported() {
        for t in ["heatmap", "treemap", "sankey", "map", "candlestick", "boxplot", "bubble"] {
            assert_eq!(ChartRoute::for_type(&ChartType::parse(t)), ChartRoute::Unsupported);
        }
        assert!(ChartRoute::for_type(&ChartType::Gauge).is_supported());
    }

    #[test]
    fn unsupported_wins_over_empty() {
        let v = dispatch(&ChartDescriptor::new("sankey"), &LayoutParams::default());
        assert!(v.is_unsupported());
    }

    #[test]
    fn row_kind_reads_type_column() {
        let row: Row = serde_json::from_str(r#"{"type": "Total"}"#).unwrap();
        assert_eq!(row_kind(&row), Some(WaterfallKind::Total));
        let row: Row = serde_json::from_str(r#"{"type": 3}"#).unwrap();
        assert_eq!(row_kind(&row), None);
    }
}
