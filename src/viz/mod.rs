//! Preview renderer: draw a dispatched [`ChartView`] to **SVG** or **PNG**.
//!
//! The geometry is already in pixels, so drawing goes straight onto the root
//! drawing area without a chart context:
//! - bars and rects as `Rectangle`, stages and sectors as `Polygon`
//! - arcs sampled to polylines / annular bands
//! - labels via `Text`; on raster output without a registered font, labels are
//!   skipped (see [`register_label_font`])

pub mod text;
pub mod types;
pub mod util;

pub use types::{OutputFormat, RenderOptions};

use crate::config::LayoutParams;
use crate::dispatch::{ChartView, TableView};
use crate::geometry::cartesian::{BarGeometry, LineGeometry};
use crate::geometry::{Arc, Point, Rect, Tone};
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;

use text::truncate_to_width;
use util::{GRID, INK, NEUTRAL, format_percent, format_value, px, tone_color};

/// Points per 360° when sampling arcs.
const ARC_SAMPLES_PER_TURN: f64 = 180.0;

/// Register font bytes as the `sans-serif` family used for labels.
///
/// `ab_glyph` does not discover system fonts; without a registered font, raster
/// output carries no text. SVG output references the family by name and needs none.
pub fn register_label_font(bytes: Vec<u8>) -> Result<()> {
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("invalid font data"))
}

/// Read a TTF/OTF file and register it with [`register_label_font`].
pub fn load_label_font<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| crate::Error::io(path, e))?;
    register_label_font(bytes)
}

/// Render `view` to `out_path`; the extension picks SVG or bitmap output.
pub fn render_view<P: AsRef<Path>>(
    view: &ChartView,
    layout: &LayoutParams,
    out_path: P,
    opts: &RenderOptions,
) -> Result<()> {
    let out_path = out_path.as_ref();
    let size = canvas_size(layout);
    match OutputFormat::from_path(out_path)? {
        OutputFormat::Svg => {
            let root = SVGBackend::new(out_path, size).into_drawing_area();
            draw_view(&root, view, layout, opts)?;
            root.present().map_err(|e| anyhow!("{:?}", e))?;
        }
        OutputFormat::Bitmap => {
            let root = BitMapBackend::new(out_path, size).into_drawing_area();
            draw_view(&root, view, layout, opts)?;
            root.present().map_err(|e| anyhow!("{:?}", e))?;
        }
    }
    log::debug!("rendered {} to {}", view_name(view), out_path.display());
    Ok(())
}

/// Render `view` to an in-memory SVG document.
pub fn render_svg_string(view: &ChartView, layout: &LayoutParams, opts: &RenderOptions) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, canvas_size(layout)).into_drawing_area();
        draw_view(&root, view, layout, opts)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(svg)
}

fn canvas_size(layout: &LayoutParams) -> (u32, u32) {
    (
        layout.width.round().max(1.0) as u32,
        layout.height.round().max(1.0) as u32,
    )
}

fn view_name(view: &ChartView) -> &'static str {
    match view {
        ChartView::Empty { .. } => "empty",
        ChartView::Unsupported { .. } => "unsupported",
        ChartView::Bar { .. } => "bar",
        ChartView::HorizontalBar { .. } => "horizontal bar",
        ChartView::StackedBar { .. } => "stacked bar",
        ChartView::Line(_) => "line",
        ChartView::Area(_) => "area",
        ChartView::Trend(_) => "trend",
        ChartView::Scatter(_) => "scatter",
        ChartView::Pie { .. } => "pie",
        ChartView::Donut { .. } => "donut",
        ChartView::Radar(_) => "radar",
        ChartView::Gauge(_) => "gauge",
        ChartView::Funnel { .. } => "funnel",
        ChartView::Waterfall(_) => "waterfall",
        ChartView::BudgetComparison(_) => "budget comparison",
        ChartView::YoyComparison(_) => "yoy comparison",
        ChartView::KpiCard(_) => "kpi card",
        ChartView::Progress(_) => "progress",
        ChartView::Table(_) => "table",
    }
}

/// Draw a label; failures (no font on the raster path) are logged and skipped.
fn draw_label<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    at: (i32, i32),
    font_px: u32,
    pos: Pos,
    color: &RGBColor,
) {
    if text.is_empty() {
        return;
    }
    let style = TextStyle::from((FontFamily::SansSerif, font_px))
        .pos(pos)
        .color(color);
    if let Err(e) = area.draw(&Text::new(text, at, style)) {
        log::debug!("label `{text}` skipped: {:?}", e);
    }
}

fn centered() -> Pos {
    Pos::new(HPos::Center, VPos::Center)
}

fn fill_rect<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rect: &Rect,
    style: ShapeStyle,
) -> Result<()> {
    let top_left = px(Point::new(rect.x, rect.y));
    let bottom_right = px(Point::new(rect.right(), rect.bottom()));
    area.draw(&Rectangle::new([top_left, bottom_right], style))
        .map_err(|e| anyhow!("{:?}", e))
}

fn polyline<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    points: &[Point],
    style: ShapeStyle,
) -> Result<()> {
    let pts: Vec<(i32, i32)> = points.iter().copied().map(px).collect();
    area.draw(&PathElement::new(pts, style))
        .map_err(|e| anyhow!("{:?}", e))
}

fn polygon<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    points: &[Point],
    style: ShapeStyle,
) -> Result<()> {
    if points.len() < 3 {
        return Ok(());
    }
    let pts: Vec<(i32, i32)> = points.iter().copied().map(px).collect();
    area.draw(&Polygon::new(pts, style))
        .map_err(|e| anyhow!("{:?}", e))
}

fn arc_samples(arc: &Arc) -> usize {
    ((arc.span().abs() / 360.0 * ARC_SAMPLES_PER_TURN).ceil() as usize).max(2)
}

/// Outline of a ring segment between `inner` and `arc.radius`.
fn band_outline(arc: &Arc, inner: f64) -> Vec<Point> {
    let n = arc_samples(arc);
    let mut pts = arc.sample(n);
    if inner > 0.0 {
        let inner_arc = Arc::new(arc.center, inner, arc.start_angle, arc.end_angle);
        pts.extend(inner_arc.sample(n).into_iter().rev());
    } else {
        pts.push(arc.center);
    }
    pts
}

fn draw_view<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    view: &ChartView,
    layout: &LayoutParams,
    opts: &RenderOptions,
) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let font = opts.font_px;
    let locale = layout.locale.as_str();
    let area = layout.plot_area();

    if let Some(title) = opts.title.as_deref() {
        let max_w = layout.width.max(0.0) as u32;
        draw_label(
            root,
            &truncate_to_width(title, font + 4, max_w),
            ((layout.width / 2.0) as i32, (layout.padding.top / 2.0) as i32),
            font + 4,
            centered(),
            &INK,
        );
    }

    match view {
        ChartView::Empty { .. } => {
            draw_label(root, "No data", px(area.center()), font + 2, centered(), &NEUTRAL);
        }
        ChartView::Unsupported { chart_type } => {
            let frame = Rect::new(area.left, area.top, area.width, area.height);
            fill_rect(root, &frame, GRID.stroke_width(1))?;
            draw_label(
                root,
                &format!("Unsupported chart type: {chart_type}"),
                px(area.center()),
                font,
                centered(),
                &NEUTRAL,
            );
        }
        ChartView::Bar { bars } => draw_bars(root, bars, false, font, locale, opts)?,
        ChartView::HorizontalBar { bars } => draw_bars(root, bars, true, font, locale, opts)?,
        ChartView::StackedBar { columns } => {
            for column in columns {
                for seg in &column.segments {
                    fill_rect(root, &seg.rect, tone_color(seg.tone).filled())?;
                }
                if let Some(first) = column.segments.first() {
                    let cx = first.rect.center().x;
                    let slot = first.rect.width.max(1.0) as u32 * 2;
                    draw_label(
                        root,
                        &truncate_to_width(&column.label, font, slot),
                        (cx as i32, (area.bottom() + font as f64) as i32),
                        font,
                        centered(),
                        &INK,
                    );
                }
            }
        }
        ChartView::Line(g) | ChartView::Area(g) | ChartView::Trend(g) => {
            draw_lines(root, g, true, font, area.bottom())?
        }
        ChartView::Scatter(g) => draw_lines(root, g, false, font, area.bottom())?,
        ChartView::Pie { slices } | ChartView::Donut { slices } => {
            for slice in slices.iter().filter(|s| s.fraction > 0.0) {
                let color = tone_color(slice.tone);
                polygon(root, &band_outline(&slice.outer, slice.inner_radius), color.filled())?;
                polyline(
                    root,
                    &band_outline(&slice.outer, slice.inner_radius),
                    WHITE.stroke_width(1),
                )?;
                if opts.value_labels && slice.fraction >= 0.04 {
                    draw_label(
                        root,
                        &format_percent(slice.fraction * 100.0),
                        px(slice.label_anchor),
                        font,
                        centered(),
                        &WHITE,
                    );
                }
            }
        }
        ChartView::Radar(g) => {
            for ring in &g.rings {
                let mut closed = ring.clone();
                if let Some(first) = ring.first() {
                    closed.push(*first);
                }
                polyline(root, &closed, GRID.stroke_width(1))?;
            }
            for axis in &g.axes {
                polyline(root, &[axis.spoke.from, axis.spoke.to], GRID.stroke_width(1))?;
                draw_label(root, &axis.label, px(axis.label_anchor), font, centered(), &INK);
            }
            for ds in &g.datasets {
                let color = tone_color(ds.tone);
                polygon(root, &ds.points, color.mix(0.25).filled())?;
                let mut outline = ds.points.clone();
                if let Some(first) = ds.points.first() {
                    outline.push(*first);
                }
                polyline(root, &outline, color.stroke_width(2))?;
            }
        }
        ChartView::Gauge(g) => {
            let inner = (g.track.radius - g.stroke_width / 2.0).max(0.0);
            let outer_arc = |arc: &Arc| {
                Arc::new(
                    arc.center,
                    arc.radius + g.stroke_width / 2.0,
                    arc.start_angle,
                    arc.end_angle,
                )
            };
            polygon(root, &band_outline(&outer_arc(&g.track), inner), GRID.filled())?;
            for zone in &g.zones {
                // thin zone marker on the outer rim
                let rim = Arc::new(
                    zone.arc.center,
                    zone.arc.radius + g.stroke_width / 2.0 + 4.0,
                    zone.arc.start_angle,
                    zone.arc.end_angle,
                );
                polygon(
                    root,
                    &band_outline(&rim, zone.arc.radius + g.stroke_width / 2.0 + 1.0),
                    tone_color(zone.tone).filled(),
                )?;
            }
            if g.value_arc.span() > 0.0 {
                polygon(
                    root,
                    &band_outline(&outer_arc(&g.value_arc), inner),
                    tone_color(g.status).filled(),
                )?;
            }
            polyline(root, &[g.needle.from, g.needle.to], INK.stroke_width(2))?;
            let c = px(g.track.center);
            let value_y = c.1 + (g.track.radius / 2.0) as i32;
            draw_label(root, &format_percent(g.percentage), (c.0, value_y), font + 8, centered(), &INK);
            draw_label(
                root,
                &format_value(g.value, locale),
                (c.0, value_y + font as i32 + 8),
                font,
                centered(),
                &NEUTRAL,
            );
        }
        ChartView::Funnel { stages } => {
            for stage in stages {
                polygon(root, &stage.polygon, tone_color(stage.tone).filled())?;
                if opts.value_labels {
                    let text = format!(
                        "{} {} ({})",
                        stage.label,
                        format_value(stage.value, locale),
                        format_percent(stage.percentage)
                    );
                    let max_w = stage.top_width.max(stage.bottom_width).max(1.0) as u32;
                    draw_label(
                        root,
                        &truncate_to_width(&text, font, max_w),
                        px(stage.label_anchor),
                        font,
                        centered(),
                        &WHITE,
                    );
                }
            }
        }
        ChartView::Waterfall(g) => {
            let base = g.baseline_y.round() as i32;
            root.draw(&PathElement::new(
                vec![(area.left as i32, base), (area.right() as i32, base)],
                NEUTRAL.stroke_width(1),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
            for c in &g.connectors {
                polyline(root, &[c.from, c.to], NEUTRAL.stroke_width(1))?;
            }
            for bar in &g.bars {
                fill_rect(root, &bar.rect, tone_color(bar.tone).filled())?;
                let cx = bar.rect.center().x as i32;
                draw_label(
                    root,
                    &truncate_to_width(&bar.label, font, (bar.rect.width * 1.6).max(1.0) as u32),
                    (cx, (area.bottom() + font as f64) as i32),
                    font,
                    centered(),
                    &INK,
                );
                if opts.value_labels {
                    draw_label(
                        root,
                        &format_value(bar.value, locale),
                        (cx, bar.rect.y as i32 - 2),
                        font,
                        Pos::new(HPos::Center, VPos::Bottom),
                        &INK,
                    );
                }
            }
        }
        ChartView::BudgetComparison(g) | ChartView::YoyComparison(g) => {
            for grp in &g.groups {
                fill_rect(root, &grp.primary_bar, tone_color(grp.primary_tone).filled())?;
                fill_rect(root, &grp.reference_bar, tone_color(Tone::Reference).filled())?;
                let cx = grp.slot.center().x as i32;
                draw_label(
                    root,
                    &truncate_to_width(&grp.label, font, grp.slot.width.max(1.0) as u32),
                    (cx, (area.bottom() + font as f64) as i32),
                    font,
                    centered(),
                    &INK,
                );
                if let (true, Some(ratio)) = (opts.value_labels, grp.ratio) {
                    let top = grp.primary_bar.y.min(grp.reference_bar.y);
                    draw_label(
                        root,
                        &format_percent(ratio),
                        (cx, top as i32 - 2),
                        font,
                        Pos::new(HPos::Center, VPos::Bottom),
                        &tone_color(grp.primary_tone),
                    );
                }
            }
        }
        ChartView::KpiCard(card) => {
            let c = area.center();
            let cx = c.x as i32;
            draw_label(root, &card.label, (cx, area.top as i32 + font as i32), font + 2, centered(), &NEUTRAL);
            let headline = match card.unit.as_deref() {
                Some(unit) => format!("{}{unit}", format_value(card.value, locale)),
                None => format_value(card.value, locale),
            };
            let headline_y = (area.top + area.height / 3.0) as i32;
            draw_label(root, &headline, (cx, headline_y), font * 3, centered(), &INK);
            if let Some(change) = card.change {
                let sign = if change >= 0.0 { "+" } else { "" };
                draw_label(
                    root,
                    &format!("{sign}{}", format_percent(change)),
                    (cx, (area.top + area.height / 2.0) as i32 + font as i32),
                    font + 2,
                    centered(),
                    &tone_color(card.tone),
                );
            }
            if card.sparkline.len() > 1 {
                polyline(root, &card.sparkline, tone_color(Tone::Series(0)).stroke_width(2))?;
            }
        }
        ChartView::Progress(p) => {
            fill_rect(root, &p.track, GRID.filled())?;
            fill_rect(root, &p.fill, tone_color(p.tone).filled())?;
            draw_label(
                root,
                &format!(
                    "{} / {} ({})",
                    format_value(p.value, locale),
                    format_value(p.target, locale),
                    format_percent(p.percentage)
                ),
                (p.track.center().x as i32, p.track.y as i32 - 4),
                font,
                Pos::new(HPos::Center, VPos::Bottom),
                &INK,
            );
        }
        ChartView::Table(table) => draw_table(root, table, layout, font)?,
    }
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bars: &[BarGeometry],
    horizontal: bool,
    font: u32,
    locale: &str,
    opts: &RenderOptions,
) -> Result<()> {
    for bar in bars {
        fill_rect(root, &bar.rect, tone_color(bar.tone).filled())?;
        let r = &bar.rect;
        if horizontal {
            draw_label(
                root,
                &truncate_to_width(&bar.label, font, 80),
                (r.x as i32 - 4, r.center().y as i32),
                font,
                Pos::new(HPos::Right, VPos::Center),
                &INK,
            );
            if opts.value_labels {
                draw_label(
                    root,
                    &format_value(bar.value, locale),
                    (r.right() as i32 + 4, r.center().y as i32),
                    font,
                    Pos::new(HPos::Left, VPos::Center),
                    &INK,
                );
            }
        } else {
            let cx = r.center().x as i32;
            draw_label(
                root,
                &truncate_to_width(&bar.label, font, (r.width * 1.6).max(1.0) as u32),
                (cx, r.bottom() as i32 + font as i32),
                font,
                centered(),
                &INK,
            );
            if opts.value_labels {
                draw_label(
                    root,
                    &format_value(bar.value, locale),
                    (cx, r.y as i32 - 2),
                    font,
                    Pos::new(HPos::Center, VPos::Bottom),
                    &INK,
                );
            }
        }
    }
    Ok(())
}

fn draw_lines<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    g: &LineGeometry,
    connect: bool,
    font: u32,
    bottom: f64,
) -> Result<()> {
    for line in &g.lines {
        let color = tone_color(line.tone);
        if g.filled && line.points.len() > 1 {
            let mut band = line.points.clone();
            if let (Some(first), Some(last)) = (line.points.first(), line.points.last()) {
                band.push(Point::new(last.x, g.baseline_y));
                band.push(Point::new(first.x, g.baseline_y));
            }
            polygon(root, &band, color.mix(0.20).filled())?;
        }
        if connect && line.points.len() > 1 {
            polyline(root, &line.points, color.stroke_width(2))?;
        }
        for p in &line.points {
            root.draw(&Circle::new(px(*p), 3, color.filled()))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }
    if let Some(line) = g.lines.first() {
        for (label, p) in g.labels.iter().zip(&line.points) {
            let at = (p.x as i32, bottom as i32 + font as i32);
            draw_label(root, label, at, font, centered(), &INK);
        }
    }
    Ok(())
}

fn draw_table<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    table: &TableView,
    layout: &LayoutParams,
    font: u32,
) -> Result<()> {
    let area = layout.plot_area();
    let cols = table.columns.len().max(1);
    let col_w = area.width / cols as f64;
    let row_h = font as f64 * 1.8;
    let text_at = |col: usize, row: usize| {
        (
            (area.left + col as f64 * col_w + 4.0) as i32,
            (area.top + row as f64 * row_h + row_h / 2.0) as i32,
        )
    };
    let left = Pos::new(HPos::Left, VPos::Center);
    let header = Rect::new(area.left, area.top, area.width, row_h);
    fill_rect(root, &header, GRID.filled())?;
    for (c, name) in table.columns.iter().enumerate() {
        draw_label(root, &truncate_to_width(name, font, col_w as u32), text_at(c, 0), font, left, &INK);
    }
    let max_rows = ((area.height / row_h) as usize).saturating_sub(1);
    for (r, row) in table.rows.iter().take(max_rows).enumerate() {
        for (c, cell) in row.iter().enumerate() {
            draw_label(root, &truncate_to_width(cell, font, col_w as u32), text_at(c, r + 1), font, left, &INK);
        }
    }
    Ok(())
}
