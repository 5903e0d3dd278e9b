//! Switching the active dimension (category field) or measure (value field).
//!
//! A switch rewrites the descriptor's field selectors and keeps its chart type; the
//! next dispatch re-normalizes against the new fields. The field name is also handed
//! to a [`FieldChangeSink`] so the data source can refetch.

use crate::config::LayoutParams;
use crate::dispatch::{ChartView, dispatch};
use crate::models::{AxisField, ChartDescriptor, FieldOption};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum FieldSelection {
    Dimension(String),
    Measure(String),
}

impl FieldSelection {
    pub fn field(&self) -> &str {
        match self {
            FieldSelection::Dimension(f) | FieldSelection::Measure(f) => f,
        }
    }
}

pub trait FieldChangeSink {
    fn on_field_change(&mut self, selection: &FieldSelection);
}

impl<F> FieldChangeSink for F
where
    F: FnMut(&FieldSelection),
{
    fn on_field_change(&mut self, selection: &FieldSelection) {
        self(selection)
    }
}

fn axis_for(field: &str, options: &[FieldOption]) -> AxisField {
    AxisField {
        field: field.to_string(),
        name: options
            .iter()
            .find(|o| o.field == field)
            .map(|o| o.label.clone()),
    }
}

/// Copy of `descriptor` reading categories from `field`.
pub fn with_dimension(descriptor: &ChartDescriptor, field: &str) -> ChartDescriptor {
    let mut next = descriptor.clone();
    next.x_axis = Some(axis_for(field, &descriptor.dimensions));
    next
}

/// Copy of `descriptor` reading its first value series from `field`.
pub fn with_measure(descriptor: &ChartDescriptor, field: &str) -> ChartDescriptor {
    let mut next = descriptor.clone();
    let axis = axis_for(field, &descriptor.measures);
    match next.y_axis.first_mut() {
        Some(first) => *first = axis,
        None => next.y_axis.push(axis),
    }
    next
}

/// Tracks the active fields of one chart instance.
#[derive(Debug, Clone)]
pub struct DimensionSwitch {
    descriptor: ChartDescriptor,
}

impl DimensionSwitch {
    pub fn from_descriptor(descriptor: ChartDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &ChartDescriptor {
        &self.descriptor
    }

    pub fn active_dimension(&self) -> Option<&str> {
        self.descriptor.x_field()
    }

    pub fn active_measure(&self) -> Option<&str> {
        self.descriptor.y_field(0)
    }

    /// Returns `true` when the selection changed and the sink was notified.
    pub fn select_dimension<S: FieldChangeSink + ?Sized>(&mut self, field: &str, sink: &mut S) -> bool {
        if self.active_dimension() == Some(field) || !offered(&self.descriptor.dimensions, field) {
            log::debug!("dimension `{field}` ignored");
            return false;
        }
        self.descriptor = with_dimension(&self.descriptor, field);
        sink.on_field_change(&FieldSelection::Dimension(field.to_string()));
        true
    }

    pub fn select_measure<S: FieldChangeSink + ?Sized>(&mut self, field: &str, sink: &mut S) -> bool {
        if self.active_measure() == Some(field) || !offered(&self.descriptor.measures, field) {
            log::debug!("measure `{field}` ignored");
            return false;
        }
        self.descriptor = with_measure(&self.descriptor, field);
        sink.on_field_change(&FieldSelection::Measure(field.to_string()));
        true
    }

    /// Dispatch the current descriptor.
    pub fn view(&self, layout: &LayoutParams) -> ChartView {
        dispatch(&self.descriptor, layout)
    }
}

/// An empty option list accepts any field.
fn offered(options: &[FieldOption], field: &str) -> bool {
    options.is_empty() || options.iter().any(|o| o.field == field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_switch_replaces_first_y_axis_only() {
        let mut d = ChartDescriptor::new("line");
        d.y_axis = vec![AxisField::new("revenue"), AxisField::new("cost")];
        let next = with_measure(&d, "profit");
        assert_eq!(next.y_field(0), Some("profit"));
        assert_eq!(next.y_field(1), Some("cost"));
        assert_eq!(next.chart_type, d.chart_type);
    }

    #[test]
    fn reselecting_active_field_is_ignored() {
        let mut d = ChartDescriptor::new("bar");
        d.x_axis = Some(AxisField::new("region"));
        let mut switch = DimensionSwitch::from_descriptor(d);
        let mut seen = Vec::new();
        let mut sink = |s: &FieldSelection| seen.push(s.clone());
        assert!(!switch.select_dimension("region", &mut sink));
        assert!(switch.select_dimension("product", &mut sink));
        assert_eq!(seen, vec![FieldSelection::Dimension("product".into())]);
    }
}
