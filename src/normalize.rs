//! Value normalization: turn a [`ChartDescriptor`] into length-matched label/value arrays.
//!
//! Two input shapes are reconciled:
//! - explicit `series[k].data[*].{name,value}` points (authoritative when non-empty)
//! - tabular `rawData` rows plus `xAxis.field` / `yAxis[k].field` selectors
//!
//! Nothing here fails. Missing data yields an empty series, mismatched lengths are
//! truncated, and unparseable numbers read as `0`.

use crate::models::{
    ChartDescriptor, MultiSeries, NamedValues, NormalizedSeries, Row, label_of, number_or_zero,
};

/// Normalize the descriptor's `series_index`-th value array against its label axis.
///
/// Labels always come from the first series (or from `xAxis.field`); values come
/// from `series[series_index]` (or from `yAxis[series_index].field`, falling back to
/// `yAxis[0]`). An out-of-range series index yields an empty result.
pub fn normalize(descriptor: &ChartDescriptor, series_index: usize) -> NormalizedSeries {
    if descriptor.has_series() {
        let labels: Vec<String> = descriptor.series[0]
            .data
            .iter()
            .map(|p| p.name.clone())
            .collect();
        let values: Vec<f64> = match descriptor.series.get(series_index) {
            Some(s) => s.data.iter().map(|p| p.value).collect(),
            None => {
                log::debug!(
                    "series index {} out of range ({} series)",
                    series_index,
                    descriptor.series.len()
                );
                Vec::new()
            }
        };
        return NormalizedSeries::from_pairs(labels, values);
    }

    if !descriptor.raw_data.is_empty() {
        let labels = column_labels(&descriptor.raw_data, descriptor.x_field());
        let y_field = descriptor
            .y_field(series_index)
            .or_else(|| descriptor.y_field(0));
        let values = column_values(&descriptor.raw_data, y_field);
        return NormalizedSeries::from_pairs(labels, values);
    }

    NormalizedSeries::default()
}

/// Normalize every value array of the descriptor against the shared label axis.
pub fn normalize_all(descriptor: &ChartDescriptor) -> MultiSeries {
    if descriptor.has_series() {
        let labels: Vec<String> = descriptor.series[0]
            .data
            .iter()
            .map(|p| p.name.clone())
            .collect();
        let series = descriptor
            .series
            .iter()
            .enumerate()
            .map(|(idx, s)| NamedValues {
                name: series_name(&s.name, idx),
                values: s.data.iter().map(|p| p.value).collect(),
            })
            .collect();
        return MultiSeries::new(labels, series);
    }

    if !descriptor.raw_data.is_empty() {
        let labels = column_labels(&descriptor.raw_data, descriptor.x_field());
        let series: Vec<NamedValues> = if descriptor.y_axis.is_empty() {
            vec![NamedValues {
                name: series_name("", 0),
                values: column_values(&descriptor.raw_data, None),
            }]
        } else {
            descriptor
                .y_axis
                .iter()
                .map(|axis| NamedValues {
                    name: axis.name.clone().unwrap_or_else(|| axis.field.clone()),
                    values: column_values(&descriptor.raw_data, Some(&axis.field)),
                })
                .collect()
        };
        return MultiSeries::new(labels, series);
    }

    MultiSeries::default()
}

/// Reconcile two independently-sourced arrays: keep the leading `min(len)` items of each.
pub fn reconcile<L, V>(labels: &[L], values: &[V]) -> (Vec<L>, Vec<V>)
where
    L: Clone,
    V: Clone,
{
    let n = labels.len().min(values.len());
    (labels[..n].to_vec(), values[..n].to_vec())
}

fn column_labels(rows: &[Row], field: Option<&str>) -> Vec<String> {
    rows.iter()
        .map(|row| {
            field
                .and_then(|f| row.get(f))
                .map(label_of)
                .unwrap_or_default()
        })
        .collect()
}

fn column_values(rows: &[Row], field: Option<&str>) -> Vec<f64> {
    rows.iter()
        .map(|row| field.and_then(|f| row.get(f)).map_or(0.0, number_or_zero))
        .collect()
}

fn series_name(name: &str, idx: usize) -> String {
    if name.is_empty() {
        format!("Series {}", idx + 1)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataItem, SeriesSpec};
    use serde_json::json;

    fn rows() -> Vec<Row> {
        serde_json::from_value(json!([
            {"month": "Jan", "revenue": 120, "cost": "80"},
            {"month": "Feb", "revenue": "n/a", "cost": 90},
            {"month": 3, "revenue": null}
        ]))
        .unwrap()
    }

    #[test]
    fn series_take_precedence_over_raw_data() {
        let d = ChartDescriptor::new("bar")
            .with_rows(rows(), "month", &["revenue"])
            .with_series(SeriesSpec::new("s", vec![DataItem::new("A", 1.0)]));
        let n = normalize(&d, 0);
        assert_eq!(n.labels(), ["A"]);
        assert_eq!(n.values(), [1.0]);
    }

    #[test]
    fn raw_rows_use_field_selectors() {
        let d = ChartDescriptor::new("bar").with_rows(rows(), "month", &["revenue", "cost"]);
        let n = normalize(&d, 0);
        assert_eq!(n.labels(), ["Jan", "Feb", "3"]);
        assert_eq!(n.values(), [120.0, 0.0, 0.0]);

        let cost = normalize(&d, 1);
        assert_eq!(cost.values(), [80.0, 90.0, 0.0]);
    }

    #[test]
    fn labels_come_from_first_series_and_lengths_match() {
        let d = ChartDescriptor::new("line")
            .with_series(SeriesSpec::new(
                "a",
                vec![DataItem::new("x", 1.0), DataItem::new("y", 2.0), DataItem::new("z", 3.0)],
            ))
            .with_series(SeriesSpec::new("b", vec![DataItem::new("ignored", 9.0)]));
        let n = normalize(&d, 1);
        assert_eq!(n.labels(), ["x"]);
        assert_eq!(n.values(), [9.0]);
    }

    #[test]
    fn out_of_range_index_is_empty() {
        let d = ChartDescriptor::new("bar")
            .with_series(SeriesSpec::new("a", vec![DataItem::new("x", 1.0)]));
        assert!(normalize(&d, 5).is_empty());
    }

    #[test]
    fn reconcile_truncates_to_shorter() {
        let (l, v) = reconcile(&["a", "b", "c"], &[1.0, 2.0]);
        assert_eq!(l, ["a", "b"]);
        assert_eq!(v, [1.0, 2.0]);
    }

    #[test]
    fn normalize_all_names_raw_columns_after_fields() {
        let d = ChartDescriptor::new("stacked_bar").with_rows(rows(), "month", &["revenue", "cost"]);
        let m = normalize_all(&d);
        let names: Vec<&str> = m.series().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["revenue", "cost"]);
        assert_eq!(m.labels().len(), 3);
    }
}
