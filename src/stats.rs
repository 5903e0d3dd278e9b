use crate::models::NormalizedSeries;
use serde::{Deserialize, Serialize};

/// Summary statistics for one normalized series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub total: f64,
}

/// Compute count, extremes, mean, median and total of a series' values (sign kept).
pub fn summarize(series: &NormalizedSeries) -> Summary {
    let mut vals: Vec<f64> = series
        .values()
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    vals.sort_by(f64::total_cmp);

    let count = vals.len();
    let total: f64 = vals.iter().sum();
    let min = vals.first().copied();
    let max = vals.last().copied();
    let mean = if count > 0 {
        Some(total / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        count,
        min,
        max,
        mean,
        median,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_has_no_extremes() {
        let s = summarize(&NormalizedSeries::default());
        assert_eq!(s.count, 0);
        assert_eq!(s.mean, None);
        assert_eq!(s.total, 0.0);
    }
}
