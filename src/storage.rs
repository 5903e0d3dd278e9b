use crate::dispatch::ChartView;
use crate::error::{Error, Result};
use crate::models::{ChartDescriptor, NormalizedSeries, Row};
use csv::{ReaderBuilder, WriterBuilder};
use serde_json::{Number, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Read a chart descriptor from a JSON file.
pub fn load_descriptor<P: AsRef<Path>>(path: P) -> Result<ChartDescriptor> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Read CSV rows (with header) as `rawData` rows. Numeric cells become JSON numbers,
/// empty cells become null, everything else stays text.
pub fn load_csv_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, cell)| (h.to_string(), cell_value(cell)))
            .collect();
        rows.push(row);
    }
    log::debug!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match cell.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(cell.to_string()),
    }
}

/// Neutralize spreadsheet formula prefixes in text cells.
fn guard_cell(s: &str) -> String {
    if s.starts_with(['=', '+', '-', '@']) {
        format!("'{s}")
    } else {
        s.to_string()
    }
}

/// Save a normalized series as `label,value` CSV.
pub fn save_series_csv<P: AsRef<Path>>(series: &NormalizedSeries, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut wtr = WriterBuilder::new().from_writer(file);
    wtr.serialize(("label", "value"))?;
    for (label, value) in series.iter() {
        wtr.serialize((guard_cell(label), value))?;
    }
    wtr.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Save a dispatched view as pretty JSON.
pub fn save_view_json<P: AsRef<Path>>(view: &ChartView, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).map_err(|e| Error::io(path, e))?;
    let s = serde_json::to_string_pretty(view)?;
    f.write_all(s.as_bytes()).map_err(|e| Error::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_csv_guards_formulas() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let s = NormalizedSeries::from_pairs(vec!["=SUM(A1)".into(), "ok".into()], vec![1.0, 2.5]);
        save_series_csv(&s, &csvp).unwrap();
        let text = fs::read_to_string(&csvp).unwrap();
        assert!(text.contains("'=SUM(A1),1"));
        assert!(text.contains("ok,2.5"));
    }

    #[test]
    fn cells_are_typed() {
        assert_eq!(cell_value("12.5"), Value::from(12.5));
        assert_eq!(cell_value(""), Value::Null);
        assert_eq!(cell_value("Jan"), Value::from("Jan"));
    }
}
