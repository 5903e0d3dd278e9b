use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One tabular row of `rawData`: field name -> scalar.
pub type Row = Map<String, Value>;

/// Chart families understood by the dispatcher.
///
/// The tag is parsed leniently: case, `_` and `-` are ignored, so `horizontalBar`,
/// `horizontal_bar` and `horizontal-bar` all name [`ChartType::HorizontalBar`].
/// Anything unknown is kept verbatim in [`ChartType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChartType {
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
    // Known to the backend, not laid out here.
    Heatmap,
    Treemap,
    Sankey,
    Map,
    Candlestick,
    Boxplot,
    Other(String),
}

impl ChartType {
    pub fn parse(tag: &str) -> Self {
        let key: String = tag
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "line" => ChartType::Line,
            "area" => ChartType::Area,
            "bar" | "column" => ChartType::Bar,
            "horizontalbar" | "hbar" => ChartType::HorizontalBar,
            "stackedbar" | "stacked" => ChartType::StackedBar,
            "scatter" => ChartType::Scatter,
            "pie" => ChartType::Pie,
            "donut" | "doughnut" | "ring" => ChartType::Donut,
            "radar" => ChartType::Radar,
            "gauge" => ChartType::Gauge,
            "funnel" => ChartType::Funnel,
            "waterfall" => ChartType::Waterfall,
            "budgetcomparison" | "budget" => ChartType::BudgetComparison,
            "yoycomparison" | "yoy" => ChartType::YoyComparison,
            "kpicard" | "kpi" => ChartType::KpiCard,
            "trend" | "sparkline" => ChartType::Trend,
            "progress" => ChartType::Progress,
            "table" => ChartType::Table,
            "heatmap" => ChartType::Heatmap,
            "treemap" => ChartType::Treemap,
            "sankey" => ChartType::Sankey,
            "map" => ChartType::Map,
            "candlestick" => ChartType::Candlestick,
            "boxplot" => ChartType::Boxplot,
            _ => ChartType::Other(tag.to_string()),
        }
    }

    /// Canonical snake_case tag.
    pub fn as_str(&self) -> &str {
        match self {
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Bar => "bar",
            ChartType::HorizontalBar => "horizontal_bar",
            ChartType::StackedBar => "stacked_bar",
            ChartType::Scatter => "scatter",
            ChartType::Pie => "pie",
            ChartType::Donut => "donut",
            ChartType::Radar => "radar",
            ChartType::Gauge => "gauge",
            ChartType::Funnel => "funnel",
            ChartType::Waterfall => "waterfall",
            ChartType::BudgetComparison => "budget_comparison",
            ChartType::YoyComparison => "yoy_comparison",
            ChartType::KpiCard => "kpi_card",
            ChartType::Trend => "trend",
            ChartType::Progress => "progress",
            ChartType::Table => "table",
            ChartType::Heatmap => "heatmap",
            ChartType::Treemap => "treemap",
            ChartType::Sankey => "sankey",
            ChartType::Map => "map",
            ChartType::Candlestick => "candlestick",
            ChartType::Boxplot => "boxplot",
            ChartType::Other(tag) => tag,
        }
    }
}

impl Default for ChartType {
    fn default() -> Self {
        ChartType::Other(String::new())
    }
}

impl From<String> for ChartType {
    fn from(s: String) -> Self {
        ChartType::parse(&s)
    }
}

impl From<&str> for ChartType {
    fn from(s: &str) -> Self {
        ChartType::parse(s)
    }
}

impl From<ChartType> for String {
    fn from(t: ChartType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract description of one chart as delivered by the backend.
///
/// Either `series` (explicit points) or `rawData` + axis field selectors carry
/// the data. A non-empty `series` always wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartDescriptor {
    pub chart_type: ChartType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<SeriesSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub raw_data: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<AxisField>,
    #[serde(
        deserialize_with = "de_one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub y_axis: Vec<AxisField>,
    pub options: ChartOptions,
    /// Alternative categorical fields the user may switch to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<FieldOption>,
    /// Alternative numeric fields the user may switch to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub measures: Vec<FieldOption>,
}

impl ChartDescriptor {
    pub fn new(chart_type: impl Into<ChartType>) -> Self {
        Self {
            chart_type: chart_type.into(),
            ..Default::default()
        }
    }

    pub fn with_series(mut self, series: SeriesSpec) -> Self {
        self.series.push(series);
        self
    }

    /// Tabular data with the given label (x) and value (y) fields.
    pub fn with_rows(mut self, rows: Vec<Row>, x_field: &str, y_fields: &[&str]) -> Self {
        self.raw_data = rows;
        self.x_axis = Some(AxisField::new(x_field));
        self.y_axis = y_fields.iter().map(|f| AxisField::new(f)).collect();
        self
    }

    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    /// True when the explicit series are authoritative.
    pub fn has_series(&self) -> bool {
        !self.series.is_empty()
    }

    pub fn x_field(&self) -> Option<&str> {
        self.x_axis.as_ref().map(|a| a.field.as_str())
    }

    pub fn y_field(&self, idx: usize) -> Option<&str> {
        self.y_axis.get(idx).map(|a| a.field.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesSpec {
    #[serde(deserialize_with = "de_lenient_label")]
    pub name: String,
    pub data: Vec<DataItem>,
}

impl SeriesSpec {
    pub fn new(name: impl Into<String>, data: Vec<DataItem>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// One `{name, value}` point. Extra keys carry per-chart details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataItem {
    #[serde(deserialize_with = "de_lenient_label")]
    pub name: String,
    /// Missing, null or non-numeric values read as `0`.
    #[serde(deserialize_with = "de_lenient_f64")]
    pub value: f64,
    /// Waterfall point kind. Unknown tags read as `None`.
    #[serde(
        rename = "type",
        deserialize_with = "de_lenient_kind",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<WaterfallKind>,
    /// Funnel percentage override.
    #[serde(deserialize_with = "de_lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    /// Funnel conversion override.
    #[serde(deserialize_with = "de_lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub conversion: Option<f64>,
}

impl DataItem {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: WaterfallKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisField {
    #[serde(default)]
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AxisField {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            name: None,
        }
    }
}

/// A selectable dimension or measure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOption {
    pub field: String,
    pub label: String,
}

/// Per-chart knobs carried inside the descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
    /// Radar grid ring count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<usize>,
    /// Explicit headline scalar (gauge, KPI card, progress).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Comparison scalar for KPI cards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<f64>,
    /// Progress target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Table column order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
}

/// Ascending status thresholds. `red <= yellow <= green` is assumed, never checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub red: f64,
    pub yellow: f64,
    pub green: f64,
}

impl Thresholds {
    pub fn new(red: f64, yellow: f64, green: f64) -> Self {
        Self { red, yellow, green }
    }

    /// 60% / 80% / 100% of `max_value`.
    pub fn default_for(max_value: f64) -> Self {
        Self::new(max_value * 0.6, max_value * 0.8, max_value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterfallKind {
    Increase,
    Decrease,
    Total,
}

impl WaterfallKind {
    /// Case-insensitive tag lookup; anything else is `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "increase" => Some(Self::Increase),
            "decrease" => Some(Self::Decrease),
            "total" => Some(Self::Total),
            _ => None,
        }
    }
}

/// Length-matched label/value pair derived from a descriptor.
///
/// The fields are private so `labels.len() == values.len()` always holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedSeries {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl NormalizedSeries {
    /// Build from independently-sourced arrays, truncating both to the shorter one.
    pub fn from_pairs(mut labels: Vec<String>, mut values: Vec<f64>) -> Self {
        let n = labels.len().min(values.len());
        if labels.len() != values.len() {
            log::debug!(
                "truncating series to {} items (labels={}, values={})",
                n,
                labels.len(),
                values.len()
            );
        }
        labels.truncate(n);
        values.truncate(n);
        Self { labels, values }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Values for size encodings: negative and non-finite become `0`.
    pub fn magnitudes(&self) -> Vec<f64> {
        self.values.iter().map(|v| magnitude(*v)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<f64>) {
        (self.labels, self.values)
    }
}

/// One named value array inside a [`MultiSeries`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NamedValues {
    pub name: String,
    pub values: Vec<f64>,
}

/// Several value arrays sharing one label axis; every array has `labels.len()` items.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MultiSeries {
    labels: Vec<String>,
    series: Vec<NamedValues>,
}

impl MultiSeries {
    /// Truncate the labels and every value array to their common minimum length.
    pub fn new(mut labels: Vec<String>, mut series: Vec<NamedValues>) -> Self {
        let n = series
            .iter()
            .map(|s| s.values.len())
            .fold(labels.len(), usize::min);
        labels.truncate(n);
        for s in &mut series {
            s.values.truncate(n);
        }
        Self { labels, series }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn series(&self) -> &[NamedValues] {
        &self.series
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.series.is_empty()
    }

    /// The `idx`-th array as a plain normalized series.
    pub fn get(&self, idx: usize) -> Option<NormalizedSeries> {
        self.series
            .get(idx)
            .map(|s| NormalizedSeries::from_pairs(self.labels.clone(), s.values.clone()))
    }
}

/// Clamp a value for size-encoding contexts.
#[inline]
pub fn magnitude(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// JavaScript-style `Number(x) || 0` for JSON scalars.
pub fn number_or_zero(v: &Value) -> f64 {
    let n = match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_number_str(s),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

fn parse_number_str(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    t.parse::<f64>().unwrap_or(0.0)
}

/// Stringify a JSON scalar for use as a category label.
pub fn label_of(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Serde helper: accept a number, a numeric string, a bool or null as `f64`.
fn de_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct LenientF64;

    impl<'de> Visitor<'de> for LenientF64 {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a number, a numeric string, a bool or null")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(if v.is_finite() { v } else { 0.0 })
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, s: &str) -> Result<f64, E> {
            let v = parse_number_str(s);
            Ok(if v.is_finite() { v } else { 0.0 })
        }

        fn visit_bool<E: de::Error>(self, b: bool) -> Result<f64, E> {
            Ok(if b { 1.0 } else { 0.0 })
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }
    }

    deserializer.deserialize_any(LenientF64)
}

/// Serde helper: accept any scalar as a label string.
fn de_lenient_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(label_of(&v))
}

/// Serde helper: a waterfall tag in any case; other values are `None`.
fn de_lenient_kind<'de, D>(deserializer: D) -> Result<Option<WaterfallKind>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(v.as_str().and_then(WaterfallKind::parse))
}

/// Serde helper: optional override; null, missing or unparseable text is `None`.
fn de_lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match &v {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Bool(_) => Some(number_or_zero(&v)),
        _ => None,
    })
}

/// Serde helper: `yAxis` may be a single object or an array of objects.
fn de_one_or_many<'de, D>(deserializer: D) -> Result<Vec<AxisField>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(AxisField),
        Many(Vec<AxisField>),
        Nothing(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(a) => vec![a],
        OneOrMany::Many(v) => v,
        OneOrMany::Nothing(()) => Vec::new(),
    })
}
