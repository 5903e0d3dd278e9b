//! Period selector: picks the reporting period a dashboard is filtered by.
//!
//! The selector keeps two selections. The committed one is what the dashboard shows;
//! the draft is edited while the picker is open and becomes committed on
//! [`PeriodSelector::confirm`]. Range types are picked with two taps, tracked by
//! [`RangePick`]; the endpoints are stored in ascending order whatever the tap order.
//!
//! ```
//! use kpi_charts::period::{PeriodSelection, PeriodSelector, PeriodType, PeriodValue};
//!
//! let mut selector = PeriodSelector::new(PeriodSelection::new(PeriodType::MonthRange, 2026));
//! selector.open();
//! selector.tap("03");
//! selector.tap("01");
//! let committed = selector.confirm(&mut |_: &PeriodSelection| {});
//! assert_eq!(committed.value, PeriodValue::range("01", "03"));
//! assert_eq!(committed.to_string(), "2026年1月-3月");
//! ```

use crate::error::Error;
use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    Month,
    Quarter,
    Year,
    MonthRange,
    QuarterRange,
    /// Display-only; not offered as a picker tab.
    Custom,
}

impl PeriodType {
    /// Types offered as picker tabs.
    pub const TABS: [PeriodType; 5] = [
        PeriodType::Month,
        PeriodType::Quarter,
        PeriodType::Year,
        PeriodType::MonthRange,
        PeriodType::QuarterRange,
    ];

    pub fn is_range(&self) -> bool {
        matches!(self, PeriodType::MonthRange | PeriodType::QuarterRange)
    }

    /// Value a selection takes right after switching to this type.
    pub fn default_value(&self, year: i32) -> PeriodValue {
        match self {
            PeriodType::Month => PeriodValue::single("01"),
            PeriodType::Quarter => PeriodValue::single("Q1"),
            PeriodType::Year => PeriodValue::Single(year.to_string()),
            PeriodType::MonthRange => PeriodValue::range("01", "12"),
            PeriodType::QuarterRange => PeriodValue::range("Q1", "Q4"),
            PeriodType::Custom => PeriodValue::single(""),
        }
    }

    /// Natural position of a tapped value: month number, quarter index or year.
    /// `None` for values outside the type's domain.
    pub fn rank(&self, value: &str) -> Option<u32> {
        let v = value.trim();
        match self {
            PeriodType::Month | PeriodType::MonthRange => {
                v.parse::<u32>().ok().filter(|m| (1..=12).contains(m))
            }
            PeriodType::Quarter | PeriodType::QuarterRange => v
                .strip_prefix(['Q', 'q'])
                .and_then(|q| q.parse::<u32>().ok())
                .filter(|q| (1..=4).contains(q)),
            PeriodType::Year => v.parse::<u32>().ok(),
            PeriodType::Custom => None,
        }
    }

    /// Stored spelling of a value: months as `01`..`12`, quarters as `Q1`..`Q4`.
    /// Values without a rank come back trimmed.
    pub fn canonical(&self, value: &str) -> String {
        match (self, self.rank(value)) {
            (PeriodType::Month | PeriodType::MonthRange, Some(m)) => format!("{m:02}"),
            (PeriodType::Quarter | PeriodType::QuarterRange, Some(q)) => format!("Q{q}"),
            _ => value.trim().to_string(),
        }
    }

    /// Order two values of this type; values without a rank fall back to text order.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.rank(a), self.rank(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => a.cmp(b),
        }
    }
}

/// A single period (`"03"`, `"Q2"`, `"2026"`) or an ascending `[start, end]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeriodValue {
    Single(String),
    Range(String, String),
}

impl PeriodValue {
    pub fn single(v: &str) -> Self {
        PeriodValue::Single(v.to_string())
    }

    pub fn range(start: &str, end: &str) -> Self {
        PeriodValue::Range(start.to_string(), end.to_string())
    }

    /// `(start, end)`; a single value is its own range.
    pub fn bounds(&self) -> (&str, &str) {
        match self {
            PeriodValue::Single(v) => (v, v),
            PeriodValue::Range(a, b) => (a, b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSelection {
    #[serde(rename = "type")]
    pub period_type: PeriodType,
    pub year: i32,
    pub value: PeriodValue,
    #[serde(default)]
    pub compare_enabled: bool,
}

impl PeriodSelection {
    /// Selection of `period_type` in `year` holding the type's default value.
    pub fn new(period_type: PeriodType, year: i32) -> Self {
        Self {
            period_type,
            year,
            value: period_type.default_value(year),
            compare_enabled: false,
        }
    }

    pub fn with_value(mut self, value: PeriodValue) -> Self {
        self.value = value;
        self
    }
}

impl fmt::Display for PeriodSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_period_display(self))
    }
}

fn month_label(v: &str) -> String {
    match v.trim().parse::<u32>() {
        Ok(m) => m.to_string(),
        Err(_) => v.to_string(),
    }
}

fn quarter_label(v: &str) -> String {
    v.trim().to_ascii_uppercase()
}

/// Human label for a selection, e.g. `2026年1月`, `2026年Q1-Q2`.
pub fn format_period_display(selection: &PeriodSelection) -> String {
    let year = selection.year;
    let (start, end) = selection.value.bounds();
    let single = matches!(selection.value, PeriodValue::Single(_));
    match selection.period_type {
        PeriodType::Month if single => format!("{year}年{}月", month_label(start)),
        PeriodType::Quarter if single => format!("{year}年{}", quarter_label(start)),
        PeriodType::Year => {
            let shown = start.trim().parse::<i32>().unwrap_or(year);
            format!("{shown}年")
        }
        PeriodType::Month | PeriodType::MonthRange => {
            format!("{year}年{}月-{}月", month_label(start), month_label(end))
        }
        PeriodType::Quarter | PeriodType::QuarterRange => {
            format!("{year}年{}-{}", quarter_label(start), quarter_label(end))
        }
        PeriodType::Custom if single => start.to_string(),
        PeriodType::Custom => format!("{start} - {end}"),
    }
}

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})$").expect("valid period regex"));
static MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})(?:\.\.(\d{1,2}))?$").expect("valid period regex"));
static QUARTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-[Qq]([1-4])(?:\.\.[Qq]?([1-4]))?$").expect("valid period regex"));

fn sorted(period_type: PeriodType, a: String, b: String) -> PeriodValue {
    if period_type.compare(&a, &b) == Ordering::Greater {
        PeriodValue::Range(b, a)
    } else {
        PeriodValue::Range(a, b)
    }
}

impl FromStr for PeriodSelection {
    type Err = Error;

    /// Parses `2026`, `2026-03`, `2026-Q1`, `2026-01..03` and `2026-Q1..Q2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || Error::InvalidPeriod(s.to_string());
        let year_of = |m: &str| m.parse::<i32>().map_err(|_| invalid());

        if let Some(caps) = YEAR_RE.captures(s) {
            let year = year_of(&caps[1])?;
            return Ok(PeriodSelection::new(PeriodType::Year, year));
        }

        if let Some(caps) = MONTH_RE.captures(s) {
            let year = year_of(&caps[1])?;
            let month = |i: usize| -> Result<String, Error> {
                let m = caps[i].parse::<u32>().map_err(|_| invalid())?;
                if (1..=12).contains(&m) {
                    Ok(format!("{m:02}"))
                } else {
                    Err(invalid())
                }
            };
            let start = month(2)?;
            return Ok(match caps.get(3) {
                None => PeriodSelection::new(PeriodType::Month, year)
                    .with_value(PeriodValue::Single(start)),
                Some(_) => PeriodSelection::new(PeriodType::MonthRange, year)
                    .with_value(sorted(PeriodType::MonthRange, start, month(3)?)),
            });
        }

        if let Some(caps) = QUARTER_RE.captures(s) {
            let year = year_of(&caps[1])?;
            let start = format!("Q{}", &caps[2]);
            return Ok(match caps.get(3) {
                None => PeriodSelection::new(PeriodType::Quarter, year)
                    .with_value(PeriodValue::Single(start)),
                Some(end) => PeriodSelection::new(PeriodType::QuarterRange, year).with_value(
                    sorted(PeriodType::QuarterRange, start, format!("Q{}", end.as_str())),
                ),
            });
        }

        Err(invalid())
    }
}

/// Shortcut periods relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickOption {
    ThisMonth,
    LastMonth,
    ThisQuarter,
    LastQuarter,
    ThisYear,
    LastYear,
    YearToDate,
}

impl QuickOption {
    pub const ALL: [QuickOption; 7] = [
        QuickOption::ThisMonth,
        QuickOption::LastMonth,
        QuickOption::ThisQuarter,
        QuickOption::LastQuarter,
        QuickOption::ThisYear,
        QuickOption::LastYear,
        QuickOption::YearToDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QuickOption::ThisMonth => "本月",
            QuickOption::LastMonth => "上月",
            QuickOption::ThisQuarter => "本季度",
            QuickOption::LastQuarter => "上季度",
            QuickOption::ThisYear => "本年",
            QuickOption::LastYear => "去年",
            QuickOption::YearToDate => "年初至今",
        }
    }

    /// Type, year and value this option selects on `today`.
    pub fn resolve(&self, today: NaiveDate) -> (PeriodType, i32, PeriodValue) {
        let year = today.year();
        let month = today.month();
        let quarter = (month - 1) / 3 + 1;
        match self {
            QuickOption::ThisMonth => (
                PeriodType::Month,
                year,
                PeriodValue::Single(format!("{month:02}")),
            ),
            QuickOption::LastMonth => {
                let (y, m) = if month == 1 { (year - 1, 12) } else { (year, month - 1) };
                (PeriodType::Month, y, PeriodValue::Single(format!("{m:02}")))
            }
            QuickOption::ThisQuarter => (
                PeriodType::Quarter,
                year,
                PeriodValue::Single(format!("Q{quarter}")),
            ),
            QuickOption::LastQuarter => {
                let (y, q) = if quarter == 1 { (year - 1, 4) } else { (year, quarter - 1) };
                (PeriodType::Quarter, y, PeriodValue::Single(format!("Q{q}")))
            }
            QuickOption::ThisYear => (PeriodType::Year, year, PeriodValue::Single(year.to_string())),
            QuickOption::LastYear => (
                PeriodType::Year,
                year - 1,
                PeriodValue::Single((year - 1).to_string()),
            ),
            QuickOption::YearToDate => (
                PeriodType::MonthRange,
                year,
                PeriodValue::Range("01".to_string(), format!("{month:02}")),
            ),
        }
    }
}

/// In-progress two-tap range pick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RangePick {
    #[default]
    Idle,
    AwaitingSecondTap(String),
}

/// Receives the selection on confirm.
pub trait PeriodChangeSink {
    fn on_change(&mut self, selection: &PeriodSelection);
}

impl<F> PeriodChangeSink for F
where
    F: FnMut(&PeriodSelection),
{
    fn on_change(&mut self, selection: &PeriodSelection) {
        self(selection)
    }
}

#[derive(Debug, Clone)]
pub struct PeriodSelector {
    committed: PeriodSelection,
    draft: PeriodSelection,
    pick: RangePick,
    open: bool,
}

impl PeriodSelector {
    pub fn new(initial: PeriodSelection) -> Self {
        Self {
            draft: initial.clone(),
            committed: initial,
            pick: RangePick::Idle,
            open: false,
        }
    }

    pub fn committed(&self) -> &PeriodSelection {
        &self.committed
    }

    pub fn draft(&self) -> &PeriodSelection {
        &self.draft
    }

    pub fn pick(&self) -> &RangePick {
        &self.pick
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Label of the committed selection.
    pub fn display(&self) -> String {
        format_period_display(&self.committed)
    }

    /// Open the picker with a fresh draft of the committed selection.
    pub fn open(&mut self) {
        self.draft = self.committed.clone();
        self.pick = RangePick::Idle;
        self.open = true;
    }

    /// Switch the draft's type; the value resets to the type's default.
    pub fn set_type(&mut self, period_type: PeriodType) {
        self.pick = RangePick::Idle;
        if self.draft.period_type == period_type {
            return;
        }
        self.draft.period_type = period_type;
        self.draft.value = period_type.default_value(self.draft.year);
    }

    pub fn set_year(&mut self, year: i32) {
        self.draft.year = year;
        if self.draft.period_type == PeriodType::Year {
            self.draft.value = PeriodValue::Single(year.to_string());
        }
    }

    pub fn toggle_compare(&mut self) {
        self.draft.compare_enabled = !self.draft.compare_enabled;
    }

    pub fn apply_quick_option(&mut self, option: QuickOption, today: NaiveDate) {
        let (period_type, year, value) = option.resolve(today);
        self.draft.period_type = period_type;
        self.draft.year = year;
        self.draft.value = value;
        self.pick = RangePick::Idle;
    }

    pub fn apply_quick_option_today(&mut self, option: QuickOption) {
        self.apply_quick_option(option, Local::now().date_naive());
    }

    /// Tap a cell of the picker grid.
    ///
    /// Single types take the value at once. Range types need two taps: the first is
    /// remembered, the second stores `[min, max]` and returns the pick to idle.
    pub fn tap(&mut self, value: &str) {
        let period_type = self.draft.period_type;
        if period_type != PeriodType::Custom && period_type.rank(value).is_none() {
            log::debug!("ignoring tap `{}` for {period_type:?}", value.trim());
            return;
        }
        let value = period_type.canonical(value);

        if !period_type.is_range() {
            if period_type == PeriodType::Year {
                if let Ok(year) = value.parse::<i32>() {
                    self.draft.year = year;
                }
            }
            self.draft.value = PeriodValue::Single(value);
            return;
        }

        self.pick = match std::mem::take(&mut self.pick) {
            RangePick::Idle => RangePick::AwaitingSecondTap(value),
            RangePick::AwaitingSecondTap(start) => {
                self.draft.value = sorted(period_type, start, value);
                RangePick::Idle
            }
        };
    }

    /// Commit the draft, close the picker and notify `sink`.
    pub fn confirm<S: PeriodChangeSink + ?Sized>(&mut self, sink: &mut S) -> PeriodSelection {
        self.committed = self.draft.clone();
        self.pick = RangePick::Idle;
        self.open = false;
        log::debug!("period confirmed: {}", self.committed);
        sink.on_change(&self.committed);
        self.committed.clone()
    }

    /// Drop the draft and close the picker.
    pub fn cancel(&mut self) {
        self.draft = self.committed.clone();
        self.pick = RangePick::Idle;
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn quarter_rank_ignores_case() {
        assert_eq!(PeriodType::Quarter.rank("q3"), Some(3));
        assert_eq!(PeriodType::Quarter.rank("Q5"), None);
        assert_eq!(PeriodType::Month.rank("13"), None);
    }

    #[test]
    fn last_month_in_january_wraps_year() {
        let (t, y, v) = QuickOption::LastMonth.resolve(date(2026, 1, 15));
        assert_eq!((t, y, v), (PeriodType::Month, 2025, PeriodValue::single("12")));
        let (t, y, v) = QuickOption::LastQuarter.resolve(date(2026, 2, 1));
        assert_eq!((t, y, v), (PeriodType::Quarter, 2025, PeriodValue::single("Q4")));
    }

    #[test]
    fn quarter_range_sorts_by_index() {
        let mut s = PeriodSelector::new(PeriodSelection::new(PeriodType::QuarterRange, 2026));
        s.open();
        s.tap("Q4");
        assert_eq!(s.pick(), &RangePick::AwaitingSecondTap("Q4".into()));
        s.tap("Q2");
        assert_eq!(s.draft().value, PeriodValue::range("Q2", "Q4"));
        assert_eq!(s.pick(), &RangePick::Idle);
    }

    #[test]
    fn month_display_drops_leading_zero() {
        let sel = PeriodSelection::new(PeriodType::Month, 2026);
        assert_eq!(format_period_display(&sel), "2026年1月");
    }
}
