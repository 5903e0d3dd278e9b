use chrono::NaiveDate;
use kpi_charts::period::{PeriodType, PeriodValue, QuickOption, RangePick};
use kpi_charts::{Error, PeriodSelection, PeriodSelector, format_period_display};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn month_range_two_taps_then_confirm() {
    let mut selector = PeriodSelector::new(PeriodSelection::new(PeriodType::Month, 2026));
    selector.open();
    selector.set_type(PeriodType::MonthRange);
    assert_eq!(selector.draft().value, PeriodValue::range("01", "12"));

    selector.tap("03");
    assert_eq!(selector.pick(), &RangePick::AwaitingSecondTap("03".into()));
    selector.tap("01");
    assert_eq!(selector.pick(), &RangePick::Idle);
    assert_eq!(selector.draft().value, PeriodValue::range("01", "03"));

    let mut seen: Vec<PeriodSelection> = Vec::new();
    let committed = selector.confirm(&mut |s: &PeriodSelection| seen.push(s.clone()));
    assert_eq!(seen, vec![committed.clone()]);
    assert!(!selector.is_open());
    assert_eq!(selector.display(), "2026年1月-3月");
    assert_eq!(format_period_display(&committed), "2026年1月-3月");
}

#[test]
fn switching_type_resets_value_and_pending_pick() {
    let mut selector = PeriodSelector::new(PeriodSelection::new(PeriodType::QuarterRange, 2026));
    selector.open();
    selector.tap("Q3");
    selector.set_type(PeriodType::Quarter);
    assert_eq!(selector.pick(), &RangePick::Idle);
    assert_eq!(selector.draft().value, PeriodValue::single("Q1"));

    selector.set_type(PeriodType::Year);
    assert_eq!(selector.draft().value, PeriodValue::single("2026"));
}

#[test]
fn cancel_restores_the_committed_selection() {
    let initial = PeriodSelection::new(PeriodType::Month, 2026).with_value(PeriodValue::single("05"));
    let mut selector = PeriodSelector::new(initial.clone());
    selector.open();
    selector.set_type(PeriodType::Quarter);
    selector.tap("Q2");
    selector.set_year(2024);
    selector.cancel();
    assert_eq!(selector.committed(), &initial);
    assert_eq!(selector.draft(), &initial);
    assert!(!selector.is_open());
}

#[test]
fn invalid_taps_are_ignored() {
    let mut selector = PeriodSelector::new(PeriodSelection::new(PeriodType::Month, 2026));
    selector.open();
    selector.tap("13");
    selector.tap("Q1");
    assert_eq!(selector.draft().value, PeriodValue::single("01"));

    selector.set_type(PeriodType::MonthRange);
    selector.tap("abc");
    assert_eq!(selector.pick(), &RangePick::Idle);
}

#[test]
fn taps_are_stored_in_canonical_spelling() {
    let mut selector = PeriodSelector::new(PeriodSelection::new(PeriodType::Month, 2026));
    selector.open();
    selector.tap(" 3 ");
    assert_eq!(selector.draft().value, PeriodValue::single("03"));

    selector.set_type(PeriodType::Quarter);
    selector.tap("q2");
    assert_eq!(selector.draft().value, PeriodValue::single("Q2"));

    selector.set_type(PeriodType::MonthRange);
    selector.tap("9");
    assert_eq!(selector.pick(), &RangePick::AwaitingSecondTap("09".into()));
    selector.tap("10");
    assert_eq!(selector.draft().value, PeriodValue::range("09", "10"));
}

fn confirmed_range(period_type: PeriodType, first: &str, second: &str) -> (String, String) {
    let mut selector = PeriodSelector::new(PeriodSelection::new(PeriodType::Year, 2026));
    selector.open();
    selector.set_type(period_type);
    selector.tap(first);
    selector.tap(second);
    match selector.confirm(&mut |_: &PeriodSelection| {}).value {
        PeriodValue::Range(start, end) => (start, end),
        other => panic!("expected a range, got {other:?}"),
    }
}

#[test]
fn confirmed_ranges_are_ordered_for_every_pair() {
    for a in 1..=12u32 {
        for b in 1..=12u32 {
            for (first, second) in [(a.to_string(), format!("{b:02}")), (format!("{a:02}"), b.to_string())] {
                let (start, end) = confirmed_range(PeriodType::MonthRange, &first, &second);
                let t = PeriodType::MonthRange;
                assert!(t.rank(&start) <= t.rank(&end), "{first}..{second} -> {start}..{end}");
                assert_eq!((start, end), (format!("{:02}", a.min(b)), format!("{:02}", a.max(b))));
            }
        }
    }

    for a in 1..=4u32 {
        for b in 1..=4u32 {
            for (first, second) in [(format!("q{a}"), format!("Q{b}")), (format!("Q{a}"), format!("q{b}"))] {
                let (start, end) = confirmed_range(PeriodType::QuarterRange, &first, &second);
                let t = PeriodType::QuarterRange;
                assert!(t.rank(&start) <= t.rank(&end), "{first}..{second} -> {start}..{end}");
                assert_eq!((start, end), (format!("Q{}", a.min(b)), format!("Q{}", a.max(b))));
            }
        }
    }
}

#[test]
fn year_tap_moves_the_year() {
    let mut selector = PeriodSelector::new(PeriodSelection::new(PeriodType::Year, 2026));
    selector.open();
    selector.tap("2023");
    assert_eq!(selector.draft().year, 2023);
    selector.confirm(&mut |_: &PeriodSelection| {});
    assert_eq!(selector.display(), "2023年");
}

#[test]
fn compare_flag_travels_with_confirm() {
    let mut selector = PeriodSelector::new(PeriodSelection::new(PeriodType::Quarter, 2026));
    selector.open();
    selector.toggle_compare();
    let committed = selector.confirm(&mut |_: &PeriodSelection| {});
    assert!(committed.compare_enabled);
}

#[test]
fn display_strings() {
    let cases = [
        (PeriodType::Month, PeriodValue::single("11"), "2026年11月"),
        (PeriodType::Quarter, PeriodValue::single("Q3"), "2026年Q3"),
        (PeriodType::Year, PeriodValue::single("2026"), "2026年"),
        (PeriodType::MonthRange, PeriodValue::range("02", "06"), "2026年2月-6月"),
        (PeriodType::QuarterRange, PeriodValue::range("Q1", "Q2"), "2026年Q1-Q2"),
        (PeriodType::Custom, PeriodValue::single("FY26 H1"), "FY26 H1"),
    ];
    for (t, v, expected) in cases {
        let sel = PeriodSelection::new(t, 2026).with_value(v);
        assert_eq!(sel.to_string(), expected);
    }
}

#[test]
fn period_expressions_parse() {
    let sel: PeriodSelection = "2026-Q2..Q1".parse().unwrap();
    assert_eq!(sel.period_type, PeriodType::QuarterRange);
    assert_eq!(sel.value, PeriodValue::range("Q1", "Q2"));

    let sel: PeriodSelection = "2026-3".parse().unwrap();
    assert_eq!(sel.value, PeriodValue::single("03"));
    assert_eq!(sel.to_string(), "2026年3月");

    let sel: PeriodSelection = "2025".parse().unwrap();
    assert_eq!(sel.period_type, PeriodType::Year);
    assert_eq!(sel.year, 2025);

    for bad in ["", "26", "2026-13", "2026-Q5", "2026-01..Q2", "last week"] {
        let err = bad.parse::<PeriodSelection>().unwrap_err();
        assert!(matches!(err, Error::InvalidPeriod(_)), "{bad}");
    }
}

#[test]
fn quick_options_edit_the_draft_only() {
    let mut selector = PeriodSelector::new(PeriodSelection::new(PeriodType::Month, 2026));
    selector.open();
    selector.apply_quick_option(QuickOption::YearToDate, day(2026, 4, 20));
    assert_eq!(selector.draft().period_type, PeriodType::MonthRange);
    assert_eq!(selector.draft().value, PeriodValue::range("01", "04"));
    assert_eq!(selector.committed().period_type, PeriodType::Month);

    selector.apply_quick_option(QuickOption::LastYear, day(2026, 4, 20));
    let committed = selector.confirm(&mut |_: &PeriodSelection| {});
    assert_eq!(committed.year, 2025);
    assert_eq!(committed.to_string(), "2025年");
}

#[test]
fn every_quick_option_has_a_label_and_a_valid_value() {
    let today = day(2026, 10, 17);
    for option in QuickOption::ALL {
        assert!(!option.label().is_empty());
        let (t, _, value) = option.resolve(today);
        let (a, b) = value.bounds();
        assert!(t.rank(a).is_some() && t.rank(b).is_some(), "{option:?}");
    }
}

#[test]
fn selection_json_shape() {
    let sel = PeriodSelection::new(PeriodType::QuarterRange, 2026);
    let json = serde_json::to_value(&sel).unwrap();
    assert_eq!(json["type"], "quarter_range");
    assert_eq!(json["value"], serde_json::json!(["Q1", "Q4"]));
    assert_eq!(json["compareEnabled"], false);
    let back: PeriodSelection = serde_json::from_value(json).unwrap();
    assert_eq!(back, sel);
}
