use kpi_charts::geometry::Tone;
use kpi_charts::models::ChartDescriptor;
use kpi_charts::{ChartRoute, ChartType, ChartView, LayoutParams, dispatch, dispatch_series};

fn descriptor(json: &str) -> ChartDescriptor {
    serde_json::from_str(json).expect("valid descriptor")
}

fn layout() -> LayoutParams {
    LayoutParams::sized(600.0, 400.0)
}

#[test]
fn negative_bar_value_clamps_to_zero_height() {
    let d = descriptor(r#"{"chartType":"bar","series":[{"data":[{"name":"Jan","value":-5}]}]}"#);
    match dispatch(&d, &layout()) {
        ChartView::Bar { bars } => {
            assert_eq!(bars.len(), 1);
            assert_eq!(bars[0].label, "Jan");
            assert_eq!(bars[0].magnitude, 0.0);
            assert_eq!(bars[0].rect.height, 0.0);
        }
        other => panic!("expected bar view, got {other:?}"),
    }
}

#[test]
fn waterfall_running_totals_follow_kinds() {
    let d = descriptor(
        r#"{"chartType":"waterfall","series":[{"data":[
            {"name":"Start","value":1000,"type":"total"},
            {"name":"Sales","value":500,"type":"increase"},
            {"name":"Costs","value":-300,"type":"decrease"},
            {"name":"End","value":1200,"type":"total"}
        ]}]}"#,
    );
    let ChartView::Waterfall(g) = dispatch(&d, &layout()) else {
        panic!("expected waterfall view");
    };
    let totals: Vec<f64> = g.steps.iter().map(|s| s.after).collect();
    assert_eq!(totals, vec![1000.0, 1500.0, 1200.0, 1200.0]);
    assert_eq!(g.bars[2].tone, Tone::Negative);
    // no connector into the closing total
    assert_eq!(g.connectors.len(), 2);
}

#[test]
fn waterfall_kinds_can_come_from_raw_rows() {
    let d = descriptor(
        r#"{"chartType":"waterfall","xAxis":{"field":"step"},"yAxis":{"field":"amount"},
            "rawData":[
                {"step":"Open","amount":"200","type":"total"},
                {"step":"Refunds","amount":-50},
                {"step":"Close","amount":150,"type":"total"}
            ]}"#,
    );
    let ChartView::Waterfall(g) = dispatch(&d, &layout()) else {
        panic!("expected waterfall view");
    };
    let totals: Vec<f64> = g.steps.iter().map(|s| s.after).collect();
    assert_eq!(totals, vec![200.0, 150.0, 150.0]);
}

#[test]
fn funnel_percentages_and_conversions() {
    let d = descriptor(
        r#"{"chartType":"funnel","series":[{"data":[
            {"name":"Visit","value":1000},
            {"name":"Cart","value":750},
            {"name":"Pay","value":400}
        ]}]}"#,
    );
    let ChartView::Funnel { stages } = dispatch(&d, &layout()) else {
        panic!("expected funnel view");
    };
    let pct: Vec<f64> = stages.iter().map(|s| s.percentage).collect();
    assert_eq!(pct, vec![100.0, 75.0, 40.0]);
    assert_eq!(stages[0].conversion, 100.0);
    assert_eq!(stages[1].conversion, 75.0);
    assert!((stages[2].conversion - 53.33).abs() < 0.01);
    // stages taper
    assert!(stages[0].top_width > stages[2].top_width);
}

#[test]
fn funnel_per_stage_overrides_win() {
    let d = descriptor(
        r#"{"chartType":"funnel","series":[{"data":[
            {"name":"A","value":10},
            {"name":"B","value":5,"percentage":42,"conversion":7}
        ]}]}"#,
    );
    let ChartView::Funnel { stages } = dispatch(&d, &layout()) else {
        panic!("expected funnel view");
    };
    assert_eq!(stages[1].percentage, 42.0);
    assert_eq!(stages[1].conversion, 7.0);
}

#[test]
fn item_tags_and_overrides_tolerate_loose_json() {
    let w = descriptor(
        r#"{"chartType":"waterfall","series":[{"data":[
            {"name":"Start","value":100,"type":"Total"},
            {"name":"Up","value":40,"type":"INCREASE"},
            {"name":"End","value":140,"type":"Total"}
        ]}]}"#,
    );
    let ChartView::Waterfall(g) = dispatch(&w, &layout()) else {
        panic!("expected waterfall view");
    };
    let totals: Vec<f64> = g.steps.iter().map(|s| s.after).collect();
    assert_eq!(totals, vec![100.0, 140.0, 140.0]);

    let bar = descriptor(
        r#"{"chartType":"bar","series":[{"data":[
            {"name":"Jan","value":5,"type":"actual"},
            {"name":"Feb","value":8,"type":"forecast"}
        ]}]}"#,
    );
    let ChartView::Bar { bars } = dispatch(&bar, &layout()) else {
        panic!("expected bar view");
    };
    assert_eq!(bars.len(), 2);

    let f = descriptor(
        r#"{"chartType":"funnel","series":[{"data":[
            {"name":"A","value":10},
            {"name":"B","value":5,"percentage":"42","conversion":null}
        ]}]}"#,
    );
    let ChartView::Funnel { stages } = dispatch(&f, &layout()) else {
        panic!("expected funnel view");
    };
    assert_eq!(stages[1].percentage, 42.0);
    assert_eq!(stages[1].conversion, 50.0);
}

#[test]
fn empty_descriptor_renders_empty_state() {
    let d = descriptor(r#"{"chartType":"line","series":[],"rawData":[]}"#);
    let view = dispatch(&d, &layout());
    assert!(view.is_empty());
    assert_eq!(
        view,
        ChartView::Empty {
            chart_type: "line".into()
        }
    );
}

#[test]
fn unknown_types_route_to_unsupported_placeholder() {
    for tag in ["heatmap", "sankey", "candlestick", "wordcloud"] {
        let d = descriptor(&format!(
            r#"{{"chartType":"{tag}","series":[{{"data":[{{"name":"a","value":1}}]}}]}}"#
        ));
        assert_eq!(ChartRoute::for_type(&d.chart_type), ChartRoute::Unsupported);
        let view = dispatch(&d, &layout());
        assert!(view.is_unsupported(), "{tag} should be unsupported");
    }
}

#[test]
fn gauge_uses_options_and_default_thresholds() {
    let d = descriptor(r#"{"chartType":"gauge","options":{"value":150,"maxValue":120}}"#);
    let ChartView::Gauge(g) = dispatch(&d, &layout()) else {
        panic!("expected gauge view");
    };
    assert_eq!(g.percentage, 100.0);
    assert_eq!(g.value_arc.end_angle, 45.0);
    assert_eq!(g.zones.len(), 3);
    assert_eq!(g.status, Tone::Positive);
}

#[test]
fn gauge_without_value_is_empty() {
    let d = descriptor(r#"{"chartType":"gauge"}"#);
    assert!(dispatch(&d, &layout()).is_empty());
}

#[test]
fn budget_comparison_needs_two_series() {
    let one = descriptor(
        r#"{"chartType":"budgetComparison","series":[{"name":"Actual","data":[{"name":"Q1","value":90}]}]}"#,
    );
    assert!(dispatch(&one, &layout()).is_empty());

    let two = descriptor(
        r#"{"chartType":"budget_comparison","series":[
            {"name":"Actual","data":[{"name":"Q1","value":90},{"name":"Q2","value":120}]},
            {"name":"Budget","data":[{"name":"Q1","value":100},{"name":"Q2","value":100}]}
        ]}"#,
    );
    let ChartView::BudgetComparison(g) = dispatch(&two, &layout()) else {
        panic!("expected comparison view");
    };
    assert_eq!(g.max_value, 120.0);
    assert_eq!(g.groups[0].ratio, Some(90.0));
    assert_eq!(g.groups[0].primary_tone, Tone::Warning);
    assert_eq!(g.groups[1].primary_tone, Tone::Positive);
}

#[test]
fn yoy_comparison_from_raw_rows() {
    let d = descriptor(
        r#"{"chartType":"yoyComparison","xAxis":{"field":"month"},
            "yAxis":[{"field":"this_year","name":"2026"},{"field":"last_year","name":"2025"}],
            "rawData":[
                {"month":"Jan","this_year":110,"last_year":100},
                {"month":"Feb","this_year":80,"last_year":100}
            ]}"#,
    );
    let ChartView::YoyComparison(g) = dispatch(&d, &layout()) else {
        panic!("expected yoy view");
    };
    assert_eq!(g.groups[0].ratio, Some(10.0));
    assert_eq!(g.groups[1].ratio, Some(-20.0));
    assert_eq!(g.groups[1].primary_tone, Tone::Negative);
}

#[test]
fn radar_clamps_values_to_max() {
    let d = descriptor(
        r#"{"chartType":"radar","options":{"maxValue":100},"series":[
            {"name":"Team","data":[
                {"name":"Speed","value":150},{"name":"Quality","value":50},{"name":"Cost","value":-10}
            ]}
        ]}"#,
    );
    let ChartView::Radar(g) = dispatch(&d, &layout()) else {
        panic!("expected radar view");
    };
    assert_eq!(g.axes.len(), 3);
    assert_eq!(g.max_value, 100.0);
    let c = LayoutParams::sized(600.0, 400.0).center();
    let pts = &g.datasets[0].points;
    // clamped to max: first vertex sits on the outer ring
    let outer = g.rings.last().expect("rings")[0];
    assert!((pts[0].distance(c) - outer.distance(c)).abs() < 1e-6);
    // negative clamps to the centre
    assert!(pts[2].distance(c) < 1e-6);
}

#[test]
fn series_index_selects_values() {
    let d = descriptor(
        r#"{"chartType":"pie","series":[
            {"data":[{"name":"a","value":1},{"name":"b","value":3}]},
            {"data":[{"name":"x","value":2},{"name":"y","value":2}]}
        ]}"#,
    );
    let ChartView::Pie { slices } = dispatch_series(&d, 1, &layout()) else {
        panic!("expected pie view");
    };
    // labels always come from the first series
    assert_eq!(slices[0].label, "a");
    assert_eq!(slices[0].fraction, 0.5);
    assert!(dispatch_series(&d, 5, &layout()).is_empty());
}

#[test]
fn table_passes_rows_through() {
    let d = descriptor(
        r#"{"chartType":"table","options":{"columns":["region","sales"]},
            "rawData":[{"region":"North","sales":1200,"extra":true},{"region":"South"}]}"#,
    );
    let ChartView::Table(t) = dispatch(&d, &layout()) else {
        panic!("expected table view");
    };
    assert_eq!(t.columns, vec!["region", "sales"]);
    assert_eq!(t.rows[0], vec!["North", "1200"]);
    assert_eq!(t.rows[1], vec!["South", ""]);
}

#[test]
fn kpi_card_and_progress() {
    let d = descriptor(
        r#"{"chartType":"kpiCard","title":"Revenue","options":{"unit":"k"},
            "series":[{"data":[{"name":"Jan","value":100},{"name":"Feb","value":90}]}]}"#,
    );
    let ChartView::KpiCard(k) = dispatch(&d, &layout()) else {
        panic!("expected kpi view");
    };
    assert_eq!(k.label, "Revenue");
    assert_eq!(k.value, 90.0);
    assert_eq!(k.change, Some(-10.0));
    assert_eq!(k.tone, Tone::Negative);

    let p = descriptor(r#"{"chartType":"progress","options":{"value":45,"target":50}}"#);
    let ChartView::Progress(g) = dispatch(&p, &layout()) else {
        panic!("expected progress view");
    };
    assert_eq!(g.percentage, 90.0);
    assert_eq!(g.tone, Tone::Warning);
}

#[test]
fn chart_type_tags_are_lenient() {
    assert_eq!(ChartType::parse("Horizontal-Bar"), ChartType::HorizontalBar);
    assert_eq!(ChartType::parse("kpi_card"), ChartType::KpiCard);
    let d = descriptor(r#"{"chartType":"stackedBar","series":[
        {"name":"a","data":[{"name":"q1","value":1}]},
        {"name":"b","data":[{"name":"q1","value":2}]}
    ]}"#);
    let ChartView::StackedBar { columns } = dispatch(&d, &layout()) else {
        panic!("expected stacked view");
    };
    assert_eq!(columns[0].total, 3.0);
}

#[test]
fn dispatch_is_pure() {
    let d = descriptor(
        r#"{"chartType":"line","series":[{"data":[{"name":"a","value":1},{"name":"b","value":-2}]}]}"#,
    );
    assert_eq!(dispatch(&d, &layout()), dispatch(&d, &layout()));
}
