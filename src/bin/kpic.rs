use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use kpi_charts::models::{ChartDescriptor, NormalizedSeries};
use kpi_charts::viz::RenderOptions;
use kpi_charts::{ChartRoute, LayoutParams, PeriodSelection, dispatch_series, normalize};
use kpi_charts::{stats, storage, viz};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "kpic",
    version,
    about = "Normalize, lay out & preview KPI chart descriptors"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized series and the dispatched geometry as JSON.
    Inspect(InspectArgs),
    /// Render a descriptor file to SVG or PNG.
    Render(RenderArgs),
    /// Build a descriptor from CSV rows and render it.
    RenderCsv(RenderCsvArgs),
    /// Parse a period expression (2026-03, 2026-Q1..Q2, ...) and print its label.
    Period(PeriodArgs),
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// JSON file with layout overrides.
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Canvas width in px (overrides the layout file).
    #[arg(long)]
    width: Option<f64>,
    /// Canvas height in px (overrides the layout file).
    #[arg(long)]
    height: Option<f64>,
    /// Number locale for labels (en, de, fr, zh, ...).
    #[arg(long)]
    locale: Option<String>,
}

impl LayoutArgs {
    fn resolve(&self) -> Result<LayoutParams> {
        let mut layout = match &self.layout {
            Some(path) => LayoutParams::load(path)?,
            None => LayoutParams::default(),
        };
        if let Some(w) = self.width {
            layout.width = w;
        }
        if let Some(h) = self.height {
            layout.height = h;
        }
        if let Some(l) = &self.locale {
            layout.locale = l.clone();
        }
        Ok(layout)
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output image (.svg or .png).
    #[arg(long)]
    out: PathBuf,
    /// Value series to draw for single-series chart types.
    #[arg(long, default_value_t = 0)]
    series_index: usize,
    /// Chart title (defaults to the descriptor's title).
    #[arg(long)]
    title: Option<String>,
    /// Hide value labels.
    #[arg(long, default_value_t = false)]
    no_values: bool,
    /// TTF/OTF font used for labels in PNG output.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Also save the normalized series as CSV.
    #[arg(long)]
    series_csv: Option<PathBuf>,
    /// Print summary statistics of the normalized series to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Descriptor JSON file.
    descriptor: PathBuf,
    #[arg(long, default_value_t = 0)]
    series_index: usize,
    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Descriptor JSON file.
    descriptor: PathBuf,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct RenderCsvArgs {
    /// CSV file with a header row.
    rows: PathBuf,
    /// Chart type tag (bar, line, gauge, funnel, waterfall, ...).
    #[arg(long)]
    chart_type: String,
    /// Category column.
    #[arg(long)]
    x: String,
    /// Value column; repeat for multi-series charts.
    #[arg(long, required = true)]
    y: Vec<String>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct PeriodArgs {
    /// Period expression: YYYY, YYYY-MM, YYYY-Qn, YYYY-MM..MM or YYYY-Qn..Qn.
    expr: String,
    /// Print the parsed selection as JSON as well.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Render(args) => {
            let descriptor = storage::load_descriptor(&args.descriptor)?;
            render(&descriptor, &args.output)
        }
        Command::RenderCsv(args) => cmd_render_csv(args),
        Command::Period(args) => cmd_period(args),
    }
}

fn cmd_inspect(args: InspectArgs) -> Result<()> {
    let descriptor = storage::load_descriptor(&args.descriptor)?;
    let layout = args.layout.resolve()?;
    let series = normalize(&descriptor, args.series_index);
    let view = dispatch_series(&descriptor, args.series_index, &layout);
    let report = serde_json::json!({
        "chartType": descriptor.chart_type,
        "route": ChartRoute::for_type(&descriptor.chart_type),
        "series": series,
        "view": view,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_render_csv(args: RenderCsvArgs) -> Result<()> {
    let rows = storage::load_csv_rows(&args.rows)?;
    let y: Vec<&str> = args.y.iter().map(String::as_str).collect();
    let descriptor = ChartDescriptor::new(args.chart_type.as_str()).with_rows(rows, &args.x, &y);
    render(&descriptor, &args.output)
}

fn cmd_period(args: PeriodArgs) -> Result<()> {
    let selection: PeriodSelection = args.expr.parse()?;
    println!("{selection}");
    if args.json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    }
    Ok(())
}

fn render(descriptor: &ChartDescriptor, out: &OutputArgs) -> Result<()> {
    if let Some(font) = out.font.as_ref() {
        viz::load_label_font(font)?;
    }
    let layout = out.layout.resolve()?;
    let view = dispatch_series(descriptor, out.series_index, &layout);
    if view.is_unsupported() {
        eprintln!(
            "Chart type `{}` is not supported; drawing a placeholder",
            descriptor.chart_type
        );
    }
    let opts = RenderOptions {
        title: out.title.clone().or_else(|| descriptor.title.clone()),
        value_labels: !out.no_values,
        ..Default::default()
    };
    viz::render_view(&view, &layout, &out.out, &opts)?;
    eprintln!("Wrote chart to {}", out.out.display());

    let series = normalize(descriptor, out.series_index);
    if let Some(path) = out.series_csv.as_ref() {
        storage::save_series_csv(&series, path)?;
        eprintln!("Saved {} points to {}", series.len(), path.display());
    }
    if out.stats {
        print_stats(&series);
    }
    Ok(())
}

fn print_stats(series: &NormalizedSeries) {
    let s = stats::summarize(series);
    println!(
        "count={}  min={} max={} mean={} median={} total={}",
        s.count,
        fmt_opt(s.min),
        fmt_opt(s.max),
        fmt_opt(s.mean),
        fmt_opt(s.median),
        fmt_opt(Some(s.total))
    );
}
