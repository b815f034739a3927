//! Headless export: filter one stock and write `{stock}_data.csv` without the TUI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;

use crate::config::Config;
use crate::data::{export_series, load_price_table};
use crate::filter::{FilterRequest, TimeSeriesFilter};
use crate::model::price::{parse_date, MaWindow, PriceField};
use crate::summary::latest_vs_previous;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportArgs {
    pub series_id: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub field: Option<PriceField>,
    pub averages: Vec<MaWindow>,
    pub data: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub json: bool,
    pub png: bool,
}

pub fn run_cli(args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        None | Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some(_) => {
            let parsed = parse_export_args(args)?;
            run_export(&parsed)
        }
    }
}

pub fn parse_export_args(args: &[String]) -> Result<ExportArgs> {
    let mut iter = args.iter();
    let series_id = iter
        .next()
        .filter(|s| !s.starts_with("--"))
        .ok_or_else(|| anyhow!("first argument must be a stock id"))?
        .clone();

    let mut parsed = ExportArgs {
        series_id,
        from: None,
        to: None,
        field: None,
        averages: Vec::new(),
        data: None,
        out: None,
        json: false,
        png: false,
    };

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--json" => {
                parsed.json = true;
                continue;
            }
            "--png" => {
                parsed.png = true;
                continue;
            }
            _ => {}
        }
        let value = iter
            .next()
            .ok_or_else(|| anyhow!("`{}` requires a value", flag))?;
        match flag.as_str() {
            "--from" => parsed.from = Some(parse_cli_date(value)?),
            "--to" => parsed.to = Some(parse_cli_date(value)?),
            "--field" => {
                parsed.field = Some(value.parse::<PriceField>().map_err(anyhow::Error::msg)?)
            }
            "--ma" => {
                let period: usize = value
                    .parse()
                    .with_context(|| format!("invalid --ma value '{}'", value))?;
                let window = MaWindow::from_period(period)
                    .ok_or_else(|| anyhow!("unsupported --ma {}, expected 20 or 50", period))?;
                if !parsed.averages.contains(&window) {
                    parsed.averages.push(window);
                }
            }
            "--data" => parsed.data = Some(PathBuf::from(value)),
            "--out" => parsed.out = Some(PathBuf::from(value)),
            other => bail!("unknown option '{}'", other),
        }
    }

    Ok(parsed)
}

fn parse_cli_date(value: &str) -> Result<NaiveDate> {
    parse_date(value).ok_or_else(|| anyhow!("invalid date '{}', expected YYYY-MM-DD", value))
}

fn run_export(args: &ExportArgs) -> Result<()> {
    // An explicit --data makes the config file optional.
    let config = match Config::load() {
        Ok(c) => Some(c),
        Err(e) if args.data.is_some() => {
            tracing::debug!(error = %format!("{:#}", e), "Config not loaded, using CLI values");
            None
        }
        Err(e) => return Err(e),
    };

    let data_path = args
        .data
        .clone()
        .or_else(|| config.as_ref().map(|c| c.data.path.clone()))
        .ok_or_else(|| anyhow!("no data path configured"))?;
    let out_dir = args
        .out
        .clone()
        .or_else(|| config.as_ref().map(|c| c.data.export_dir.clone()))
        .unwrap_or_else(|| PathBuf::from("."));
    let field = match args.field {
        Some(f) => f,
        None => config
            .as_ref()
            .map(|c| c.ui.price_field())
            .transpose()?
            .unwrap_or(PriceField::Close),
    };

    let table = load_price_table(&data_path)
        .with_context(|| format!("failed to load {}", data_path.display()))?;
    let filter = TimeSeriesFilter::new(Arc::new(table));

    let mut request = FilterRequest::full_span(filter.table(), &args.series_id, field)?;
    if let Some(from) = args.from {
        request.date_start = from;
    }
    if let Some(to) = args.to {
        request.date_end = to;
    }
    for window in &args.averages {
        request = request.with_average(*window);
    }

    let series = filter.filter(&request)?;
    let summary = latest_vs_previous(&series)?;
    let path = export_series(&series, &out_dir)?;
    let charts = if args.png {
        render_charts(&series, &out_dir)?
    } else {
        Vec::new()
    };

    if args.json {
        let payload = serde_json::json!({
            "series": series.series_id,
            "from": series.range.0,
            "to": series.range.1,
            "rows": series.len(),
            "summary": summary,
            "path": path.display().to_string(),
            "charts": charts.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!(
            "{} {}..{} ({} rows) close {} high {} low {} change {}",
            series.series_id,
            series.range.0,
            series.range.1,
            series.len(),
            summary.latest_close_label(),
            summary.day_high_label(),
            summary.day_low_label(),
            summary.percent_change_label(),
        );
        println!("wrote {}", path.display());
        for chart in &charts {
            println!("wrote {}", chart.display());
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn render_charts(series: &crate::filter::FilteredSeries, dir: &std::path::Path) -> Result<Vec<PathBuf>> {
    Ok(crate::chart_png::render_series_png(series, dir)?)
}

#[cfg(not(feature = "png"))]
fn render_charts(_series: &crate::filter::FilteredSeries, _dir: &std::path::Path) -> Result<Vec<PathBuf>> {
    bail!("--png requires building with `--features png`")
}

fn print_usage() {
    println!("stock-export <STOCK> [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--field Open|High|Low|Close]");
    println!("             [--ma 20] [--ma 50] [--data PATH] [--out DIR] [--json] [--png]");
    println!();
    println!("Writes <STOCK>_data.csv with the filtered rows and requested moving averages.");
    println!("Defaults come from config/default.toml.");
}
