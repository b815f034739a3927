//! Static PNG charts of a filtered series, one for price and one for volume.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::error::AppError;
use crate::filter::FilteredSeries;
use crate::model::price::MaWindow;

const PRICE_SIZE: (u32, u32) = (1400, 500);
const VOLUME_SIZE: (u32, u32) = (1400, 400);

fn render_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Render(e.to_string())
}

fn average_color(window: MaWindow) -> RGBColor {
    match window {
        MaWindow::Ma20 => GREEN,
        MaWindow::Ma50 => RGBColor(230, 140, 0),
    }
}

/// Writes `{series}_price.png` and `{series}_volume.png` into `dir`.
pub fn render_series_png(series: &FilteredSeries, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    if series.is_empty() {
        return Err(AppError::EmptySeries(series.series_id.clone()));
    }
    let price_path = dir.join(format!("{}_price.png", series.series_id));
    let volume_path = dir.join(format!("{}_volume.png", series.series_id));
    render_price(series, &price_path)?;
    render_volume(series, &volume_path)?;
    tracing::info!(
        series = %series.series_id,
        price = %price_path.display(),
        volume = %volume_path.display(),
        "Rendered PNG charts"
    );
    Ok(vec![price_path, volume_path])
}

fn render_price(series: &FilteredSeries, path: &Path) -> Result<(), AppError> {
    let dates = series.dates();
    let prices = series.price_values();
    let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max - min) * 0.05).max(0.01);

    let root = BitMapBackend::new(path, PRICE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} {} price trend", series.series_id, series.price_field),
            ("sans-serif", 24),
        )
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0usize..dates.len(), (min - pad)..(max + pad))
        .map_err(render_err)?;

    let date_label = |i: &usize| {
        dates
            .get(*i)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&date_label)
        .x_desc("Date")
        .y_desc("Price")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            prices.iter().enumerate().map(|(i, v)| (i, *v)),
            &BLUE,
        ))
        .map_err(render_err)?
        .label(series.price_field.label())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    for window in &series.windows {
        let Some(column) = series.average(*window) else {
            continue;
        };
        let color = average_color(*window);
        chart
            .draw_series(LineSeries::new(
                column
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|v| (i, v))),
                &color,
            ))
            .map_err(render_err)?
            .label(window.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(render_err)?;
    root.present().map_err(render_err)?;
    Ok(())
}

fn render_volume(series: &FilteredSeries, path: &Path) -> Result<(), AppError> {
    let dates = series.dates();
    let volumes = series.volumes();
    let max = volumes.iter().copied().max().unwrap_or(0).max(1);

    let root = BitMapBackend::new(path, VOLUME_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} volume", series.series_id), ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(0usize..volumes.len(), 0u64..max + max / 20)
        .map_err(render_err)?;

    let date_label = |i: &usize| {
        dates
            .get(*i)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&date_label)
        .x_desc("Date")
        .y_desc("Volume")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(
            volumes
                .iter()
                .enumerate()
                .map(|(i, v)| Rectangle::new([(i, 0), (i + 1, *v)], BLUE.mix(0.7).filled())),
        )
        .map_err(render_err)?;
    root.present().map_err(render_err)?;
    Ok(())
}
