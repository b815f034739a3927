use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use crate::filter::FilteredSeries;
use crate::model::price::MaWindow;

fn average_color(window: MaWindow) -> Color {
    match window {
        MaWindow::Ma20 => Color::Green,
        MaWindow::Ma50 => Color::Yellow,
    }
}

/// Row index shown in column `x` when `len` points are squeezed into `width` columns.
fn sample_index(x: usize, width: usize, len: usize) -> usize {
    if len <= width {
        x
    } else {
        (x * len / width).min(len - 1)
    }
}

fn placeholder(block: Block<'_>, area: Rect, buf: &mut Buffer, msg: &str) {
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height > 0 {
        buf.set_string(inner.x, inner.y, msg, Style::default().fg(Color::DarkGray));
    }
}

/// Line chart of the selected price field with moving-average overlays.
pub struct PriceChart<'a> {
    series: Option<&'a FilteredSeries>,
}

impl<'a> PriceChart<'a> {
    pub fn new(series: Option<&'a FilteredSeries>) -> Self {
        Self { series }
    }
}

impl Widget for PriceChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.series {
            Some(s) => format!(" Price Trend ({} {}) ", s.series_id, s.price_field),
            None => " Price Trend ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let Some(series) = self.series.filter(|s| !s.is_empty()) else {
            placeholder(block, area, buf, "no data for this selection");
            return;
        };
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 3 || inner.width < 4 {
            return;
        }

        let prices = series.price_values();
        let overlays: Vec<(MaWindow, Vec<Option<f64>>)> = series
            .windows
            .iter()
            .filter_map(|&w| series.average(w).map(|col| (w, col)))
            .collect();

        let mut min_price = prices.iter().cloned().fold(f64::INFINITY, f64::min);
        let mut max_price = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for v in overlays.iter().flat_map(|(_, col)| col.iter().flatten()) {
            min_price = min_price.min(*v);
            max_price = max_price.max(*v);
        }
        let range = max_price - min_price;
        let range = if range < 1e-9 { 1.0 } else { range };

        // Bottom row is reserved for the date axis.
        let chart_height = inner.height as usize - 1;
        let chart_width = inner.width as usize;
        let columns = chart_width.min(prices.len());
        let y_for = |value: f64| -> u16 {
            let normalized = (value - min_price) / range;
            let offset = ((normalized * (chart_height - 1) as f64).round() as usize).min(chart_height - 1);
            inner.y + (chart_height - 1 - offset) as u16
        };

        for x in 0..columns {
            let i = sample_index(x, chart_width, prices.len());
            let col = inner.x + x as u16;
            for (window, values) in &overlays {
                if let Some(v) = values[i] {
                    buf.set_string(col, y_for(v), "·", Style::default().fg(average_color(*window)));
                }
            }
            buf.set_string(col, y_for(prices[i]), "•", Style::default().fg(Color::Cyan));
        }

        let label_style = Style::default().fg(Color::DarkGray);
        buf.set_string(inner.x, inner.y, format!("{:.2}", max_price), label_style);
        buf.set_string(inner.x, inner.y + chart_height as u16 - 1, format!("{:.2}", min_price), label_style);

        let axis_y = inner.y + inner.height - 1;
        let (first, last) = series.range;
        let last_label = last.format("%Y-%m-%d").to_string();
        buf.set_string(inner.x, axis_y, first.format("%Y-%m-%d").to_string(), label_style);
        if chart_width > 2 * last_label.len() {
            let x = inner.x + (chart_width - last_label.len()) as u16;
            buf.set_string(x, axis_y, &last_label, label_style);
        }

        let mut legend_x = inner.x + inner.width.saturating_sub(1);
        for (window, _) in overlays.iter().rev() {
            let label = format!(" {} ", window.label());
            legend_x = legend_x.saturating_sub(label.len() as u16);
            if legend_x > inner.x {
                buf.set_string(legend_x, inner.y, &label, Style::default().fg(average_color(*window)));
            }
        }
    }
}

/// Bar chart of daily volume, one column per sampled day.
pub struct VolumeChart<'a> {
    series: Option<&'a FilteredSeries>,
}

impl<'a> VolumeChart<'a> {
    pub fn new(series: Option<&'a FilteredSeries>) -> Self {
        Self { series }
    }
}

impl Widget for VolumeChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Volume Analysis ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let Some(series) = self.series.filter(|s| !s.is_empty()) else {
            placeholder(block, area, buf, "no data for this selection");
            return;
        };
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let volumes = series.volumes();
        let max_volume = volumes.iter().copied().max().unwrap_or(0).max(1);
        let height = inner.height as usize;
        let width = inner.width as usize;

        for x in 0..width.min(volumes.len()) {
            let v = volumes[sample_index(x, width, volumes.len())];
            let bar = ((v as f64 / max_volume as f64) * height as f64).ceil() as usize;
            for dy in 0..bar.min(height) {
                let y = inner.y + (height - 1 - dy) as u16;
                buf.set_string(inner.x + x as u16, y, "█", Style::default().fg(Color::Blue));
            }
        }

        buf.set_string(
            inner.x,
            inner.y,
            format!("max {}", max_volume),
            Style::default().fg(Color::DarkGray),
        );
    }
}
