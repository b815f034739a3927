use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::filter::FilteredSeries;
use crate::model::price::{MaWindow, PriceField};
use crate::summary::SummaryMetrics;

fn change_color(val: f64) -> Color {
    if val > 0.0 {
        Color::Green
    } else if val < 0.0 {
        Color::Red
    } else {
        Color::White
    }
}

/// The four headline tiles: latest close, day high, day low, change %.
pub struct MetricsPanel<'a> {
    summary: Option<&'a SummaryMetrics>,
}

impl<'a> MetricsPanel<'a> {
    pub fn new(summary: Option<&'a SummaryMetrics>) -> Self {
        Self { summary }
    }
}

impl Widget for MetricsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let tiles = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        let placeholder = "---".to_string();
        let (close, high, low, change, change_fg) = match self.summary {
            Some(s) => (
                s.latest_close_label(),
                s.day_high_label(),
                s.day_low_label(),
                s.percent_change_label(),
                change_color(s.percent_change),
            ),
            None => (
                placeholder.clone(),
                placeholder.clone(),
                placeholder.clone(),
                placeholder,
                Color::DarkGray,
            ),
        };

        let entries = [
            ("Latest Close", close, Color::White),
            ("Day High", high, Color::Green),
            ("Day Low", low, Color::Red),
            ("Change %", change, change_fg),
        ];
        for ((title, value, fg), tile) in entries.into_iter().zip(tiles.iter()) {
            let block = Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray));
            Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().fg(fg).add_modifier(Modifier::BOLD),
            )))
            .block(block)
            .render(*tile, buf);
        }
    }
}

pub struct StatusBar<'a> {
    pub series_id: &'a str,
    pub series_count: usize,
    pub series_position: usize,
    pub price_field: PriceField,
    pub averages: Vec<MaWindow>,
    pub range: (chrono::NaiveDate, chrono::NaiveDate),
    pub rows: usize,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let averages = if self.averages.is_empty() {
            "no MA".to_string()
        } else {
            self.averages
                .iter()
                .map(|w| w.label())
                .collect::<Vec<_>>()
                .join("+")
        };

        let line = Line::from(vec![
            Span::styled(
                " stock-dashboard ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            sep(),
            Span::styled(self.series_id, Style::default().fg(Color::Cyan)),
            Span::styled(
                format!(" ({}/{})", self.series_position + 1, self.series_count),
                Style::default().fg(Color::DarkGray),
            ),
            sep(),
            Span::styled(self.price_field.label(), Style::default().fg(Color::White)),
            sep(),
            Span::styled(averages, Style::default().fg(Color::Yellow)),
            sep(),
            Span::styled(
                format!("{} .. {}", self.range.0, self.range.1),
                Style::default().fg(Color::White),
            ),
            sep(),
            Span::styled(
                format!("rows: {}", self.rows),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Scrollable view of the filtered rows.
pub struct DataTablePanel<'a> {
    series: Option<&'a FilteredSeries>,
    scroll: usize,
}

impl<'a> DataTablePanel<'a> {
    pub fn new(series: Option<&'a FilteredSeries>, scroll: usize) -> Self {
        Self { series, scroll }
    }
}

impl Widget for DataTablePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Raw Data ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let Some(series) = self.series else {
            Paragraph::new("no data for this selection")
                .block(block)
                .render(area, buf);
            return;
        };

        let mut header = format!(
            "{:<10} {:>10} {:>10} {:>10} {:>10} {:>12}",
            "Date", "Open", "High", "Low", "Close", "Volume"
        );
        for w in &series.windows {
            header.push_str(&format!(" {:>10}", w.label()));
        }

        let visible = (area.height as usize).saturating_sub(3);
        let mut lines = vec![Line::from(Span::styled(
            header,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ))];
        for row in series.rows.iter().skip(self.scroll).take(visible) {
            let r = &row.record;
            let mut text = format!(
                "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12}",
                r.date.format("%Y-%m-%d"),
                r.open,
                r.high,
                r.low,
                r.close,
                r.volume
            );
            for w in &series.windows {
                match row.average(*w) {
                    Some(v) => text.push_str(&format!(" {:>10.2}", v)),
                    None => text.push_str(&format!(" {:>10}", "-")),
                }
            }
            lines.push(Line::from(text));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
    status: Option<&'a str>,
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String], status: Option<&'a str>) -> Self {
        Self { messages, status }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" System Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner_height = area.height.saturating_sub(2) as usize;

        let mut lines: Vec<Line> = Vec::new();
        if let Some(status) = self.status {
            lines.push(Line::from(Span::styled(
                status.to_string(),
                Style::default().fg(Color::Red),
            )));
        }
        let remaining = inner_height.saturating_sub(lines.len());
        let start = self.messages.len().saturating_sub(remaining);
        for msg in &self.messages[start..] {
            let color = if msg.starts_with("[ERR]") {
                Color::Red
            } else if msg.starts_with("[WARN]") {
                Color::Yellow
            } else {
                Color::Gray
            };
            lines.push(Line::from(Span::styled(msg.clone(), Style::default().fg(color))));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
        let label = |l: &'static str| Span::styled(l, Style::default().fg(Color::DarkGray));
        let line = Line::from(vec![
            key(" [Q]"),
            label("uit  "),
            key("[←/→]"),
            label("stock  "),
            key("[P]"),
            label("rice type  "),
            key("[2]"),
            label("MA20  "),
            key("[5]"),
            label("MA50  "),
            key("[ ]"),
            label("start  "),
            key("{ }"),
            label("end  "),
            key("[R]"),
            label("eset  "),
            key("[E]"),
            label("xport  "),
            key("[T]"),
            label("able"),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
