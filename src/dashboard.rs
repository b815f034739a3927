use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use crate::data::export_series;
use crate::error::AppError;
use crate::filter::{FilterRequest, FilteredSeries, TimeSeriesFilter};
use crate::input::UiCommand;
use crate::model::price::{MaWindow, PriceField};
use crate::model::table::PriceTable;
use crate::summary::{latest_vs_previous, SummaryMetrics};

const MAX_LOG_MESSAGES: usize = 200;

/// Interaction state of the dashboard. Every change recomputes the filtered
/// series and metrics from the shared table.
pub struct DashboardState {
    filter: TimeSeriesFilter,
    series_index: usize,
    pub price_field: PriceField,
    pub averages: BTreeSet<MaWindow>,
    pub requested_range: (NaiveDate, NaiveDate),
    pub series: Option<FilteredSeries>,
    pub summary: Option<SummaryMetrics>,
    pub status: Option<String>,
    pub log_messages: Vec<String>,
    pub table_open: bool,
    pub table_scroll: usize,
    pub table_rows: usize,
}

impl DashboardState {
    pub fn new(table: Arc<PriceTable>, price_field: PriceField) -> Result<Self, AppError> {
        let first = table
            .series_ids()
            .first()
            .cloned()
            .ok_or_else(|| AppError::Load("price table has no series".to_string()))?;
        let span = table
            .series_span(&first)
            .ok_or_else(|| AppError::SeriesNotFound(first.clone()))?;

        let mut state = Self {
            filter: TimeSeriesFilter::new(table),
            series_index: 0,
            price_field,
            averages: BTreeSet::new(),
            requested_range: span,
            series: None,
            summary: None,
            status: None,
            log_messages: Vec::new(),
            table_open: false,
            table_scroll: 0,
            table_rows: 12,
        };
        state.refresh();
        Ok(state)
    }

    pub fn table(&self) -> &Arc<PriceTable> {
        self.filter.table()
    }

    pub fn series_ids(&self) -> &[String] {
        self.filter.table().series_ids()
    }

    pub fn series_id(&self) -> &str {
        &self.series_ids()[self.series_index]
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    pub fn request(&self) -> FilterRequest {
        FilterRequest {
            series_id: self.series_id().to_string(),
            date_start: self.requested_range.0,
            date_end: self.requested_range.1,
            price_field: self.price_field,
            averages: self.averages.clone(),
        }
    }

    /// Recompute the filtered series and metrics for the current selection.
    pub fn refresh(&mut self) {
        let request = self.request();
        let result = self
            .filter
            .filter(&request)
            .and_then(|series| latest_vs_previous(&series).map(|summary| (series, summary)));
        match result {
            Ok((series, summary)) => {
                self.requested_range = series.range;
                self.series = Some(series);
                self.summary = Some(summary);
                self.status = None;
            }
            Err(e) => {
                tracing::warn!(series = %request.series_id, error = %e, "Selection has no data");
                self.series = None;
                self.summary = None;
                self.status = Some(e.to_string());
                self.push_log(format!("[WARN] {}", e));
            }
        }
        self.clamp_table_scroll();
    }

    /// Switch to `series_id` with its full date span. An unknown id leaves the
    /// current selection untouched.
    pub fn select_series(&mut self, series_id: &str) -> Result<(), AppError> {
        let Some(index) = self.series_ids().iter().position(|s| s == series_id) else {
            let err = AppError::SeriesNotFound(series_id.to_string());
            tracing::warn!(error = %err, "Rejected series selection");
            self.push_log(format!("[WARN] {}", err));
            return Err(err);
        };
        self.select_index(index);
        Ok(())
    }

    fn select_index(&mut self, index: usize) {
        self.series_index = index;
        let id = self.series_id().to_string();
        if let Some(span) = self.table().series_span(&id) {
            self.requested_range = span;
        }
        self.table_scroll = 0;
        tracing::info!(series = %id, "Series selected");
        self.refresh();
    }

    pub fn next_series(&mut self) {
        let n = self.series_ids().len();
        self.select_index((self.series_index + 1) % n);
    }

    pub fn prev_series(&mut self) {
        let n = self.series_ids().len();
        self.select_index((self.series_index + n - 1) % n);
    }

    pub fn cycle_price_field(&mut self) {
        self.price_field = self.price_field.next();
        self.refresh();
    }

    pub fn toggle_average(&mut self, window: MaWindow) {
        if !self.averages.remove(&window) {
            self.averages.insert(window);
        }
        self.refresh();
    }

    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.requested_range = (start, end);
        self.refresh();
    }

    /// Move the start date; it never passes the current end.
    pub fn shift_start(&mut self, days: i64) {
        let (start, end) = self.requested_range;
        self.set_range(shift_date(start, days).min(end), end);
    }

    /// Move the end date; it never falls before the current start.
    pub fn shift_end(&mut self, days: i64) {
        let (start, end) = self.requested_range;
        self.set_range(start, shift_date(end, days).max(start));
    }

    pub fn reset_range(&mut self) {
        if let Some(span) = self.table().series_span(self.series_id()) {
            self.set_range(span.0, span.1);
        }
    }

    pub fn export(&mut self, dir: &Path) -> Result<PathBuf, AppError> {
        let series = self
            .series
            .as_ref()
            .ok_or_else(|| AppError::EmptySeries(self.series_id().to_string()))?;
        let path = export_series(series, dir)?;
        self.push_log(format!("Exported {}", path.display()));
        Ok(path)
    }

    pub fn toggle_table(&mut self) {
        self.table_open = !self.table_open;
    }

    pub fn scroll_table(&mut self, delta: isize) {
        self.table_scroll = self.table_scroll.saturating_add_signed(delta);
        self.clamp_table_scroll();
    }

    fn clamp_table_scroll(&mut self) {
        let len = self.series.as_ref().map_or(0, FilteredSeries::len);
        self.table_scroll = self.table_scroll.min(len.saturating_sub(1));
    }

    /// Apply one key command. Returns `false` when the user asked to quit.
    pub fn apply(&mut self, cmd: UiCommand, export_dir: &Path) -> bool {
        match cmd {
            UiCommand::Quit => return false,
            UiCommand::PrevSeries => self.prev_series(),
            UiCommand::NextSeries => self.next_series(),
            UiCommand::CyclePriceField => self.cycle_price_field(),
            UiCommand::ToggleAverage(w) => self.toggle_average(w),
            UiCommand::ShiftStart(days) => self.shift_start(days),
            UiCommand::ShiftEnd(days) => self.shift_end(days),
            UiCommand::ResetRange => self.reset_range(),
            UiCommand::ToggleTable => self.toggle_table(),
            UiCommand::ScrollUp => self.scroll_table(-1),
            UiCommand::ScrollDown => self.scroll_table(1),
            UiCommand::Export => {
                if let Err(e) = self.export(export_dir) {
                    tracing::error!(error = %e, "Export failed");
                    self.push_log(format!("[ERR] export failed: {}", e));
                }
            }
        }
        true
    }
}

fn shift_date(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}
