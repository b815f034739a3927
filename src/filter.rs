use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::AppError;
use crate::indicator::sma::rolling_mean;
use crate::model::price::{MaWindow, PriceField, PriceRecord};
use crate::model::table::PriceTable;

/// Parameters of one dashboard interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRequest {
    pub series_id: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub price_field: PriceField,
    pub averages: BTreeSet<MaWindow>,
}

impl FilterRequest {
    pub fn new(
        series_id: impl Into<String>,
        date_start: NaiveDate,
        date_end: NaiveDate,
        price_field: PriceField,
    ) -> Self {
        Self {
            series_id: series_id.into(),
            date_start,
            date_end,
            price_field,
            averages: BTreeSet::new(),
        }
    }

    /// Request covering the whole recorded span of `series_id`.
    pub fn full_span(
        table: &PriceTable,
        series_id: &str,
        price_field: PriceField,
    ) -> Result<Self, AppError> {
        let (start, end) = table
            .series_span(series_id)
            .ok_or_else(|| AppError::SeriesNotFound(series_id.to_string()))?;
        Ok(Self::new(series_id, start, end, price_field))
    }

    pub fn with_average(mut self, window: MaWindow) -> Self {
        self.averages.insert(window);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRow {
    pub record: PriceRecord,
    pub averages: BTreeMap<MaWindow, Option<f64>>,
}

impl FilteredRow {
    pub fn average(&self, window: MaWindow) -> Option<f64> {
        self.averages.get(&window).copied().flatten()
    }
}

/// Date-ordered slice of one series plus the requested moving averages.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSeries {
    pub series_id: String,
    pub price_field: PriceField,
    /// Range actually applied after clamping.
    pub range: (NaiveDate, NaiveDate),
    pub windows: BTreeSet<MaWindow>,
    pub rows: Vec<FilteredRow>,
}

impl FilteredSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.record.date).collect()
    }

    pub fn price_values(&self) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| self.price_field.value_of(&r.record))
            .collect()
    }

    pub fn volumes(&self) -> Vec<u64> {
        self.rows.iter().map(|r| r.record.volume).collect()
    }

    /// Column for `window`, or `None` when that average was not requested.
    pub fn average(&self, window: MaWindow) -> Option<Vec<Option<f64>>> {
        if !self.windows.contains(&window) {
            return None;
        }
        Some(self.rows.iter().map(|r| r.average(window)).collect())
    }

    pub fn records(&self) -> impl Iterator<Item = &PriceRecord> {
        self.rows.iter().map(|r| &r.record)
    }
}

/// Clamp a requested range into the recorded span of a series.
///
/// An inverted request is swapped first. A range that lies entirely outside the
/// span collapses onto the nearest boundary date, so the result always covers at
/// least one recorded day.
pub fn effective_range(
    span: (NaiveDate, NaiveDate),
    start: NaiveDate,
    end: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let (lo, hi) = span;
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    (start.clamp(lo, hi), end.clamp(lo, hi))
}

/// Filters a shared, read-only price table.
#[derive(Debug, Clone)]
pub struct TimeSeriesFilter {
    table: Arc<PriceTable>,
}

impl TimeSeriesFilter {
    pub fn new(table: Arc<PriceTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &Arc<PriceTable> {
        &self.table
    }

    pub fn filter(&self, request: &FilterRequest) -> Result<FilteredSeries, AppError> {
        filter(&self.table, request)
    }

    /// Like [`filter`](Self::filter) but rejects an inverted range instead of swapping it.
    pub fn filter_strict(&self, request: &FilterRequest) -> Result<FilteredSeries, AppError> {
        if request.date_start > request.date_end {
            return Err(AppError::InvalidRange {
                start: request.date_start,
                end: request.date_end,
            });
        }
        filter(&self.table, request)
    }
}

/// Select one series within a date range and attach the requested averages.
///
/// The range is clamped to the series span. Averages are computed over the
/// filtered rows only, matching what the chart displays.
pub fn filter(table: &PriceTable, request: &FilterRequest) -> Result<FilteredSeries, AppError> {
    let rows = table
        .records(&request.series_id)
        .ok_or_else(|| AppError::SeriesNotFound(request.series_id.clone()))?;
    let span = table
        .series_span(&request.series_id)
        .ok_or_else(|| AppError::EmptySeries(request.series_id.clone()))?;
    let (start, end) = effective_range(span, request.date_start, request.date_end);

    let selected: Vec<&PriceRecord> = rows
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .collect();
    if selected.is_empty() {
        return Err(AppError::EmptySeries(format!(
            "{} {}..{}",
            request.series_id, start, end
        )));
    }

    let prices: Vec<f64> = selected
        .iter()
        .map(|r| request.price_field.value_of(r))
        .collect();
    let columns: Vec<(MaWindow, Vec<Option<f64>>)> = request
        .averages
        .iter()
        .map(|&w| (w, rolling_mean(&prices, w.period())))
        .collect();

    let rows = selected
        .into_iter()
        .enumerate()
        .map(|(i, record)| FilteredRow {
            record: record.clone(),
            averages: columns.iter().map(|(w, col)| (*w, col[i])).collect(),
        })
        .collect();

    tracing::debug!(
        series = %request.series_id,
        start = %start,
        end = %end,
        field = %request.price_field,
        "filtered series"
    );

    Ok(FilteredSeries {
        series_id: request.series_id.clone(),
        price_field: request.price_field,
        range: (start, end),
        windows: request.averages.clone(),
        rows,
    })
}
