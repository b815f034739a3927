use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;
use crate::filter::FilteredSeries;

/// Headline numbers shown in the metric tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub latest_date: NaiveDate,
    pub latest_close: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub percent_change: f64,
}

impl SummaryMetrics {
    pub fn latest_close_label(&self) -> String {
        format_price(self.latest_close)
    }

    pub fn day_high_label(&self) -> String {
        format_price(self.day_high)
    }

    pub fn day_low_label(&self) -> String {
        format_price(self.day_low)
    }

    pub fn percent_change_label(&self) -> String {
        format!("{:.2}%", self.percent_change)
    }
}

pub fn format_price(value: f64) -> String {
    format!("{:.2}", value)
}

/// Compare the last row of a filtered series with the one before it.
///
/// With a single row the previous close falls back to the latest close, so the
/// change is zero.
pub fn latest_vs_previous(series: &FilteredSeries) -> Result<SummaryMetrics, AppError> {
    let latest = series
        .rows
        .last()
        .map(|r| &r.record)
        .ok_or_else(|| AppError::EmptySeries(series.series_id.clone()))?;
    let previous = series
        .rows
        .len()
        .checked_sub(2)
        .and_then(|i| series.rows.get(i))
        .map(|r| &r.record)
        .unwrap_or(latest);

    let percent_change = if previous.close == 0.0 {
        0.0
    } else {
        (latest.close - previous.close) / previous.close * 100.0
    };

    Ok(SummaryMetrics {
        latest_date: latest.date,
        latest_close: latest.close,
        day_high: latest.high,
        day_low: latest.low,
        percent_change,
    })
}
