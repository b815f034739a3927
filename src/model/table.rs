use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::AppError;
use crate::model::price::PriceRecord;

/// Read-only price table loaded once at startup.
///
/// Records are grouped per series and kept in ascending date order, so every
/// consumer sees the same ordering regardless of the row order in the file.
#[derive(Debug, Clone)]
pub struct PriceTable {
    series_order: Vec<String>,
    by_series: HashMap<String, Vec<PriceRecord>>,
    len: usize,
}

impl PriceTable {
    /// Build a table, rejecting an empty input and duplicate (series, date) rows.
    pub fn new(records: Vec<PriceRecord>) -> Result<Self, AppError> {
        if records.is_empty() {
            return Err(AppError::Load("price table has no rows".to_string()));
        }

        let len = records.len();
        let mut series_order: Vec<String> = Vec::new();
        let mut by_series: HashMap<String, Vec<PriceRecord>> = HashMap::new();
        for record in records {
            if !by_series.contains_key(&record.series_id) {
                series_order.push(record.series_id.clone());
            }
            by_series
                .entry(record.series_id.clone())
                .or_default()
                .push(record);
        }

        for (series_id, rows) in by_series.iter_mut() {
            rows.sort_by_key(|r| r.date);
            if let Some(dup) = rows.windows(2).find(|w| w[0].date == w[1].date) {
                return Err(AppError::Load(format!(
                    "duplicate row for series '{}' on {}",
                    series_id, dup[0].date
                )));
            }
        }

        Ok(Self {
            series_order,
            by_series,
            len,
        })
    }

    /// Distinct series ids in order of first appearance.
    pub fn series_ids(&self) -> &[String] {
        &self.series_order
    }

    pub fn contains_series(&self, series_id: &str) -> bool {
        self.by_series.contains_key(series_id)
    }

    /// Date-sorted rows of one series.
    pub fn records(&self, series_id: &str) -> Option<&[PriceRecord]> {
        self.by_series.get(series_id).map(Vec::as_slice)
    }

    /// First and last trading date of a series.
    pub fn series_span(&self, series_id: &str) -> Option<(NaiveDate, NaiveDate)> {
        let rows = self.records(series_id)?;
        Some((rows.first()?.date, rows.last()?.date))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
