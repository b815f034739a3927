//! Price table loading from the `Stock,Date,Open,High,Low,Close,Volume` CSV layout.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::AppError;
use crate::model::price::PriceRecord;
use crate::model::table::PriceTable;

pub const REQUIRED_COLUMNS: [&str; 7] = ["Stock", "Date", "Open", "High", "Low", "Close", "Volume"];

pub fn load_price_table(path: &Path) -> Result<PriceTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::Load(format!("failed to open {}: {}", path.display(), e)))?;
    let table = load_price_table_from_reader(BufReader::new(file))?;
    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        series = table.series_ids().len(),
        "Loaded price table"
    );
    Ok(table)
}

pub fn load_price_table_from_reader<R: Read>(reader: R) -> Result<PriceTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Load(format!(
            "missing column(s): {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<PriceRecord>().enumerate() {
        // Header is line 1.
        let record = row.map_err(|e| AppError::Load(format!("line {}: {}", i + 2, e)))?;
        records.push(record);
    }

    PriceTable::new(records)
}
