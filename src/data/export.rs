use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::filter::FilteredSeries;

/// Download name offered for a filtered series.
pub fn export_file_name(series_id: &str) -> String {
    format!("{}_data.csv", series_id)
}

/// Write the filtered rows in the source column layout, followed by one column
/// per computed average. Undefined averages are left blank.
pub fn write_series_csv<W: Write>(series: &FilteredSeries, writer: W) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = vec!["Stock", "Date", "Open", "High", "Low", "Close", "Volume"];
    header.extend(series.windows.iter().map(|w| w.label()));
    out.write_record(&header)?;

    for row in &series.rows {
        let r = &row.record;
        let mut fields = vec![
            r.series_id.clone(),
            r.date.format("%Y-%m-%d").to_string(),
            r.open.to_string(),
            r.high.to_string(),
            r.low.to_string(),
            r.close.to_string(),
            r.volume.to_string(),
        ];
        fields.extend(
            series
                .windows
                .iter()
                .map(|w| row.average(*w).map(|v| v.to_string()).unwrap_or_default()),
        );
        out.write_record(&fields)?;
    }

    out.flush()?;
    Ok(())
}

pub fn export_series(series: &FilteredSeries, dir: &Path) -> Result<PathBuf, AppError> {
    let path = dir.join(export_file_name(&series.series_id));
    let file = File::create(&path)?;
    write_series_csv(series, file)?;
    tracing::info!(
        series = %series.series_id,
        rows = series.len(),
        path = %path.display(),
        "Exported filtered series"
    );
    Ok(path)
}
