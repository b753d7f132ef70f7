use crate::cleaner::{clean, CleanReport};
use crate::error::{DashboardError, Result};
use crate::types::{DeliveryRecord, RawRow};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// Read the delivery CSV into raw rows. No value is touched.
pub fn read_raw(path: &Path) -> Result<Vec<RawRow>> {
    let file = File::open(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();
    if let Some(missing) = RawRow::COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(DashboardError::MissingColumn(missing.to_string()));
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawRow>() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Read and clean in one go.
pub fn load_and_clean(path: &Path) -> Result<(Vec<DeliveryRecord>, CleanReport)> {
    let raw = read_raw(path)?;
    let (records, report) = clean(raw)?;
    log::info!(
        "Loaded {}: {} rows read, {} dropped as incomplete, {} kept",
        path.display(),
        report.total_rows,
        report.dropped_missing + report.dropped_time,
        report.kept_rows
    );
    Ok((records, report))
}
