//! Cached load boundary.
//!
//! A cleaned dataset is kept per source file and reused while the file's
//! modification time and length are unchanged. Any change to either reloads
//! and re-cleans from disk.
use crate::cleaner::CleanReport;
use crate::error::{DashboardError, Result};
use crate::loader::load_and_clean;
use crate::types::DeliveryRecord;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

static SHARED: Lazy<DatasetCache> = Lazy::new(DatasetCache::default);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

struct Entry {
    fingerprint: Fingerprint,
    records: Arc<Vec<DeliveryRecord>>,
    report: CleanReport,
}

#[derive(Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, Entry>>,
}

fn fingerprint(path: &Path) -> Result<(PathBuf, Fingerprint)> {
    let io_err = |source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    };
    let canonical = std::fs::canonicalize(path).map_err(io_err)?;
    let meta = std::fs::metadata(&canonical).map_err(io_err)?;
    Ok((
        canonical,
        Fingerprint {
            modified: meta.modified().ok(),
            len: meta.len(),
        },
    ))
}

impl DatasetCache {
    /// Return the cleaned dataset for `path`, reusing the cached copy when
    /// the file has not changed since it was read.
    pub fn load(&self, path: &Path) -> Result<(Arc<Vec<DeliveryRecord>>, CleanReport)> {
        let (key, current) = fingerprint(path)?;
        {
            let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(&key) {
                if entry.fingerprint == current {
                    log::debug!("cache hit for {}", key.display());
                    return Ok((Arc::clone(&entry.records), entry.report.clone()));
                }
            }
        }

        log::debug!("cache miss for {}", key.display());
        let (records, report) = load_and_clean(&key)?;
        let entry = Entry {
            fingerprint: current,
            records: Arc::new(records),
            report,
        };
        let out = (Arc::clone(&entry.records), entry.report.clone());
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
        Ok(out)
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load through the process-wide cache.
pub fn load_cached(path: &Path) -> Result<(Arc<Vec<DeliveryRecord>>, CleanReport)> {
    SHARED.load(path)
}

/// Drop everything held by the process-wide cache.
pub fn clear() {
    SHARED.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use std::time::Duration;
    use tempfile::NamedTempFile;

    const HEADER: &str = "ID,Delivery_person_ID,Delivery_person_Age,Delivery_person_Ratings,Restaurant_latitude,Restaurant_longitude,Delivery_location_latitude,Delivery_location_longitude,Order_Date,Time_Orderd,Time_Order_picked,Weatherconditions,Road_traffic_density,Vehicle_condition,Type_of_order,Type_of_vehicle,multiple_deliveries,Festival,City,Time_taken(min)";
    const ROW: &str = "0x4607 ,INDORES13DEL02 ,37,4.9,22.745049,75.892471,22.765049,75.912471,19-03-2022,11:30:00,11:45:00,conditions Sunny,High ,2,Snack ,motorcycle ,0,No ,Urban ,(min) 24";

    fn write_rows(file: &mut NamedTempFile, rows: usize) {
        let f = file.as_file_mut();
        f.set_len(0).unwrap();
        let mut body = format!("{HEADER}\n");
        for _ in 0..rows {
            body.push_str(ROW);
            body.push('\n');
        }
        f.rewind().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f.flush().unwrap();
    }

    #[test]
    fn test_hit_returns_same_dataset() {
        let mut file = NamedTempFile::new().unwrap();
        write_rows(&mut file, 2);
        let cache = DatasetCache::default();
        let (first, _) = cache.load(file.path()).unwrap();
        let (second, report) = cache.load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(report.kept_rows, 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_file_invalidates() {
        let mut file = NamedTempFile::new().unwrap();
        write_rows(&mut file, 1);
        let cache = DatasetCache::default();
        let (first, _) = cache.load(file.path()).unwrap();
        assert_eq!(first.len(), 1);

        write_rows(&mut file, 3);
        let (second, _) = cache.load(file.path()).unwrap();
        assert_eq!(second.len(), 3);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_touched_file_with_same_length_invalidates() {
        let mut file = NamedTempFile::new().unwrap();
        write_rows(&mut file, 2);
        let cache = DatasetCache::default();
        let (first, _) = cache.load(file.path()).unwrap();
        let len_before = std::fs::metadata(file.path()).unwrap().len();

        let earlier = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        file.as_file().set_modified(earlier).unwrap();
        assert_eq!(std::fs::metadata(file.path()).unwrap().len(), len_before);

        let (second, _) = cache.load(file.path()).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);

        let (third, _) = cache.load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&second, &third));
    }

    #[test]
    fn test_clear_and_missing_file() {
        let mut file = NamedTempFile::new().unwrap();
        write_rows(&mut file, 1);
        let cache = DatasetCache::default();
        cache.load(file.path()).unwrap();
        cache.clear();
        assert!(cache.is_empty());

        let err = cache.load(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::Io { .. }));
    }
}
