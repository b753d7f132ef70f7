use crate::error::{DashboardError, Result};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Render the first `max_rows` rows as a Markdown table.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> Option<String>
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return None;
    }
    Some(Table::new(slice).with(Style::markdown()).to_string())
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("\n{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    match render_table(rows, max_rows) {
        Some(table) => println!("{}\n", table),
        None => println!("(no rows)\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeeklyOrdersRow;

    fn rows() -> Vec<WeeklyOrdersRow> {
        vec![
            WeeklyOrdersRow {
                week: "06".into(),
                orders: 1200,
            },
            WeeklyOrdersRow {
                week: "07".into(),
                orders: 1500,
            },
        ]
    }

    #[test]
    fn test_render_table_limits_rows() {
        let table = render_table(&rows(), 1).unwrap();
        assert!(table.contains("WeekOfYear"));
        assert!(table.contains("06"));
        assert!(!table.contains("07"));
        assert!(render_table::<WeeklyOrdersRow>(&[], 5).is_none());
    }

    #[test]
    fn test_write_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("weekly.csv");
        write_csv(&csv_path, &rows()).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(text, "WeekOfYear,Orders\n06,1200\n07,1500\n");

        let json_path = dir.path().join("weekly.json");
        write_json(&json_path, &rows()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value[1]["Orders"], 1500);
    }
}
