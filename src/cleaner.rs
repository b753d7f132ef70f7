//! Turns raw CSV rows into typed [`DeliveryRecord`]s.
//!
//! Steps run in a fixed order: the missing-value pass drops whole rows first,
//! numeric and date coercion follow and fail loudly, text is trimmed, and
//! finally the weather and time columns lose their label noise. Only the
//! time coercion is lenient: a time that will not parse marks the row as
//! missing and the row is dropped. A text value that ends up blank or as a
//! missing marker after cleaning (`"conditions NaN"` becomes `"NaN"`) drops
//! the row too, so cleaned output always survives a second pass unchanged.
use crate::error::{DashboardError, Result};
use crate::types::{DeliveryRecord, Festival, RawRow, TrafficDensity};
use crate::util::{parse_f64_safe, parse_order_date, parse_u32_safe};

/// Padded sentinel the source export writes for unknown values.
pub const MISSING_SENTINEL: &str = "NaN ";

/// Cell values that already mean "missing" in tabular exports.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Row accounting for one cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub total_rows: usize,
    pub dropped_missing: usize,
    pub dropped_time: usize,
    pub kept_rows: usize,
}

fn is_missing(cell: Option<&str>) -> bool {
    match cell {
        None => true,
        Some(s) => s == MISSING_SENTINEL || MISSING_MARKERS.contains(&s),
    }
}

fn has_missing(row: &RawRow) -> bool {
    row.cells().into_iter().any(is_missing)
}

/// Clean a whole table. Row numbers in errors are 1-based positions among
/// the data rows given.
pub fn clean(rows: Vec<RawRow>) -> Result<(Vec<DeliveryRecord>, CleanReport)> {
    let total_rows = rows.len();
    let complete: Vec<(usize, RawRow)> = rows
        .into_iter()
        .enumerate()
        .map(|(i, r)| (i + 1, r))
        .filter(|(_, r)| !has_missing(r))
        .collect();
    let mut dropped_missing = total_rows - complete.len();

    let mut records = Vec::with_capacity(complete.len());
    let mut dropped_time = 0usize;
    for (row_no, raw) in &complete {
        match clean_row(*row_no, raw)? {
            RowOutcome::Kept(record) => records.push(record),
            RowOutcome::MissingText(column) => {
                log::debug!("row {}: {} is empty once cleaned", row_no, column);
                dropped_missing += 1;
            }
            RowOutcome::BadTime => dropped_time += 1,
        }
    }
    if dropped_time > 0 {
        log::warn!(
            "{} rows dropped: Time_taken(min) is not numeric",
            dropped_time
        );
    }

    let report = CleanReport {
        total_rows,
        dropped_missing,
        dropped_time,
        kept_rows: records.len(),
    };
    Ok((records, report))
}

fn text(cell: &Option<String>) -> &str {
    cell.as_deref().unwrap_or_default()
}

fn number_f64(row: usize, column: &'static str, cell: &Option<String>) -> Result<f64> {
    let raw = text(cell);
    parse_f64_safe(raw).ok_or_else(|| DashboardError::InvalidNumber {
        row,
        column,
        value: raw.to_string(),
    })
}

fn number_u32(row: usize, column: &'static str, cell: &Option<String>) -> Result<u32> {
    let raw = text(cell);
    parse_u32_safe(raw).ok_or_else(|| DashboardError::InvalidNumber {
        row,
        column,
        value: raw.to_string(),
    })
}

enum RowOutcome {
    Kept(DeliveryRecord),
    /// A text column is blank or a missing marker after trimming and suffix
    /// removal.
    MissingText(&'static str),
    /// `Time_taken(min)` did not coerce.
    BadTime,
}

/// Clean one complete row. Rows that only turn out to be missing once
/// cleaned are reported as such rather than kept.
fn clean_row(row: usize, raw: &RawRow) -> Result<RowOutcome> {
    // Numeric coercion.
    let courier_age = number_u32(row, "Delivery_person_Age", &raw.delivery_person_age)?;
    let courier_rating = number_f64(row, "Delivery_person_Ratings", &raw.delivery_person_ratings)?;
    let restaurant_lat = number_f64(row, "Restaurant_latitude", &raw.restaurant_latitude)?;
    let restaurant_lon = number_f64(row, "Restaurant_longitude", &raw.restaurant_longitude)?;
    let delivery_lat = number_f64(
        row,
        "Delivery_location_latitude",
        &raw.delivery_location_latitude,
    )?;
    let delivery_lon = number_f64(
        row,
        "Delivery_location_longitude",
        &raw.delivery_location_longitude,
    )?;
    let vehicle_condition = number_u32(row, "Vehicle_condition", &raw.vehicle_condition)?;
    let multiple_deliveries = number_u32(row, "multiple_deliveries", &raw.multiple_deliveries)?;

    // Exact date format, no trimming.
    let date_raw = text(&raw.order_date);
    let order_date = parse_order_date(date_raw).ok_or_else(|| DashboardError::InvalidDate {
        row,
        value: date_raw.to_string(),
    })?;

    // Text columns.
    let weather = text(&raw.weatherconditions)
        .trim()
        .replace("conditions", "")
        .trim()
        .to_string();
    let texts = [
        ("ID", text(&raw.id).trim()),
        ("Delivery_person_ID", text(&raw.delivery_person_id).trim()),
        ("Time_Orderd", text(&raw.time_orderd).trim()),
        ("Time_Order_picked", text(&raw.time_order_picked).trim()),
        ("Weatherconditions", weather.as_str()),
        ("Road_traffic_density", text(&raw.road_traffic_density).trim()),
        ("Type_of_order", text(&raw.type_of_order).trim()),
        ("Type_of_vehicle", text(&raw.type_of_vehicle).trim()),
        ("Festival", text(&raw.festival).trim()),
        ("City", text(&raw.city).trim()),
    ];
    if let Some((column, _)) = texts.into_iter().find(|(_, value)| is_missing(Some(*value))) {
        return Ok(RowOutcome::MissingText(column));
    }

    let traffic_raw = text(&raw.road_traffic_density).trim();
    let traffic =
        TrafficDensity::from_label(traffic_raw).ok_or_else(|| DashboardError::UnknownCategory {
            row,
            column: "Road_traffic_density",
            value: traffic_raw.to_string(),
        })?;
    let festival_raw = text(&raw.festival).trim();
    let festival = Festival::from_label(festival_raw).ok_or_else(|| DashboardError::UnknownCategory {
        row,
        column: "Festival",
        value: festival_raw.to_string(),
    })?;

    let time_taken = text(&raw.time_taken_min).trim().replace("(min)", "");
    let Some(time_taken_min) = parse_f64_safe(&time_taken) else {
        log::debug!("row {}: unparsable Time_taken(min) '{}'", row, time_taken);
        return Ok(RowOutcome::BadTime);
    };

    Ok(RowOutcome::Kept(DeliveryRecord {
        id: text(&raw.id).trim().to_string(),
        courier_id: text(&raw.delivery_person_id).trim().to_string(),
        courier_age,
        courier_rating,
        restaurant_lat,
        restaurant_lon,
        delivery_lat,
        delivery_lon,
        order_date,
        time_ordered: text(&raw.time_orderd).trim().to_string(),
        time_picked: text(&raw.time_order_picked).trim().to_string(),
        weather,
        traffic,
        vehicle_condition,
        order_type: text(&raw.type_of_order).trim().to_string(),
        vehicle_type: text(&raw.type_of_vehicle).trim().to_string(),
        multiple_deliveries,
        festival,
        city: text(&raw.city).trim().to_string(),
        time_taken_min,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw() -> RawRow {
        RawRow {
            id: Some("0x4607 ".into()),
            delivery_person_id: Some("INDORES13DEL02 ".into()),
            delivery_person_age: Some("37".into()),
            delivery_person_ratings: Some("4.9".into()),
            restaurant_latitude: Some("22.745049".into()),
            restaurant_longitude: Some("75.892471".into()),
            delivery_location_latitude: Some("22.765049".into()),
            delivery_location_longitude: Some("75.912471".into()),
            order_date: Some("19-03-2022".into()),
            time_orderd: Some("11:30:00".into()),
            time_order_picked: Some("11:45:00".into()),
            weatherconditions: Some("conditions Sunny".into()),
            road_traffic_density: Some("High ".into()),
            vehicle_condition: Some("2".into()),
            type_of_order: Some("Snack ".into()),
            type_of_vehicle: Some("motorcycle ".into()),
            multiple_deliveries: Some("0".into()),
            festival: Some("No ".into()),
            city: Some("Urban ".into()),
            time_taken_min: Some("(min) 24".into()),
        }
    }

    #[test]
    fn test_clean_typical_row() {
        let (records, report) = clean(vec![raw()]).unwrap();
        assert_eq!(report.kept_rows, 1);
        let r = &records[0];
        assert_eq!(r.id, "0x4607");
        assert_eq!(r.courier_id, "INDORES13DEL02");
        assert_eq!(r.courier_age, 37);
        assert_eq!(r.courier_rating, 4.9);
        assert_eq!(r.order_date, NaiveDate::from_ymd_opt(2022, 3, 19).unwrap());
        assert_eq!(r.weather, "Sunny");
        assert_eq!(r.traffic, TrafficDensity::High);
        assert_eq!(r.festival, Festival::No);
        assert_eq!(r.city, "Urban");
        assert_eq!(r.time_taken_min, 24.0);
    }

    #[test]
    fn test_time_suffix_variants() {
        for value in ["30(min)", " 30(min) ", "30 (min)", "(min) 30", "  (min)30"] {
            let mut row = raw();
            row.time_taken_min = Some(value.into());
            let (records, _) = clean(vec![row]).unwrap();
            assert_eq!(records[0].time_taken_min, 30.0, "input {value:?}");
        }
    }

    #[test]
    fn test_weather_suffix_removed() {
        let mut row = raw();
        row.weatherconditions = Some("Sunny conditions".into());
        let (records, _) = clean(vec![row]).unwrap();
        assert_eq!(records[0].weather, "Sunny");
    }

    #[test]
    fn test_sentinel_and_missing_drop_whole_row() {
        let mut sentinel = raw();
        sentinel.delivery_person_age = Some("NaN ".into());
        let mut empty = raw();
        empty.city = None;
        let mut marker = raw();
        marker.festival = Some("NaN".into());

        let (records, report) = clean(vec![sentinel, raw(), empty, marker]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.total_rows, 4);
        assert_eq!(report.dropped_missing, 3);
        assert_eq!(report.kept_rows, 1);
    }

    #[test]
    fn test_non_numeric_age_is_fatal() {
        let mut bad = raw();
        bad.delivery_person_age = Some("thirty".into());
        let err = clean(vec![raw(), bad]).unwrap_err();
        match err {
            DashboardError::InvalidNumber { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Delivery_person_Age");
                assert_eq!(value, "thirty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_whole_float_age_is_accepted() {
        let mut row = raw();
        row.delivery_person_age = Some("37.0".into());
        row.vehicle_condition = Some("2.0".into());
        let (records, _) = clean(vec![row]).unwrap();
        assert_eq!(records[0].courier_age, 37);
        assert_eq!(records[0].vehicle_condition, 2);

        let mut fractional = raw();
        fractional.delivery_person_age = Some("37.5".into());
        assert!(matches!(
            clean(vec![fractional]),
            Err(DashboardError::InvalidNumber {
                column: "Delivery_person_Age",
                ..
            })
        ));
    }

    #[test]
    fn test_non_numeric_rating_is_fatal() {
        let mut bad = raw();
        bad.delivery_person_ratings = Some("great".into());
        assert!(matches!(
            clean(vec![bad]),
            Err(DashboardError::InvalidNumber {
                column: "Delivery_person_Ratings",
                ..
            })
        ));
    }

    #[test]
    fn test_bad_date_format_is_fatal() {
        let mut bad = raw();
        bad.order_date = Some("2022-03-19".into());
        assert!(matches!(
            clean(vec![bad]),
            Err(DashboardError::InvalidDate { row: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_traffic_is_fatal() {
        let mut bad = raw();
        bad.road_traffic_density = Some("Gridlock".into());
        assert!(matches!(
            clean(vec![bad]),
            Err(DashboardError::UnknownCategory {
                column: "Road_traffic_density",
                ..
            })
        ));
    }

    #[test]
    fn test_unparsable_time_drops_row() {
        let mut bad = raw();
        bad.time_taken_min = Some("(min) soon".into());
        let (records, report) = clean(vec![bad, raw()]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.dropped_time, 1);
        assert_eq!(report.dropped_missing, 0);
    }

    #[test]
    fn test_text_missing_once_cleaned_drops_row() {
        let mut weather = raw();
        weather.weatherconditions = Some("conditions NaN".into());
        let mut blank_city = raw();
        blank_city.city = Some("   ".into());
        let mut blank_traffic = raw();
        blank_traffic.road_traffic_density = Some(" ".into());
        let mut padded_marker = raw();
        padded_marker.type_of_order = Some("NA ".into());

        let (records, report) =
            clean(vec![weather, raw(), blank_city, blank_traffic, padded_marker]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.dropped_missing, 4);
        assert_eq!(report.dropped_time, 0);
        assert_eq!(report.kept_rows, 1);
    }

    #[test]
    fn test_clean_is_idempotent_with_missing_text() {
        let mut weather = raw();
        weather.weatherconditions = Some("conditions NaN".into());
        let mut blank_city = raw();
        blank_city.city = Some("   ".into());
        let (once, _) = clean(vec![weather, raw(), blank_city]).unwrap();
        assert_eq!(once.len(), 1);
        assert!(once.iter().all(|r| r.weather != "NaN" && !r.city.is_empty()));

        let rendered: Vec<RawRow> = once.iter().map(RawRow::from).collect();
        let (twice, report) = clean(rendered).unwrap();
        assert_eq!(once, twice);
        assert_eq!(report.dropped_missing, 0);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let mut second = raw();
        second.delivery_person_ratings = Some("4.35".into());
        second.restaurant_latitude = Some("-12.913041".into());
        second.time_taken_min = Some("(min) 17.5".into());
        let (once, _) = clean(vec![raw(), second]).unwrap();
        let rendered: Vec<RawRow> = once.iter().map(RawRow::from).collect();
        let (twice, report) = clean(rendered).unwrap();
        assert_eq!(once, twice);
        assert_eq!(report.kept_rows, 2);
    }
}
