// Utility helpers for parsing, basic statistics and display formatting.
//
// The statistics follow the tabular conventions the reports are compared
// against: empty input gives NaN rather than zero, and the standard deviation
// is the sample (N-1) estimator.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Mean radius of the earth used by the haversine distance, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Parse a float after trimming. `NaN` spellings are rejected so a parsed
/// value is always a real number.
pub fn parse_f64_safe(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parse a non-negative whole number. Float spellings of whole numbers
/// (`"37.0"`) are accepted, fractional values are not.
pub fn parse_u32_safe(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<u32>() {
        return Some(v);
    }
    let v = parse_f64_safe(s)?;
    if v.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&v) {
        Some(v as u32)
    } else {
        None
    }
}

/// Order dates are written as `dd-mm-yyyy`.
pub fn parse_order_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%d-%m-%Y").ok()
}

/// Week-of-year label with weeks starting on Sunday. Days before the first
/// Sunday of the year fall in week `"00"`.
pub fn week_label(date: NaiveDate) -> String {
    date.format("%U").to_string()
}

/// Arithmetic mean; NaN for an empty slice.
pub fn average(v: &[f64]) -> f64 {
    if v.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Sample standard deviation (N-1 denominator). Fewer than two values
/// give NaN.
pub fn sample_std(v: &[f64]) -> f64 {
    if v.len() < 2 {
        return f64::NAN;
    }
    let mean = average(v);
    let ss: f64 = v.iter().map(|x| (x - mean).powi(2)).sum();
    (ss / (v.len() - 1) as f64).sqrt()
}

pub fn median(mut v: Vec<f64>) -> f64 {
    // Median of a list of numbers. We accept `Vec<f64>` by value so the
    // function can sort in-place without cloning at the call site.
    if v.is_empty() {
        return f64::NAN;
    }
    v.sort_by(|a, b| a.total_cmp(b));
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        v[mid]
    } else {
        (v[mid - 1] + v[mid]) / 2.0
    }
}

/// Round to two decimals, ties to even. NaN stays NaN.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Great-circle distance in kilometres between two `(lat, lon)` points in
/// degrees.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    if !n.is_finite() {
        return n.to_string();
    }
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

// `tabled` display adapters.

pub fn display_2dp(v: &f64) -> String {
    format_number(*v, 2)
}

pub fn display_coord(v: &f64) -> String {
    format!("{:.6}", v)
}
