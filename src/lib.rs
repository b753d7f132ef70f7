//! Cleaning and aggregation of food-delivery order exports.
//!
//! ```text
//!  train.csv ──► loader ──► cleaner ──► filter ──► reports ──► views
//!                  ▲
//!                cache (reused while the file is unchanged)
//! ```

pub mod cache;
pub mod cleaner;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use cleaner::{clean, CleanReport};
pub use error::{DashboardError, Result};
pub use filter::Filters;
pub use loader::{load_and_clean, read_raw};
pub use types::{DeliveryRecord, Festival, RawRow, TrafficDensity};
