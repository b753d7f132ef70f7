//! CLI argument definitions using clap.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use delivery_report::util::parse_order_date;
use delivery_report::TrafficDensity;
use std::path::PathBuf;

/// Delivery logistics reports for the marketplace order export
#[derive(Parser)]
#[command(name = "delivery-report")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub view: View,

    /// Order export to read
    #[arg(long, global = true, value_name = "FILE", default_value = "dataset/train.csv")]
    pub data: PathBuf,

    /// Keep orders placed strictly before this date (dd-mm-yyyy)
    #[arg(long, global = true, default_value = "13-04-2022", value_parser = parse_cutoff)]
    pub cutoff: NaiveDate,

    /// Traffic densities to keep; repeat or comma-separate [default: Low,Medium,Jam]
    #[arg(long, global = true, value_delimiter = ',', value_parser = parse_traffic)]
    pub traffic: Vec<TrafficDensity>,

    /// Export every table as CSV (plus a JSON summary) into this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Rows shown per table preview
    #[arg(long, global = true, default_value_t = 5)]
    pub preview: usize,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Order volume, traffic share, weekly trends and delivery hot spots
    Company,
    /// Courier ages, ratings and fastest/slowest couriers per city
    Couriers,
    /// Distances, festival effects and delivery times per city
    Restaurants,
    /// All three views in sequence
    All,
}

impl Cli {
    /// Selected traffic densities, falling back to the default selection.
    pub fn traffic_selection(&self) -> Vec<TrafficDensity> {
        if self.traffic.is_empty() {
            TrafficDensity::DEFAULT_SELECTION.to_vec()
        } else {
            self.traffic.clone()
        }
    }
}

fn parse_cutoff(s: &str) -> Result<NaiveDate, String> {
    parse_order_date(s.trim()).ok_or_else(|| format!("'{s}' is not a dd-mm-yyyy date"))
}

fn parse_traffic(s: &str) -> Result<TrafficDensity, String> {
    TrafficDensity::from_label(s.trim())
        .ok_or_else(|| format!("'{s}' is not one of Low, Medium, High, Jam"))
}
