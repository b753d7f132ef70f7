// Entry point: load, clean and filter the order export once, then print the
// requested report views.
//
// Each view mirrors one page of the delivery dashboard:
// - `company` covers order volume, traffic and geography,
// - `couriers` covers courier ratings and speed,
// - `restaurants` covers distances and delivery times.
// With `--out-dir`, every table is also written as CSV and the scalar
// metrics of a view as JSON.
mod cli;

use clap::Parser;
use cli::{Cli, View};
use delivery_report::cache::load_cached;
use delivery_report::reports::{self, Speed};
use delivery_report::types::DeliveryRecord;
use delivery_report::util::{format_int, format_number};
use delivery_report::{output, Filters, Result};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use tabled::Tabled;

const TOP_COURIERS: usize = 10;

/// Where and how much of each table to show.
struct Sink<'a> {
    out_dir: Option<&'a Path>,
    preview: usize,
}

impl Sink<'_> {
    fn table<T>(&self, file: &str, title: &str, note: Option<&str>, rows: &[T]) -> Result<()>
    where
        T: Serialize + Tabled + Clone,
    {
        output::preview_table(title, note, rows, self.preview);
        if let Some(dir) = self.out_dir {
            let path = dir.join(file);
            output::write_csv(&path, rows)?;
            println!("(Full table exported to {})\n", path.display());
        }
        Ok(())
    }

    fn summary<T: Serialize>(&self, file: &str, title: &str, value: &T) -> Result<()> {
        println!("\n{} ({}):", title, file);
        println!("{}\n", serde_json::to_string(value)?);
        if let Some(dir) = self.out_dir {
            output::write_json(&dir.join(file), value)?;
        }
        Ok(())
    }
}

fn company_view(data: &[DeliveryRecord], sink: &Sink) -> Result<()> {
    println!("== Company view ==");
    sink.table(
        "orders_by_day.csv",
        "Orders by Day",
        None,
        &reports::orders_by_day(data),
    )?;
    sink.table(
        "traffic_order_share.csv",
        "Traffic Order Share",
        None,
        &reports::traffic_order_share(data),
    )?;
    sink.table(
        "traffic_order_city.csv",
        "Traffic Order City",
        None,
        &reports::traffic_orders_by_city(data),
    )?;
    sink.table(
        "orders_by_week.csv",
        "Orders by Week",
        Some("Weeks start on Sunday"),
        &reports::orders_by_week(data),
    )?;
    sink.table(
        "order_share_by_week.csv",
        "Orders per Courier by Week",
        Some("Orders / distinct couriers active that week"),
        &reports::orders_per_courier_by_week(data),
    )?;
    sink.table(
        "delivery_points.csv",
        "Median Delivery Point",
        Some("Grouped by City and RoadTrafficDensity"),
        &reports::median_delivery_points(data),
    )?;
    Ok(())
}

fn couriers_view(data: &[DeliveryRecord], sink: &Sink) -> Result<()> {
    println!("== Couriers view ==");
    sink.summary(
        "courier_summary.json",
        "Overall Metrics",
        &reports::courier_overview(data),
    )?;
    sink.table(
        "rating_by_courier.csv",
        "Mean Rating per Courier",
        None,
        &reports::mean_rating_by_courier(data),
    )?;
    sink.table(
        "rating_by_traffic.csv",
        "Rating by Traffic",
        None,
        &reports::rating_stats_by_traffic(data),
    )?;
    sink.table(
        "rating_by_weather.csv",
        "Rating by Weather",
        None,
        &reports::rating_stats_by_weather(data),
    )?;
    sink.table(
        "fastest_couriers.csv",
        "Fastest Couriers per City",
        Some("Top 10 by mean delivery time"),
        &reports::top_couriers_by_city(data, TOP_COURIERS, Speed::Fastest),
    )?;
    sink.table(
        "slowest_couriers.csv",
        "Slowest Couriers per City",
        Some("Top 10 by mean delivery time"),
        &reports::top_couriers_by_city(data, TOP_COURIERS, Speed::Slowest),
    )?;
    Ok(())
}

fn restaurants_view(data: &[DeliveryRecord], sink: &Sink) -> Result<()> {
    println!("== Restaurants view ==");
    sink.summary(
        "restaurant_summary.json",
        "Overall Metrics",
        &reports::restaurant_overview(data),
    )?;
    sink.table(
        "time_by_city.csv",
        "Delivery Time by City",
        None,
        &reports::time_stats_by_city(data),
    )?;
    sink.table(
        "distance_by_city.csv",
        "Mean Distance by City",
        None,
        &reports::mean_distance_by_city(data),
    )?;
    sink.table(
        "time_by_city_traffic.csv",
        "Delivery Time by City and Traffic",
        None,
        &reports::time_stats_by_city_traffic(data),
    )?;
    sink.table(
        "time_by_festival.csv",
        "Delivery Time by Festival",
        None,
        &reports::time_stats_by_festival(data),
    )?;
    sink.table(
        "time_by_city_order_type.csv",
        "Delivery Time by City and Order Type",
        None,
        &reports::time_stats_by_city_order_type(data),
    )?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let (records, load_report) = match load_cached(&cli.data) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("Failed to load {}: {}", cli.data.display(), e);
            return ExitCode::FAILURE;
        }
    };
    println!(
        "Processing dataset... ({} rows loaded, {} kept after cleaning)",
        format_int(load_report.total_rows),
        format_int(load_report.kept_rows)
    );

    let filters = Filters::new(cli.cutoff, cli.traffic_selection());
    let data = filters.apply(&records);
    let traffic: Vec<&str> = filters.traffic.iter().map(|t| t.as_str()).collect();
    println!(
        "Filters: before {}, traffic [{}] -> {} orders",
        cli.cutoff.format("%d-%m-%Y"),
        traffic.join(", "),
        format_int(data.len())
    );
    if let Some((first, last)) = reports::date_span(&data) {
        println!("Order dates {} to {}", first, last);
    }
    println!(
        "Mean delivery distance: {} km\n",
        format_number(reports::mean_distance(&data), 2)
    );

    if let Some(dir) = &cli.out_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            log::error!("Cannot create {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
    }
    let sink = Sink {
        out_dir: cli.out_dir.as_deref(),
        preview: cli.preview,
    };

    match run_view(cli.view, &data, &sink) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Export failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_view(view: View, data: &[DeliveryRecord], sink: &Sink) -> Result<()> {
    match view {
        View::Company => company_view(data, sink),
        View::Couriers => couriers_view(data, sink),
        View::Restaurants => restaurants_view(data, sink),
        View::All => {
            company_view(data, sink)?;
            couriers_view(data, sink)?;
            restaurants_view(data, sink)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_all_views_export_every_file() {
        let dir = tempdir().unwrap();
        let sink = Sink {
            out_dir: Some(dir.path()),
            preview: 0,
        };
        run_view(View::All, &[], &sink).unwrap();
        for file in [
            "orders_by_day.csv",
            "courier_summary.json",
            "slowest_couriers.csv",
            "restaurant_summary.json",
            "time_by_city_order_type.csv",
        ] {
            assert!(dir.path().join(file).exists(), "{file} not written");
        }
    }

    #[test]
    fn test_write_failure_reaches_caller() {
        // A plain file cannot hold exports.
        let not_a_dir = NamedTempFile::new().unwrap();
        let sink = Sink {
            out_dir: Some(not_a_dir.path()),
            preview: 0,
        };
        assert!(sink
            .table("orders_by_day.csv", "Orders by Day", None, &reports::orders_by_day(&[]))
            .is_err());
        assert!(sink
            .summary("courier_summary.json", "Overall Metrics", &reports::courier_overview(&[]))
            .is_err());
        assert!(run_view(View::Company, &[], &sink).is_err());
        assert!(run_view(View::All, &[], &sink).is_err());
    }
}
