// Aggregations over a cleaned (and usually filtered) delivery table.
//
// Every function here is read-only over its input. Grouped outputs come back
// in ascending key order; string keys compare bytewise, dates
// chronologically and traffic densities by label.
use crate::types::{
    CityDistanceRow, CityOrderTypeTimeRow, CityTimeRow, CityTrafficCountRow, CityTrafficTimeRow,
    CourierOverview, CourierRatingRow, CourierTimeRow, DailyOrdersRow, DeliveryPointRow,
    DeliveryRecord, Festival, FestivalTimeRow, GroupStatsRow, RestaurantOverview, TrafficShareRow,
    WeeklyCourierRow, WeeklyOrdersRow,
};
use crate::util::{average, haversine_km, median, round2, sample_std, week_label};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Which end of the delivery-time ranking to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    Fastest,
    Slowest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStat {
    Mean,
    Std,
}

/// A record with its restaurant-to-customer distance attached.
#[derive(Debug, Clone, Copy)]
pub struct RoutedDelivery<'a> {
    pub record: &'a DeliveryRecord,
    pub distance_km: f64,
}

/// Collect one numeric value per record into sorted groups.
fn group_values<K, F, V>(data: &[DeliveryRecord], key: F, value: V) -> BTreeMap<K, Vec<f64>>
where
    K: Ord,
    F: Fn(&DeliveryRecord) -> K,
    V: Fn(&DeliveryRecord) -> f64,
{
    let mut map: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for r in data {
        map.entry(key(r)).or_default().push(value(r));
    }
    map
}

fn count_by<K, F>(data: &[DeliveryRecord], key: F) -> BTreeMap<K, usize>
where
    K: Ord,
    F: Fn(&DeliveryRecord) -> K,
{
    let mut map: BTreeMap<K, usize> = BTreeMap::new();
    for r in data {
        *map.entry(key(r)).or_default() += 1;
    }
    map
}

pub fn orders_by_day(data: &[DeliveryRecord]) -> Vec<DailyOrdersRow> {
    count_by(data, |r| r.order_date)
        .into_iter()
        .map(|(date, orders)| DailyOrdersRow { date, orders })
        .collect()
}

/// Order count per traffic density and each density's share of the total.
pub fn traffic_order_share(data: &[DeliveryRecord]) -> Vec<TrafficShareRow> {
    let counts = count_by(data, |r| r.traffic);
    let total: usize = counts.values().sum();
    counts
        .into_iter()
        .map(|(traffic, orders)| TrafficShareRow {
            traffic,
            orders,
            share: orders as f64 / total as f64,
        })
        .collect()
}

pub fn orders_by_week(data: &[DeliveryRecord]) -> Vec<WeeklyOrdersRow> {
    count_by(data, |r| week_label(r.order_date))
        .into_iter()
        .map(|(week, orders)| WeeklyOrdersRow { week, orders })
        .collect()
}

/// Orders divided by distinct active couriers, per Sunday-start week.
pub fn orders_per_courier_by_week(data: &[DeliveryRecord]) -> Vec<WeeklyCourierRow> {
    #[derive(Default)]
    struct Acc<'a> {
        orders: usize,
        couriers: BTreeSet<&'a str>,
    }
    let mut map: BTreeMap<String, Acc> = BTreeMap::new();
    for r in data {
        let e = map.entry(week_label(r.order_date)).or_default();
        e.orders += 1;
        e.couriers.insert(r.courier_id.as_str());
    }
    map.into_iter()
        .map(|(week, acc)| WeeklyCourierRow {
            week,
            orders: acc.orders,
            couriers: acc.couriers.len(),
            orders_per_courier: acc.orders as f64 / acc.couriers.len() as f64,
        })
        .collect()
}

pub fn traffic_orders_by_city(data: &[DeliveryRecord]) -> Vec<CityTrafficCountRow> {
    count_by(data, |r| (r.city.clone(), r.traffic))
        .into_iter()
        .map(|((city, traffic), orders)| CityTrafficCountRow {
            city,
            traffic,
            orders,
        })
        .collect()
}

/// Median delivery coordinate per (city, traffic). Latitude and longitude
/// are medians taken independently.
pub fn median_delivery_points(data: &[DeliveryRecord]) -> Vec<DeliveryPointRow> {
    let mut map: BTreeMap<(String, _), (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for r in data {
        let e = map.entry((r.city.clone(), r.traffic)).or_default();
        e.0.push(r.delivery_lat);
        e.1.push(r.delivery_lon);
    }
    map.into_iter()
        .map(|((city, traffic), (lats, lons))| DeliveryPointRow {
            city,
            traffic,
            latitude: median(lats),
            longitude: median(lons),
        })
        .collect()
}

pub fn mean_rating_by_courier(data: &[DeliveryRecord]) -> Vec<CourierRatingRow> {
    group_values(data, |r| r.courier_id.clone(), |r| r.courier_rating)
        .into_iter()
        .map(|(courier_id, ratings)| CourierRatingRow {
            courier_id,
            mean_rating: average(&ratings),
        })
        .collect()
}

fn stats_rows<K: ToString>(groups: BTreeMap<K, Vec<f64>>) -> Vec<GroupStatsRow> {
    groups
        .into_iter()
        .map(|(k, v)| GroupStatsRow {
            group: k.to_string(),
            mean: average(&v),
            std: sample_std(&v),
        })
        .collect()
}

pub fn rating_stats_by_traffic(data: &[DeliveryRecord]) -> Vec<GroupStatsRow> {
    stats_rows(group_values(data, |r| r.traffic, |r| r.courier_rating))
}

pub fn rating_stats_by_weather(data: &[DeliveryRecord]) -> Vec<GroupStatsRow> {
    stats_rows(group_values(data, |r| r.weather.clone(), |r| r.courier_rating))
}

/// Up to `n` couriers per city ranked by their mean delivery time.
///
/// `Slowest` reverses both the city and the time ordering. Equal means keep
/// their grouped (courier id) order.
pub fn top_couriers_by_city(data: &[DeliveryRecord], n: usize, speed: Speed) -> Vec<CourierTimeRow> {
    let mut rows: Vec<CourierTimeRow> = group_values(
        data,
        |r| (r.city.clone(), r.courier_id.clone()),
        |r| r.time_taken_min,
    )
    .into_iter()
    .map(|((city, courier_id), times)| CourierTimeRow {
        city,
        courier_id,
        avg_time: average(&times),
    })
    .collect();

    rows.sort_by(|a, b| {
        let ord: Ordering = a
            .city
            .cmp(&b.city)
            .then_with(|| a.avg_time.total_cmp(&b.avg_time));
        match speed {
            Speed::Fastest => ord,
            Speed::Slowest => ord.reverse(),
        }
    });

    let mut taken: HashMap<String, usize> = HashMap::new();
    rows.into_iter()
        .filter(|row| {
            let seen = taken.entry(row.city.clone()).or_default();
            *seen += 1;
            *seen <= n
        })
        .collect()
}

/// Attach the haversine distance between restaurant and delivery point to
/// every record.
pub fn distances(data: &[DeliveryRecord]) -> Vec<RoutedDelivery<'_>> {
    data.iter()
        .map(|record| RoutedDelivery {
            record,
            distance_km: haversine_km(
                (record.delivery_lat, record.delivery_lon),
                (record.restaurant_lat, record.restaurant_lon),
            ),
        })
        .collect()
}

/// Mean delivery distance in km, rounded to 2 decimals. NaN on empty input.
pub fn mean_distance(data: &[DeliveryRecord]) -> f64 {
    let d: Vec<f64> = distances(data).iter().map(|r| r.distance_km).collect();
    round2(average(&d))
}

pub fn mean_distance_by_city(data: &[DeliveryRecord]) -> Vec<CityDistanceRow> {
    let mut map: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for routed in distances(data) {
        map.entry(routed.record.city.as_str())
            .or_default()
            .push(routed.distance_km);
    }
    map.into_iter()
        .map(|(city, d)| CityDistanceRow {
            city: city.to_string(),
            mean_distance_km: average(&d),
        })
        .collect()
}

pub fn time_stats_by_festival(data: &[DeliveryRecord]) -> Vec<FestivalTimeRow> {
    group_values(data, |r| r.festival, |r| r.time_taken_min)
        .into_iter()
        .map(|(festival, t)| FestivalTimeRow {
            festival,
            avg_time: average(&t),
            std_time: sample_std(&t),
        })
        .collect()
}

/// Mean or standard deviation of delivery time for one festival flag,
/// rounded to 2 decimals. NaN when the flag does not occur in `data`.
pub fn festival_time(data: &[DeliveryRecord], festival: Festival, stat: TimeStat) -> f64 {
    time_stats_by_festival(data)
        .into_iter()
        .find(|row| row.festival == festival)
        .map(|row| match stat {
            TimeStat::Mean => round2(row.avg_time),
            TimeStat::Std => round2(row.std_time),
        })
        .unwrap_or(f64::NAN)
}

pub fn time_stats_by_city(data: &[DeliveryRecord]) -> Vec<CityTimeRow> {
    group_values(data, |r| r.city.clone(), |r| r.time_taken_min)
        .into_iter()
        .map(|(city, t)| CityTimeRow {
            city,
            avg_time: average(&t),
            std_time: sample_std(&t),
        })
        .collect()
}

pub fn time_stats_by_city_traffic(data: &[DeliveryRecord]) -> Vec<CityTrafficTimeRow> {
    group_values(data, |r| (r.city.clone(), r.traffic), |r| r.time_taken_min)
        .into_iter()
        .map(|((city, traffic), t)| CityTrafficTimeRow {
            city,
            traffic,
            avg_time: average(&t),
            std_time: sample_std(&t),
        })
        .collect()
}

pub fn time_stats_by_city_order_type(data: &[DeliveryRecord]) -> Vec<CityOrderTypeTimeRow> {
    group_values(
        data,
        |r| (r.city.clone(), r.order_type.clone()),
        |r| r.time_taken_min,
    )
    .into_iter()
    .map(|((city, order_type), t)| CityOrderTypeTimeRow {
        city,
        order_type,
        avg_time: average(&t),
        std_time: sample_std(&t),
    })
    .collect()
}

pub fn courier_overview(data: &[DeliveryRecord]) -> CourierOverview {
    CourierOverview {
        oldest_age: data.iter().map(|r| r.courier_age).max(),
        youngest_age: data.iter().map(|r| r.courier_age).min(),
        best_vehicle_condition: data.iter().map(|r| r.vehicle_condition).max(),
        worst_vehicle_condition: data.iter().map(|r| r.vehicle_condition).min(),
    }
}

pub fn restaurant_overview(data: &[DeliveryRecord]) -> RestaurantOverview {
    let couriers: BTreeSet<&str> = data.iter().map(|r| r.courier_id.as_str()).collect();
    RestaurantOverview {
        unique_couriers: couriers.len(),
        mean_distance_km: mean_distance(data),
        festival_avg_time: festival_time(data, Festival::Yes, TimeStat::Mean),
        festival_std_time: festival_time(data, Festival::Yes, TimeStat::Std),
        regular_avg_time: festival_time(data, Festival::No, TimeStat::Mean),
        regular_std_time: festival_time(data, Festival::No, TimeStat::Std),
    }
}

/// First and last order dates, if any.
pub fn date_span(data: &[DeliveryRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let first = data.iter().map(|r| r.order_date).min()?;
    let last = data.iter().map(|r| r.order_date).max()?;
    Some((first, last))
}
