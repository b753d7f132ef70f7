use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

use crate::util::{display_2dp, display_coord};

/// One line of the delivery CSV exactly as it sits on disk.
///
/// Every column is optional text; the cleaner decides what counts as missing
/// and how each value is typed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawRow {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[serde(rename = "Delivery_person_ID")]
    pub delivery_person_id: Option<String>,
    #[serde(rename = "Delivery_person_Age")]
    pub delivery_person_age: Option<String>,
    #[serde(rename = "Delivery_person_Ratings")]
    pub delivery_person_ratings: Option<String>,
    #[serde(rename = "Restaurant_latitude")]
    pub restaurant_latitude: Option<String>,
    #[serde(rename = "Restaurant_longitude")]
    pub restaurant_longitude: Option<String>,
    #[serde(rename = "Delivery_location_latitude")]
    pub delivery_location_latitude: Option<String>,
    #[serde(rename = "Delivery_location_longitude")]
    pub delivery_location_longitude: Option<String>,
    #[serde(rename = "Order_Date")]
    pub order_date: Option<String>,
    #[serde(rename = "Time_Orderd")]
    pub time_orderd: Option<String>,
    #[serde(rename = "Time_Order_picked")]
    pub time_order_picked: Option<String>,
    #[serde(rename = "Weatherconditions")]
    pub weatherconditions: Option<String>,
    #[serde(rename = "Road_traffic_density")]
    pub road_traffic_density: Option<String>,
    #[serde(rename = "Vehicle_condition")]
    pub vehicle_condition: Option<String>,
    #[serde(rename = "Type_of_order")]
    pub type_of_order: Option<String>,
    #[serde(rename = "Type_of_vehicle")]
    pub type_of_vehicle: Option<String>,
    #[serde(rename = "multiple_deliveries")]
    pub multiple_deliveries: Option<String>,
    #[serde(rename = "Festival")]
    pub festival: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "Time_taken(min)")]
    pub time_taken_min: Option<String>,
}

impl RawRow {
    /// Header names in file order.
    pub const COLUMNS: [&'static str; 20] = [
        "ID",
        "Delivery_person_ID",
        "Delivery_person_Age",
        "Delivery_person_Ratings",
        "Restaurant_latitude",
        "Restaurant_longitude",
        "Delivery_location_latitude",
        "Delivery_location_longitude",
        "Order_Date",
        "Time_Orderd",
        "Time_Order_picked",
        "Weatherconditions",
        "Road_traffic_density",
        "Vehicle_condition",
        "Type_of_order",
        "Type_of_vehicle",
        "multiple_deliveries",
        "Festival",
        "City",
        "Time_taken(min)",
    ];

    /// Cell values in the same order as [`RawRow::COLUMNS`].
    pub fn cells(&self) -> [Option<&str>; 20] {
        [
            self.id.as_deref(),
            self.delivery_person_id.as_deref(),
            self.delivery_person_age.as_deref(),
            self.delivery_person_ratings.as_deref(),
            self.restaurant_latitude.as_deref(),
            self.restaurant_longitude.as_deref(),
            self.delivery_location_latitude.as_deref(),
            self.delivery_location_longitude.as_deref(),
            self.order_date.as_deref(),
            self.time_orderd.as_deref(),
            self.time_order_picked.as_deref(),
            self.weatherconditions.as_deref(),
            self.road_traffic_density.as_deref(),
            self.vehicle_condition.as_deref(),
            self.type_of_order.as_deref(),
            self.type_of_vehicle.as_deref(),
            self.multiple_deliveries.as_deref(),
            self.festival.as_deref(),
            self.city.as_deref(),
            self.time_taken_min.as_deref(),
        ]
    }
}

/// Road traffic density at order time.
///
/// Variants are declared in label order so the derived ordering matches
/// sorted labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrafficDensity {
    High,
    Jam,
    Low,
    Medium,
}

impl TrafficDensity {
    pub const ALL: [TrafficDensity; 4] = [
        TrafficDensity::Low,
        TrafficDensity::Medium,
        TrafficDensity::High,
        TrafficDensity::Jam,
    ];

    /// Categories selected when the caller supplies none.
    pub const DEFAULT_SELECTION: [TrafficDensity; 3] = [
        TrafficDensity::Low,
        TrafficDensity::Medium,
        TrafficDensity::Jam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficDensity::High => "High",
            TrafficDensity::Jam => "Jam",
            TrafficDensity::Low => "Low",
            TrafficDensity::Medium => "Medium",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for TrafficDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Festival {
    No,
    Yes,
}

impl Festival {
    pub fn as_str(&self) -> &'static str {
        match self {
            Festival::No => "No",
            Festival::Yes => "Yes",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "No" => Some(Festival::No),
            "Yes" => Some(Festival::Yes),
            _ => None,
        }
    }
}

impl fmt::Display for Festival {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully typed delivery order. Every field is present once cleaned.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryRecord {
    pub id: String,
    pub courier_id: String,
    pub courier_age: u32,
    pub courier_rating: f64,
    pub restaurant_lat: f64,
    pub restaurant_lon: f64,
    pub delivery_lat: f64,
    pub delivery_lon: f64,
    pub order_date: NaiveDate,
    pub time_ordered: String,
    pub time_picked: String,
    pub weather: String,
    pub traffic: TrafficDensity,
    pub vehicle_condition: u32,
    pub order_type: String,
    pub vehicle_type: String,
    pub multiple_deliveries: u32,
    pub festival: Festival,
    pub city: String,
    pub time_taken_min: f64,
}

impl From<&DeliveryRecord> for RawRow {
    /// Render a cleaned record back into on-disk form. Cleaning the result
    /// yields the same record again.
    fn from(r: &DeliveryRecord) -> Self {
        RawRow {
            id: Some(r.id.clone()),
            delivery_person_id: Some(r.courier_id.clone()),
            delivery_person_age: Some(r.courier_age.to_string()),
            delivery_person_ratings: Some(r.courier_rating.to_string()),
            restaurant_latitude: Some(r.restaurant_lat.to_string()),
            restaurant_longitude: Some(r.restaurant_lon.to_string()),
            delivery_location_latitude: Some(r.delivery_lat.to_string()),
            delivery_location_longitude: Some(r.delivery_lon.to_string()),
            order_date: Some(r.order_date.format("%d-%m-%Y").to_string()),
            time_orderd: Some(r.time_ordered.clone()),
            time_order_picked: Some(r.time_picked.clone()),
            weatherconditions: Some(r.weather.clone()),
            road_traffic_density: Some(r.traffic.as_str().to_string()),
            vehicle_condition: Some(r.vehicle_condition.to_string()),
            type_of_order: Some(r.order_type.clone()),
            type_of_vehicle: Some(r.vehicle_type.clone()),
            multiple_deliveries: Some(r.multiple_deliveries.to_string()),
            festival: Some(r.festival.as_str().to_string()),
            city: Some(r.city.clone()),
            time_taken_min: Some(r.time_taken_min.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct DailyOrdersRow {
    #[serde(rename = "OrderDate")]
    #[tabled(rename = "OrderDate")]
    pub date: NaiveDate,
    #[serde(rename = "Orders")]
    #[tabled(rename = "Orders")]
    pub orders: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct TrafficShareRow {
    #[serde(rename = "RoadTrafficDensity")]
    #[tabled(rename = "RoadTrafficDensity")]
    pub traffic: TrafficDensity,
    #[serde(rename = "Orders")]
    #[tabled(rename = "Orders")]
    pub orders: usize,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share", display_with = "display_2dp")]
    pub share: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct WeeklyOrdersRow {
    #[serde(rename = "WeekOfYear")]
    #[tabled(rename = "WeekOfYear")]
    pub week: String,
    #[serde(rename = "Orders")]
    #[tabled(rename = "Orders")]
    pub orders: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct WeeklyCourierRow {
    #[serde(rename = "WeekOfYear")]
    #[tabled(rename = "WeekOfYear")]
    pub week: String,
    #[serde(rename = "Orders")]
    #[tabled(rename = "Orders")]
    pub orders: usize,
    #[serde(rename = "Couriers")]
    #[tabled(rename = "Couriers")]
    pub couriers: usize,
    #[serde(rename = "OrdersPerCourier")]
    #[tabled(rename = "OrdersPerCourier", display_with = "display_2dp")]
    pub orders_per_courier: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CityTrafficCountRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "RoadTrafficDensity")]
    #[tabled(rename = "RoadTrafficDensity")]
    pub traffic: TrafficDensity,
    #[serde(rename = "Orders")]
    #[tabled(rename = "Orders")]
    pub orders: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct DeliveryPointRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "RoadTrafficDensity")]
    #[tabled(rename = "RoadTrafficDensity")]
    pub traffic: TrafficDensity,
    #[serde(rename = "Latitude")]
    #[tabled(rename = "Latitude", display_with = "display_coord")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    #[tabled(rename = "Longitude", display_with = "display_coord")]
    pub longitude: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CourierRatingRow {
    #[serde(rename = "DeliveryPersonID")]
    #[tabled(rename = "DeliveryPersonID")]
    pub courier_id: String,
    #[serde(rename = "MeanRating")]
    #[tabled(rename = "MeanRating", display_with = "display_2dp")]
    pub mean_rating: f64,
}

/// Mean and sample standard deviation of one value, keyed by a single label.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct GroupStatsRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Mean")]
    #[tabled(rename = "Mean", display_with = "display_2dp")]
    pub mean: f64,
    #[serde(rename = "Std")]
    #[tabled(rename = "Std", display_with = "display_2dp")]
    pub std: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CourierTimeRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "DeliveryPersonID")]
    #[tabled(rename = "DeliveryPersonID")]
    pub courier_id: String,
    #[serde(rename = "AvgTime")]
    #[tabled(rename = "AvgTime", display_with = "display_2dp")]
    pub avg_time: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CityDistanceRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "MeanDistanceKm")]
    #[tabled(rename = "MeanDistanceKm", display_with = "display_2dp")]
    pub mean_distance_km: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct FestivalTimeRow {
    #[serde(rename = "Festival")]
    #[tabled(rename = "Festival")]
    pub festival: Festival,
    #[serde(rename = "AvgTime")]
    #[tabled(rename = "AvgTime", display_with = "display_2dp")]
    pub avg_time: f64,
    #[serde(rename = "StdTime")]
    #[tabled(rename = "StdTime", display_with = "display_2dp")]
    pub std_time: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CityTimeRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "AvgTime")]
    #[tabled(rename = "AvgTime", display_with = "display_2dp")]
    pub avg_time: f64,
    #[serde(rename = "StdTime")]
    #[tabled(rename = "StdTime", display_with = "display_2dp")]
    pub std_time: f64,
}

/// City → traffic pairs for the hierarchical delivery-time breakdown.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CityTrafficTimeRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "RoadTrafficDensity")]
    #[tabled(rename = "RoadTrafficDensity")]
    pub traffic: TrafficDensity,
    #[serde(rename = "AvgTime")]
    #[tabled(rename = "AvgTime", display_with = "display_2dp")]
    pub avg_time: f64,
    #[serde(rename = "StdTime")]
    #[tabled(rename = "StdTime", display_with = "display_2dp")]
    pub std_time: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CityOrderTypeTimeRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "TypeOfOrder")]
    #[tabled(rename = "TypeOfOrder")]
    pub order_type: String,
    #[serde(rename = "AvgTime")]
    #[tabled(rename = "AvgTime", display_with = "display_2dp")]
    pub avg_time: f64,
    #[serde(rename = "StdTime")]
    #[tabled(rename = "StdTime", display_with = "display_2dp")]
    pub std_time: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CourierOverview {
    pub oldest_age: Option<u32>,
    pub youngest_age: Option<u32>,
    pub best_vehicle_condition: Option<u32>,
    pub worst_vehicle_condition: Option<u32>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RestaurantOverview {
    pub unique_couriers: usize,
    pub mean_distance_km: f64,
    pub festival_avg_time: f64,
    pub festival_std_time: f64,
    pub regular_avg_time: f64,
    pub regular_std_time: f64,
}
