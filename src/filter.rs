use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::types::{DeliveryRecord, TrafficDensity};

/// Date cutoff and traffic selection supplied by the caller.
///
/// A record passes when its order date is strictly before `cutoff` and its
/// traffic density is in `traffic`. An empty selection passes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub cutoff: NaiveDate,
    pub traffic: BTreeSet<TrafficDensity>,
}

impl Filters {
    pub fn new(cutoff: NaiveDate, traffic: impl IntoIterator<Item = TrafficDensity>) -> Self {
        Self {
            cutoff,
            traffic: traffic.into_iter().collect(),
        }
    }

    pub fn matches(&self, record: &DeliveryRecord) -> bool {
        record.order_date < self.cutoff && self.traffic.contains(&record.traffic)
    }

    /// Return the matching records as a new table; `data` is left as is.
    pub fn apply(&self, data: &[DeliveryRecord]) -> Vec<DeliveryRecord> {
        data.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
