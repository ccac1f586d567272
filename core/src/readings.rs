use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterLevel {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub volume_m3: f64,
    pub volume_liters: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericCondition {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for WaterLevel {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for AtmosphericCondition {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Orders readings so that index 0 is the most recent one.
pub fn sort_newest_first<T: Timestamped>(readings: &mut [T]) {
    readings.sort_by_key(|reading| std::cmp::Reverse(reading.timestamp()));
}
