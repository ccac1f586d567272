use crate::RAIN_THRESHOLD_LITERS;
use crate::readings::WaterLevel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub is_raining: bool,
    pub is_pump_active: bool,
}

/// Infers rain and pump activity from water levels ordered newest-first.
///
/// Rain: the newest reading is more than [`RAIN_THRESHOLD_LITERS`] above the previous one.
/// Pump: the three newest readings are strictly decreasing in time, i.e. `r0 < r1 < r2`.
/// Both flags are computed independently and may be set together. Fewer than two
/// readings yield the default status.
pub fn detect_rain_and_pump(readings: &[WaterLevel]) -> SystemStatus {
    let mut status = SystemStatus::default();

    let [latest, previous, older @ ..] = readings else {
        return status;
    };

    let volume_diff = latest.volume_liters - previous.volume_liters;
    status.is_raining = volume_diff > RAIN_THRESHOLD_LITERS;

    if let Some(third) = older.first() {
        let is_decreasing1 = latest.volume_liters < previous.volume_liters;
        let is_decreasing2 = previous.volume_liters < third.volume_liters;
        status.is_pump_active = is_decreasing1 && is_decreasing2;
    }

    status
}
