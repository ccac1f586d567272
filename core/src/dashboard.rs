use crate::readings::{AtmosphericCondition, WaterLevel};
use crate::stats::{average_volume_m3, fill_percent, trend_percent};
use crate::status::{SystemStatus, detect_rain_and_pump};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankFill {
    pub current_volume_m3: f64,
    pub max_capacity_m3: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterStatistics {
    pub average_volume_m3: f64,
    pub trend_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub total_readings: usize,
    pub water_readings: usize,
    pub atmospheric_readings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub status: SystemStatus,
    pub latest_water: Option<WaterLevel>,
    pub latest_atmospheric: Option<AtmosphericCondition>,
    pub tank: TankFill,
    pub statistics: WaterStatistics,
    pub activity: Activity,
}

impl Dashboard {
    /// Both sequences must be ordered newest-first.
    pub fn build(
        water: &[WaterLevel],
        atmospheric: &[AtmosphericCondition],
        max_capacity_m3: f64,
    ) -> Self {
        let latest_water = water.first().cloned();
        let current_volume_m3 = latest_water
            .as_ref()
            .map(|level| level.volume_m3)
            .unwrap_or_default();

        Self {
            status: detect_rain_and_pump(water),
            latest_atmospheric: atmospheric.first().cloned(),
            tank: TankFill {
                current_volume_m3,
                max_capacity_m3,
                percent: fill_percent(current_volume_m3, max_capacity_m3),
            },
            statistics: WaterStatistics {
                average_volume_m3: average_volume_m3(water),
                trend_percent: trend_percent(water),
            },
            activity: Activity {
                total_readings: water.len() + atmospheric.len(),
                water_readings: water.len(),
                atmospheric_readings: atmospheric.len(),
            },
            latest_water,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn water(liters: &[f64]) -> Vec<WaterLevel> {
        let newest = Utc.timestamp_opt(1_729_454_542, 0).unwrap();
        liters
            .iter()
            .enumerate()
            .map(|(index, liters)| WaterLevel {
                id: format!("w{index}"),
                timestamp: newest - Duration::minutes(index as i64),
                volume_m3: liters / 1000.0,
                volume_liters: *liters,
                created_at: None,
            })
            .collect()
    }

    fn atmospheric() -> Vec<AtmosphericCondition> {
        vec![AtmosphericCondition {
            id: "a0".to_string(),
            timestamp: Utc.timestamp_opt(1_729_454_542, 0).unwrap(),
            temperature: 18.3,
            humidity: 71.0,
            created_at: None,
        }]
    }

    #[test]
    fn build_empty_dashboard() {
        let dashboard = Dashboard::build(&[], &[], 10.0);
        assert_eq!(dashboard.status, SystemStatus::default());
        assert_eq!(dashboard.latest_water, None);
        assert_eq!(dashboard.latest_atmospheric, None);
        assert_eq!(dashboard.tank.current_volume_m3, 0.0);
        assert_eq!(dashboard.tank.percent, 0.0);
        assert_eq!(dashboard.activity.total_readings, 0);
    }

    #[test]
    fn build_dashboard_from_readings() {
        let water = water(&[2500.0, 2000.0, 1900.0]);
        let dashboard = Dashboard::build(&water, &atmospheric(), 10.0);

        assert!(dashboard.status.is_raining);
        assert!(!dashboard.status.is_pump_active);
        assert_eq!(dashboard.latest_water.as_ref().map(|w| w.id.as_str()), Some("w0"));
        assert_eq!(dashboard.latest_atmospheric.as_ref().map(|a| a.humidity), Some(71.0));
        assert!((dashboard.tank.current_volume_m3 - 2.5).abs() < 1e-9);
        assert!((dashboard.tank.percent - 25.0).abs() < 1e-9);
        assert!((dashboard.statistics.average_volume_m3 - 2.1333333333).abs() < 1e-6);
        assert_eq!(
            dashboard.activity,
            Activity {
                total_readings: 4,
                water_readings: 3,
                atmospheric_readings: 1,
            }
        );
    }
}
