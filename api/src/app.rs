use crate::config::AppConfig;
use crate::logging::Logger;
use crate::request::Request;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tankwatch_core::dashboard::Dashboard;
use tankwatch_core::format::format_dashboard_message;
use tankwatch_core::settings::{CapacityError, parse_capacity, validate_capacity};
use tankwatch_core::{TankConfig, TankSettings, WaterLevel};
use tankwatch_store::{ReadingStore, SettingsStore};

const MAX_HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Serialize)]
pub(crate) struct ApiResponse {
    pub(crate) status_code: u16,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) data: Option<Value>,
}

impl ApiResponse {
    fn ok(message: impl Into<String>, data: impl Serialize) -> Result<Self> {
        Ok(Self {
            status_code: 200,
            message: message.into(),
            data: Some(serde_json::to_value(data)?),
        })
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status_code: 400,
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Serialize)]
struct DashboardData<'a> {
    dashboard: &'a Dashboard,
    message: String,
}

#[derive(Serialize)]
struct HistoryData<'a> {
    count: usize,
    water_levels: &'a [WaterLevel],
}

pub(crate) struct App<R, S> {
    tank_id: String,
    readings_limit: usize,
    readings: R,
    settings_store: Option<S>,
    settings: TankSettings,
}

impl<R: ReadingStore, S: SettingsStore> App<R, S> {
    /// Loads the persisted tank configuration, falling back to the configured default.
    pub(crate) async fn bootstrap(
        config: &AppConfig,
        readings: R,
        settings_store: Option<S>,
    ) -> Self {
        let logger = Logger::new().tank_id(&config.tank_id);
        let default_config = TankConfig {
            max_capacity_m3: config.default_max_capacity_m3,
        };

        let initial = match settings_store.as_ref() {
            Some(store) => match store.load_tank_config().await {
                Ok(Some(stored)) => match validate_capacity(stored.max_capacity_m3) {
                    Ok(_) => stored,
                    Err(err) => {
                        logger.clone().max_capacity(stored.max_capacity_m3).warn(
                            "settings.invalid_stored_capacity",
                            &err,
                            "Ignoring stored tank capacity",
                        );
                        default_config
                    }
                },
                Ok(None) => default_config,
                Err(err) => {
                    logger.error(
                        "settings.load_failed",
                        &err,
                        "Failed to load tank settings, using default",
                    );
                    default_config
                }
            },
            None => default_config,
        };

        logger
            .max_capacity(initial.max_capacity_m3)
            .info("settings.loaded", "Tank settings loaded");

        Self {
            tank_id: config.tank_id.clone(),
            readings_limit: config.readings_limit,
            readings,
            settings_store,
            settings: TankSettings::new(initial),
        }
    }

    pub(crate) fn settings(&self) -> &TankSettings {
        &self.settings
    }

    pub(crate) async fn handle(&self, request: Request) -> Result<ApiResponse> {
        match request {
            Request::Dashboard => self.dashboard().await,
            Request::History { limit } => self.history(limit).await,
            Request::Settings => ApiResponse::ok("Paramètres", self.settings.current()),
            Request::SetCapacity { max_capacity } => self.set_capacity(&max_capacity).await,
        }
    }

    async fn dashboard(&self) -> Result<ApiResponse> {
        let (water, atmospheric) = futures::try_join!(
            self.readings.latest_water_levels(self.readings_limit),
            self.readings
                .latest_atmospheric_conditions(self.readings_limit)
        )
        .context("load readings")?;

        let dashboard = Dashboard::build(&water, &atmospheric, self.settings.max_capacity_m3());
        Logger::new()
            .action("dashboard")
            .tank_id(&self.tank_id)
            .readings(dashboard.activity.total_readings)
            .max_capacity(dashboard.tank.max_capacity_m3)
            .status(dashboard.status.is_raining, dashboard.status.is_pump_active)
            .info("dashboard.built", "Dashboard built");

        let message = format_dashboard_message(&dashboard);
        ApiResponse::ok(
            "Tableau de bord",
            DashboardData {
                dashboard: &dashboard,
                message,
            },
        )
    }

    async fn history(&self, limit: Option<usize>) -> Result<ApiResponse> {
        let limit = limit.unwrap_or(self.readings_limit).min(MAX_HISTORY_LIMIT);
        let water_levels = self
            .readings
            .latest_water_levels(limit)
            .await
            .context("load water levels")?;

        Logger::new()
            .action("history")
            .tank_id(&self.tank_id)
            .readings(water_levels.len())
            .info("history.loaded", "History loaded");

        let message = if water_levels.is_empty() {
            "Aucune donnée disponible"
        } else {
            "Historique complet"
        };
        ApiResponse::ok(
            message,
            HistoryData {
                count: water_levels.len(),
                water_levels: &water_levels,
            },
        )
    }

    async fn set_capacity(&self, raw: &Value) -> Result<ApiResponse> {
        let logger = Logger::new().action("set_capacity").tank_id(&self.tank_id);
        let capacity = match capacity_from_value(raw).and_then(validate_capacity) {
            Ok(capacity) => capacity,
            Err(err) => {
                logger.warn("settings.capacity_rejected", &err, "Rejected tank capacity");
                return Ok(ApiResponse::bad_request(err.user_message()));
            }
        };

        let config = TankConfig {
            max_capacity_m3: capacity,
        };
        if let Some(store) = self.settings_store.as_ref() {
            store
                .save_tank_config(&config)
                .await
                .context("save_tank_config")?;
        }
        let config = self.settings.set_max_capacity(config.max_capacity_m3)?;

        logger
            .max_capacity(config.max_capacity_m3)
            .info("settings.capacity_saved", "Tank capacity saved");
        ApiResponse::ok("Capacité maximale enregistrée avec succès", config)
    }
}

fn capacity_from_value(value: &Value) -> Result<f64, CapacityError> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| CapacityError::NotANumber(number.to_string())),
        Value::String(text) => parse_capacity(text),
        other => Err(CapacityError::NotANumber(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;
    use tankwatch_core::AtmosphericCondition;
    use tankwatch_store::memory::MemoryStore;

    fn app_config() -> AppConfig {
        AppConfig {
            tank_id: "main".to_string(),
            readings_limit: 100,
            backend: BackendConfig::DynamoDb {
                water_levels_table: "WaterLevels".to_string(),
                atmospheric_table: "Atmospheric".to_string(),
            },
            settings_table: None,
            default_max_capacity_m3: 10.0,
        }
    }

    // Oldest first on purpose, the store orders them.
    fn water(liters: &[f64]) -> Vec<WaterLevel> {
        let oldest = Utc.timestamp_opt(1_729_454_542, 0).unwrap();
        liters
            .iter()
            .enumerate()
            .map(|(index, liters)| WaterLevel {
                id: format!("w{index}"),
                timestamp: oldest + Duration::minutes(5 * index as i64),
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
            temperature: 21.5,
            humidity: 40.0,
            created_at: None,
        }]
    }

    async fn app(
        readings: MemoryStore,
        settings_store: Option<MemoryStore>,
    ) -> App<MemoryStore, MemoryStore> {
        App::bootstrap(&app_config(), readings, settings_store).await
    }

    #[tokio::test]
    async fn dashboard_reports_pump_from_draining_tank() {
        let readings = MemoryStore::new()
            .with_water_levels(water(&[3000.0, 2900.0, 2800.0]))
            .with_atmospheric_conditions(atmospheric());
        let app = app(readings, None).await;

        let response = app.handle(Request::Dashboard).await.unwrap();
        assert_eq!(response.status_code, 200);

        let data = response.data.unwrap();
        assert_eq!(
            data["dashboard"]["status"],
            json!({"is_raining": false, "is_pump_active": true})
        );
        assert_eq!(data["dashboard"]["latest_water"]["id"], json!("w2"));
        assert_eq!(data["dashboard"]["activity"]["total_readings"], json!(4));
        assert!(
            data["message"]
                .as_str()
                .unwrap()
                .contains("État de la pompe: EN MARCHE")
        );
    }

    #[tokio::test]
    async fn history_is_newest_first_and_limited() {
        let readings = MemoryStore::new().with_water_levels(water(&[1000.0, 1100.0, 1200.0]));
        let app = app(readings, None).await;

        let response = app
            .handle(Request::History { limit: Some(2) })
            .await
            .unwrap();
        let data = response.data.unwrap();
        assert_eq!(data["count"], json!(2));
        assert_eq!(data["water_levels"][0]["id"], json!("w2"));
        assert_eq!(data["water_levels"][1]["id"], json!("w1"));
    }

    #[tokio::test]
    async fn history_limit_is_capped() {
        let readings = MemoryStore::new().with_water_levels(water(&[1000.0; 1005]));
        let app = app(readings, None).await;

        let response = app
            .handle(Request::History { limit: Some(5000) })
            .await
            .unwrap();
        assert_eq!(response.data.unwrap()["count"], json!(MAX_HISTORY_LIMIT));
    }

    #[tokio::test]
    async fn history_without_readings() {
        let app = app(MemoryStore::new(), None).await;
        let response = app.handle(Request::History { limit: None }).await.unwrap();
        assert_eq!(response.message, "Aucune donnée disponible");
        assert_eq!(response.data.unwrap()["count"], json!(0));
    }

    #[tokio::test]
    async fn bootstrap_uses_stored_capacity() {
        let settings_store = MemoryStore::new().with_tank_config(TankConfig {
            max_capacity_m3: 6.5,
        });
        let app = app(MemoryStore::new(), Some(settings_store)).await;
        assert_eq!(app.settings().max_capacity_m3(), 6.5);
    }

    #[tokio::test]
    async fn bootstrap_ignores_invalid_stored_capacity() {
        let settings_store = MemoryStore::new().with_tank_config(TankConfig {
            max_capacity_m3: -2.0,
        });
        let app = app(MemoryStore::new(), Some(settings_store)).await;
        assert_eq!(app.settings().max_capacity_m3(), 10.0);
    }

    #[tokio::test]
    async fn set_capacity_persists_and_notifies() {
        let app = app(MemoryStore::new(), Some(MemoryStore::new())).await;
        let mut receiver = app.settings().subscribe();

        let response = app
            .handle(Request::SetCapacity {
                max_capacity: json!("12.5"),
            })
            .await
            .unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.data.unwrap(), json!({"max_capacity_m3": 12.5}));

        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow().max_capacity_m3, 12.5);

        let stored = app
            .settings_store
            .as_ref()
            .unwrap()
            .load_tank_config()
            .await
            .unwrap();
        assert_eq!(
            stored,
            Some(TankConfig {
                max_capacity_m3: 12.5
            })
        );
    }

    #[tokio::test]
    async fn set_capacity_rejects_invalid_values() {
        let app = app(MemoryStore::new(), Some(MemoryStore::new())).await;

        for raw in [json!(0), json!(-1.5), json!("abc"), json!(null), json!(true)] {
            let response = app
                .handle(Request::SetCapacity { max_capacity: raw })
                .await
                .unwrap();
            assert_eq!(response.status_code, 400);
        }
        assert_eq!(app.settings().max_capacity_m3(), 10.0);
        let stored = app
            .settings_store
            .as_ref()
            .unwrap()
            .load_tank_config()
            .await
            .unwrap();
        assert_eq!(stored, None);
    }

    #[tokio::test]
    async fn settings_reports_current_config() {
        let app = app(MemoryStore::new(), None).await;
        let response = app.handle(Request::Settings).await.unwrap();
        assert_eq!(response.data.unwrap(), json!({"max_capacity_m3": 10.0}));
    }
}
