use anyhow::{Result, anyhow};
use tankwatch_core::DEFAULT_MAX_CAPACITY_M3;
use tankwatch_core::settings::validate_capacity;

const DEFAULT_TANK_ID: &str = "main";
const DEFAULT_READINGS_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    DynamoDb {
        water_levels_table: String,
        atmospheric_table: String,
    },
    Supabase {
        url: String,
        api_key: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub tank_id: String,
    pub readings_limit: usize,
    pub backend: BackendConfig,
    pub settings_table: Option<String>,
    pub default_max_capacity_m3: f64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &str| value(name).ok_or_else(|| anyhow!("Missing env var: {name}"));

        let backend = match value("SUPABASE_URL") {
            Some(url) => BackendConfig::Supabase {
                url,
                api_key: required("SUPABASE_ANON_KEY")?,
            },
            None => BackendConfig::DynamoDb {
                water_levels_table: required("WATER_LEVELS_TABLE_NAME")?,
                atmospheric_table: required("ATMOSPHERIC_TABLE_NAME")?,
            },
        };

        let readings_limit = match value("READINGS_LIMIT") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| anyhow!("Invalid READINGS_LIMIT '{raw}': {e}"))?,
            None => DEFAULT_READINGS_LIMIT,
        };

        let default_max_capacity_m3 = match value("TANK_MAX_CAPACITY") {
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|e| anyhow!("Invalid TANK_MAX_CAPACITY '{raw}': {e}"))
                .and_then(|capacity| {
                    validate_capacity(capacity)
                        .map_err(|e| anyhow!("Invalid TANK_MAX_CAPACITY '{raw}': {e}"))
                })?,
            None => DEFAULT_MAX_CAPACITY_M3,
        };

        Ok(Self {
            tank_id: value("TANK_ID").unwrap_or_else(|| DEFAULT_TANK_ID.to_string()),
            readings_limit,
            backend,
            settings_table: value("SETTINGS_TABLE_NAME"),
            default_max_capacity_m3,
        })
    }
}
