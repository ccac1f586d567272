pub mod dynamodb;
pub mod memory;
mod parse;
pub mod supabase;
pub use parse::{
    parse_number_field, parse_optional_number_field, parse_optional_timestamp_field,
    parse_string_field, parse_timestamp_field,
};

use anyhow::Result;
use tankwatch_core::{AtmosphericCondition, TankConfig, WaterLevel};

pub const WATER_LEVELS_TABLE: &str = "water_levels";
pub const ATMOSPHERIC_TABLE: &str = "atmospheric_conditions";

/// Source of telemetry readings. Every implementation returns readings newest-first.
#[allow(async_fn_in_trait)]
pub trait ReadingStore {
    async fn latest_water_levels(&self, limit: usize) -> Result<Vec<WaterLevel>>;
    async fn latest_atmospheric_conditions(
        &self,
        limit: usize,
    ) -> Result<Vec<AtmosphericCondition>>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsStore {
    async fn load_tank_config(&self) -> Result<Option<TankConfig>>;
    async fn save_tank_config(&self, config: &TankConfig) -> Result<()>;
}

pub enum Store {
    DynamoDb(dynamodb::DynamoDbReadings),
    Supabase(supabase::SupabaseReadings),
}

impl Store {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::DynamoDb(_) => "dynamodb",
            Store::Supabase(_) => "supabase",
        }
    }
}

impl ReadingStore for Store {
    async fn latest_water_levels(&self, limit: usize) -> Result<Vec<WaterLevel>> {
        match self {
            Store::DynamoDb(store) => store.latest_water_levels(limit).await,
            Store::Supabase(store) => store.latest_water_levels(limit).await,
        }
    }

    async fn latest_atmospheric_conditions(
        &self,
        limit: usize,
    ) -> Result<Vec<AtmosphericCondition>> {
        match self {
            Store::DynamoDb(store) => store.latest_atmospheric_conditions(limit).await,
            Store::Supabase(store) => store.latest_atmospheric_conditions(limit).await,
        }
    }
}
