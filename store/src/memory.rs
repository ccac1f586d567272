use crate::{ReadingStore, SettingsStore};
use anyhow::{Result, anyhow};
use std::sync::Mutex;
use tankwatch_core::{AtmosphericCondition, TankConfig, WaterLevel, sort_newest_first};

/// Process-local store, kept newest-first on every insert.
#[derive(Default)]
pub struct MemoryStore {
    water_levels: Mutex<Vec<WaterLevel>>,
    atmospheric: Mutex<Vec<AtmosphericCondition>>,
    tank_config: Mutex<Option<TankConfig>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_water_levels(self, mut levels: Vec<WaterLevel>) -> Self {
        sort_newest_first(&mut levels);
        Self {
            water_levels: Mutex::new(levels),
            ..self
        }
    }

    pub fn with_atmospheric_conditions(self, mut conditions: Vec<AtmosphericCondition>) -> Self {
        sort_newest_first(&mut conditions);
        Self {
            atmospheric: Mutex::new(conditions),
            ..self
        }
    }

    pub fn with_tank_config(self, config: TankConfig) -> Self {
        Self {
            tank_config: Mutex::new(Some(config)),
            ..self
        }
    }

    pub fn push_water_level(&self, level: WaterLevel) -> Result<()> {
        let mut levels = self
            .water_levels
            .lock()
            .map_err(|_| anyhow!("water levels lock poisoned"))?;
        levels.push(level);
        sort_newest_first(levels.as_mut_slice());
        Ok(())
    }
}

impl ReadingStore for MemoryStore {
    async fn latest_water_levels(&self, limit: usize) -> Result<Vec<WaterLevel>> {
        let levels = self
            .water_levels
            .lock()
            .map_err(|_| anyhow!("water levels lock poisoned"))?;
        Ok(levels.iter().take(limit).cloned().collect())
    }

    async fn latest_atmospheric_conditions(
        &self,
        limit: usize,
    ) -> Result<Vec<AtmosphericCondition>> {
        let conditions = self
            .atmospheric
            .lock()
            .map_err(|_| anyhow!("atmospheric conditions lock poisoned"))?;
        Ok(conditions.iter().take(limit).cloned().collect())
    }
}

impl SettingsStore for MemoryStore {
    async fn load_tank_config(&self) -> Result<Option<TankConfig>> {
        let config = self
            .tank_config
            .lock()
            .map_err(|_| anyhow!("tank config lock poisoned"))?;
        Ok(*config)
    }

    async fn save_tank_config(&self, config: &TankConfig) -> Result<()> {
        let mut stored = self
            .tank_config
            .lock()
            .map_err(|_| anyhow!("tank config lock poisoned"))?;
        *stored = Some(*config);
        Ok(())
    }
}
