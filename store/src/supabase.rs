use crate::{ATMOSPHERIC_TABLE, ReadingStore, WATER_LEVELS_TABLE};
use anyhow::{Context, Result};
use reqwest::Client as HTTPClient;
use serde::de::DeserializeOwned;
use tankwatch_core::{AtmosphericCondition, WaterLevel, sort_newest_first};

/// Readings served by a Supabase project through its PostgREST endpoint.
pub struct SupabaseReadings {
    http_client: HTTPClient,
    base_url: String,
    api_key: String,
}

impl SupabaseReadings {
    pub fn new(
        http_client: HTTPClient,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn fetch_latest_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        limit: usize,
    ) -> Result<Vec<T>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let url = latest_rows_url(&self.base_url, table, limit);
        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        response.error_for_status_ref()?;

        response
            .json()
            .await
            .with_context(|| format!("decode rows of '{table}'"))
    }
}

impl ReadingStore for SupabaseReadings {
    async fn latest_water_levels(&self, limit: usize) -> Result<Vec<WaterLevel>> {
        let mut levels: Vec<WaterLevel> = self.fetch_latest_rows(WATER_LEVELS_TABLE, limit).await?;
        // PostgREST already orders by timestamp, equal timestamps keep their row order
        sort_newest_first(&mut levels);
        Ok(levels)
    }

    async fn latest_atmospheric_conditions(
        &self,
        limit: usize,
    ) -> Result<Vec<AtmosphericCondition>> {
        let mut conditions: Vec<AtmosphericCondition> =
            self.fetch_latest_rows(ATMOSPHERIC_TABLE, limit).await?;
        sort_newest_first(&mut conditions);
        Ok(conditions)
    }
}

fn latest_rows_url(base_url: &str, table: &str, limit: usize) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!("{base_url}/rest/v1/{table}?select=*&order=timestamp.desc&limit={limit}")
}
