use crate::{
    ReadingStore, SettingsStore, parse_number_field, parse_optional_number_field,
    parse_optional_timestamp_field, parse_string_field, parse_timestamp_field,
};
use anyhow::{Context, Result, anyhow};
use aws_sdk_dynamodb::{Client, types::AttributeValue};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tankwatch_core::{AtmosphericCondition, TankConfig, WaterLevel};

type Item = HashMap<String, AttributeValue>;

const QUERY_PAGE_SIZE: usize = 100;

pub struct DynamoDbReadings {
    client: Client,
    water_levels_table: String,
    atmospheric_table: String,
    tank_id: String,
}

impl DynamoDbReadings {
    pub fn new(
        client: Client,
        water_levels_table: impl Into<String>,
        atmospheric_table: impl Into<String>,
        tank_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            water_levels_table: water_levels_table.into(),
            atmospheric_table: atmospheric_table.into(),
            tank_id: tank_id.into(),
        }
    }
}

impl ReadingStore for DynamoDbReadings {
    async fn latest_water_levels(&self, limit: usize) -> Result<Vec<WaterLevel>> {
        let items = query_latest(&self.client, &self.water_levels_table, &self.tank_id, limit)
            .await
            .context("query water levels")?;
        items.iter().map(water_level_from_item).collect()
    }

    async fn latest_atmospheric_conditions(
        &self,
        limit: usize,
    ) -> Result<Vec<AtmosphericCondition>> {
        let items = query_latest(&self.client, &self.atmospheric_table, &self.tank_id, limit)
            .await
            .context("query atmospheric conditions")?;
        items.iter().map(atmospheric_from_item).collect()
    }
}

/// Newest-first items of one tank, following pagination until `limit` items are read.
async fn query_latest(
    client: &Client,
    table_name: &str,
    tank_id: &str,
    limit: usize,
) -> Result<Vec<Item>> {
    if limit == 0 {
        return Ok(Vec::new());
    }
    if table_name.is_empty() {
        return Err(anyhow!("readings table name is empty"));
    }

    let mut items = Vec::with_capacity(limit.min(QUERY_PAGE_SIZE));
    let mut last_evaluated_key: Option<Item> = None;

    while items.len() < limit {
        let page_size = (limit - items.len()).min(QUERY_PAGE_SIZE) as i32;
        let mut request = client
            .query()
            .table_name(table_name)
            .key_condition_expression("tank_id = :tank_id")
            .expression_attribute_values(":tank_id", AttributeValue::S(tank_id.to_string()))
            .scan_index_forward(false)
            .limit(page_size);

        if let Some(key) = last_evaluated_key.take() {
            request = request.set_exclusive_start_key(Some(key));
        }

        let response = request.send().await?;
        if let Some(page) = response.items {
            items.extend(page);
        }

        match response.last_evaluated_key {
            Some(key) if !key.is_empty() => {
                last_evaluated_key = Some(key);
            }
            _ => break,
        }
    }

    items.truncate(limit);
    Ok(items)
}

fn water_level_from_item(item: &Item) -> Result<WaterLevel> {
    Ok(WaterLevel {
        id: parse_string_field(item, "id")?,
        timestamp: parse_timestamp_field(item, "timestamp")?,
        volume_m3: parse_number_field::<f64>(item, "volume_m3")?,
        volume_liters: parse_number_field::<f64>(item, "volume_liters")?,
        created_at: parse_optional_timestamp_field(item, "created_at")?,
    })
}

fn atmospheric_from_item(item: &Item) -> Result<AtmosphericCondition> {
    Ok(AtmosphericCondition {
        id: parse_string_field(item, "id")?,
        timestamp: parse_timestamp_field(item, "timestamp")?,
        temperature: parse_number_field::<f64>(item, "temperature")?,
        humidity: parse_number_field::<f64>(item, "humidity")?,
        created_at: parse_optional_timestamp_field(item, "created_at")?,
    })
}

pub struct DynamoDbSettings {
    client: Client,
    table_name: String,
    tank_id: String,
}

impl DynamoDbSettings {
    pub fn new(client: Client, table_name: impl Into<String>, tank_id: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            tank_id: tank_id.into(),
        }
    }
}

impl SettingsStore for DynamoDbSettings {
    async fn load_tank_config(&self) -> Result<Option<TankConfig>> {
        if self.table_name.is_empty() {
            return Err(anyhow!("settings table name is empty"));
        }

        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("tank_id", AttributeValue::S(self.tank_id.clone()))
            .send()
            .await?;

        let Some(item) = response.item else {
            return Ok(None);
        };
        Ok(parse_optional_number_field::<f64>(&item, "max_capacity")?
            .map(|max_capacity_m3| TankConfig { max_capacity_m3 }))
    }

    async fn save_tank_config(&self, config: &TankConfig) -> Result<()> {
        if self.table_name.is_empty() {
            return Err(anyhow!("settings table name is empty"));
        }

        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("tank_id", AttributeValue::S(self.tank_id.clone()))
            .update_expression("SET max_capacity = :max_capacity, updated_at = :updated_at")
            .expression_attribute_values(
                ":max_capacity",
                AttributeValue::N(config.max_capacity_m3.to_string()),
            )
            .expression_attribute_values(
                ":updated_at",
                AttributeValue::N(current_time_millis().to_string()),
            )
            .send()
            .await
            .map(|_| ())
            .map_err(|err| err.into())
    }
}

fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
