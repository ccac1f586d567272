use anyhow::{Result, anyhow};
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub fn parse_string_field(item: &HashMap<String, AttributeValue>, field: &str) -> Result<String> {
    match item.get(field) {
        Some(AttributeValue::S(s)) => Ok(s.clone()),
        Some(AttributeValue::N(n)) => Ok(n.clone()),
        _ => Err(anyhow!("Missing or invalid '{}' field", field)),
    }
}

pub fn parse_number_field<T: std::str::FromStr>(
    item: &HashMap<String, AttributeValue>,
    field: &str,
) -> Result<T>
where
    <T as std::str::FromStr>::Err: std::fmt::Display,
{
    parse_optional_number_field(item, field)?
        .ok_or_else(|| anyhow!("Missing or invalid '{}' field", field))
}

pub fn parse_optional_number_field<T: std::str::FromStr>(
    item: &HashMap<String, AttributeValue>,
    field: &str,
) -> Result<Option<T>>
where
    <T as std::str::FromStr>::Err: std::fmt::Display,
{
    let raw = match item.get(field) {
        Some(AttributeValue::N(n)) => n,
        Some(AttributeValue::S(s)) => s,
        _ => return Ok(None),
    };
    raw.parse::<T>().map(Some).map_err(|e| {
        anyhow!(
            "Failed to parse '{}' field with value '{}' as number: {}",
            field,
            raw,
            e
        )
    })
}

/// Reads an epoch-milliseconds attribute as a UTC instant.
pub fn parse_timestamp_field(
    item: &HashMap<String, AttributeValue>,
    field: &str,
) -> Result<DateTime<Utc>> {
    parse_optional_timestamp_field(item, field)?
        .ok_or_else(|| anyhow!("Missing or invalid '{}' field", field))
}

pub fn parse_optional_timestamp_field(
    item: &HashMap<String, AttributeValue>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    let Some(millis) = parse_optional_number_field::<i64>(item, field)? else {
        return Ok(None);
    };
    DateTime::from_timestamp_millis(millis)
        .map(Some)
        .ok_or_else(|| anyhow!("'{}' field value {} is out of range", field, millis))
}
