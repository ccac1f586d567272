use anyhow::Result;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as AWSClient;
use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use reqwest::Client as HTTPClient;
use serde_json::{Value, json};
use std::time::Duration;
use tankwatch_core::TankConfig;
use tankwatch_store::dynamodb::{DynamoDbReadings, DynamoDbSettings};
use tankwatch_store::supabase::SupabaseReadings;
use tankwatch_store::{ReadingStore, SettingsStore, Store};
use tokio::sync::{OnceCell, watch};
use tracing::instrument;
use tracing_subscriber::EnvFilter;

use crate::app::{ApiResponse, App};
use crate::config::{AppConfig, BackendConfig};
mod app;
mod config;
mod logging;
mod request;

#[instrument(skip_all)]
async fn lambda_handler<R: ReadingStore, S: SettingsStore>(
    app: &App<R, S>,
    event: LambdaEvent<Value>,
) -> Result<Value, LambdaError> {
    let response = match request::parse_request(&event.payload) {
        Ok(request) => {
            let action = request.name();
            app.handle(request).await.inspect_err(|e| {
                logging::Logger::new()
                    .action(action)
                    .error("request.failed", e, "Error handling request");
            })?
        }
        Err(err) => {
            logging::Logger::new().warn("request.invalid", &err, "Invalid request");
            ApiResponse::bad_request(format!("{err:#}"))
        }
    };

    // API Gateway proxy integrations expect `statusCode` and a string `body`.
    if event.payload.get("body").is_some() {
        return Ok(json!({
            "statusCode": response.status_code,
            "headers": {"content-type": "application/json"},
            "body": serde_json::to_string(&response)?,
        }));
    }
    Ok(serde_json::to_value(response)?)
}

async fn dynamodb_client() -> AWSClient {
    AWSClient::new(&aws_config::defaults(BehaviorVersion::latest()).load().await)
}

async fn log_capacity_changes(mut receiver: watch::Receiver<TankConfig>, tank_id: String) {
    while receiver.changed().await.is_ok() {
        let config = *receiver.borrow_and_update();
        logging::Logger::new()
            .tank_id(&tank_id)
            .max_capacity(config.max_capacity_m3)
            .info("settings.capacity_changed", "Tank capacity changed");
    }
}

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()) // Enable log level filtering via `RUST_LOG` env var
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .with_target(false)
        .without_time()
        .init();

    let config = AppConfig::from_env()?;

    let aws_client = OnceCell::new();
    let readings = match &config.backend {
        BackendConfig::DynamoDb {
            water_levels_table,
            atmospheric_table,
        } => Store::DynamoDb(DynamoDbReadings::new(
            aws_client.get_or_init(dynamodb_client).await.clone(),
            water_levels_table,
            atmospheric_table,
            &config.tank_id,
        )),
        BackendConfig::Supabase { url, api_key } => {
            let http_client = HTTPClient::builder()
                .timeout(Duration::from_secs(10))
                .build()?;
            Store::Supabase(SupabaseReadings::new(http_client, url, api_key))
        }
    };
    let settings_store = match &config.settings_table {
        Some(table_name) => Some(DynamoDbSettings::new(
            aws_client.get_or_init(dynamodb_client).await.clone(),
            table_name,
            &config.tank_id,
        )),
        None => None,
    };

    logging::Logger::new()
        .tank_id(&config.tank_id)
        .backend(readings.backend_name())
        .info("startup", "Readings backend configured");

    let app = App::bootstrap(&config, readings, settings_store).await;
    tokio::spawn(log_capacity_changes(
        app.settings().subscribe(),
        config.tank_id.clone(),
    ));

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| async {
        lambda_handler(&app, event).await
    }))
    .await?;
    Ok(())
}
