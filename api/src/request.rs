use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum Request {
    Dashboard,
    History {
        #[serde(default)]
        limit: Option<usize>,
    },
    Settings,
    SetCapacity {
        max_capacity: Value,
    },
}

impl Request {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Request::Dashboard => "dashboard",
            Request::History { .. } => "history",
            Request::Settings => "settings",
            Request::SetCapacity { .. } => "set_capacity",
        }
    }
}

/// Accepts a direct invocation payload or an API Gateway event whose `body` is a JSON string.
/// An empty payload asks for the dashboard.
pub(crate) fn parse_request(payload: &Value) -> Result<Request> {
    let payload = match payload.get("body") {
        Some(Value::String(body)) if body.trim().is_empty() => Value::Null,
        Some(Value::String(body)) => {
            serde_json::from_str(body).context("'body' is not valid JSON")?
        }
        Some(Value::Null) => Value::Null,
        None => payload.clone(),
        Some(_) => return Err(anyhow!("Expected 'body' to be a string")),
    };

    if payload.is_null() || payload.as_object().is_some_and(|object| object.is_empty()) {
        return Ok(Request::Dashboard);
    }
    serde_json::from_value(payload).context("unsupported request")
}
