use tracing::{error, info, warn};

pub(crate) const TARGET: &str = "tankwatch_api";

#[derive(Clone, Default)]
pub(crate) struct Logger {
    action: Option<&'static str>,
    tank_id: Option<String>,
    backend: Option<&'static str>,
    readings: Option<usize>,
    max_capacity: Option<f64>,
    is_raining: Option<bool>,
    is_pump_active: Option<bool>,
}

impl Logger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn action(mut self, action: &'static str) -> Self {
        self.action = Some(action);
        self
    }

    pub(crate) fn tank_id(mut self, tank_id: impl Into<String>) -> Self {
        self.tank_id = Some(tank_id.into());
        self
    }

    pub(crate) fn backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    pub(crate) fn readings(mut self, readings: usize) -> Self {
        self.readings = Some(readings);
        self
    }

    pub(crate) fn max_capacity(mut self, max_capacity: f64) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    pub(crate) fn status(mut self, is_raining: bool, is_pump_active: bool) -> Self {
        self.is_raining = Some(is_raining);
        self.is_pump_active = Some(is_pump_active);
        self
    }

    pub(crate) fn info(&self, event: &'static str, message: &str) {
        let tank_id = self.tank_id.as_deref();
        info!(
            target: TARGET,
            event,
            action = self.action,
            tank_id = tank_id,
            backend = self.backend,
            readings = self.readings,
            max_capacity = self.max_capacity,
            is_raining = self.is_raining,
            is_pump_active = self.is_pump_active,
            "{}",
            message
        );
    }

    pub(crate) fn warn<E: std::fmt::Display>(&self, event: &'static str, err: &E, message: &str) {
        let tank_id = self.tank_id.as_deref();
        warn!(
            target: TARGET,
            event,
            action = self.action,
            tank_id = tank_id,
            max_capacity = self.max_capacity,
            error = %err,
            "{}",
            message
        );
    }

    pub(crate) fn error<E: std::fmt::Debug>(&self, event: &'static str, err: &E, message: &str) {
        let tank_id = self.tank_id.as_deref();
        error!(
            target: TARGET,
            event,
            action = self.action,
            tank_id = tank_id,
            backend = self.backend,
            readings = self.readings,
            max_capacity = self.max_capacity,
            error = ?err,
            "{}",
            message
        );
    }
}
