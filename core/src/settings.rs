use crate::DEFAULT_MAX_CAPACITY_M3;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankConfig {
    pub max_capacity_m3: f64,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            max_capacity_m3: DEFAULT_MAX_CAPACITY_M3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CapacityError {
    NotANumber(String),
    NotFinite,
    NotPositive(f64),
}

impl CapacityError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CapacityError::NotANumber(_) | CapacityError::NotFinite => {
                "La capacité maximale doit être un nombre."
            }
            CapacityError::NotPositive(_) => "La capacité maximale doit être supérieure à 0.",
        }
    }
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapacityError::NotANumber(input) => write!(f, "'{input}' is not a number"),
            CapacityError::NotFinite => f.write_str("capacity must be finite"),
            CapacityError::NotPositive(value) => write!(f, "capacity {value} must be positive"),
        }
    }
}

impl std::error::Error for CapacityError {}

pub fn validate_capacity(capacity: f64) -> Result<f64, CapacityError> {
    if !capacity.is_finite() {
        return Err(CapacityError::NotFinite);
    }
    if capacity <= 0.0 {
        return Err(CapacityError::NotPositive(capacity));
    }
    Ok(capacity)
}

pub fn parse_capacity(input: &str) -> Result<f64, CapacityError> {
    let trimmed = input.trim();
    let capacity = trimmed
        .parse::<f64>()
        .map_err(|_| CapacityError::NotANumber(trimmed.to_string()))?;
    validate_capacity(capacity)
}

/// Process-wide tank configuration.
///
/// Writes go through [`TankSettings::set_max_capacity`] only; every accepted write is
/// published to the receivers handed out by [`TankSettings::subscribe`].
pub struct TankSettings {
    sender: watch::Sender<TankConfig>,
}

impl TankSettings {
    pub fn new(config: TankConfig) -> Self {
        let (sender, _) = watch::channel(config);
        Self { sender }
    }

    pub fn current(&self) -> TankConfig {
        *self.sender.borrow()
    }

    pub fn max_capacity_m3(&self) -> f64 {
        self.current().max_capacity_m3
    }

    pub fn set_max_capacity(&self, capacity: f64) -> Result<TankConfig, CapacityError> {
        let capacity = validate_capacity(capacity)?;
        let config = TankConfig {
            max_capacity_m3: capacity,
        };
        self.sender.send_replace(config);
        Ok(config)
    }

    pub fn subscribe(&self) -> watch::Receiver<TankConfig> {
        self.sender.subscribe()
    }
}

impl Default for TankSettings {
    fn default() -> Self {
        Self::new(TankConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_ten_cubic_meters() {
        assert_eq!(TankSettings::default().max_capacity_m3(), 10.0);
    }

    #[test]
    fn parse_capacity_accepts_decimal_input() {
        assert_eq!(parse_capacity(" 12.5 "), Ok(12.5));
    }

    #[test]
    fn parse_capacity_rejects_invalid_input() {
        assert_eq!(
            parse_capacity("abc"),
            Err(CapacityError::NotANumber("abc".to_string()))
        );
        assert_eq!(parse_capacity("0"), Err(CapacityError::NotPositive(0.0)));
        assert_eq!(parse_capacity("-3"), Err(CapacityError::NotPositive(-3.0)));
        assert_eq!(parse_capacity("NaN"), Err(CapacityError::NotFinite));
        assert_eq!(parse_capacity("inf"), Err(CapacityError::NotFinite));
    }

    #[test]
    fn rejected_capacity_keeps_previous_value() {
        let settings = TankSettings::new(TankConfig {
            max_capacity_m3: 4.0,
        });
        assert!(settings.set_max_capacity(-1.0).is_err());
        assert_eq!(settings.max_capacity_m3(), 4.0);
    }

    #[tokio::test]
    async fn subscribers_observe_capacity_changes() {
        let settings = TankSettings::default();
        let mut receiver = settings.subscribe();

        let config = settings.set_max_capacity(12.5).unwrap();
        assert_eq!(config.max_capacity_m3, 12.5);

        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow_and_update().max_capacity_m3, 12.5);
        assert_eq!(settings.current(), config);
    }

    #[test]
    fn invalid_capacity_does_not_notify() {
        let settings = TankSettings::default();
        let receiver = settings.subscribe();
        let _ = settings.set_max_capacity(0.0);
        assert!(!receiver.has_changed().unwrap());
    }
}
