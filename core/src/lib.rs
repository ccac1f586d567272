pub mod dashboard;
pub mod format;
pub mod readings;
pub mod settings;
pub mod stats;
pub mod status;
pub use readings::{AtmosphericCondition, WaterLevel, sort_newest_first};
pub use settings::{CapacityError, TankConfig, TankSettings};
pub use status::{SystemStatus, detect_rain_and_pump};

/// Volume increase, in liters, between the two newest readings above which rain is reported.
pub const RAIN_THRESHOLD_LITERS: f64 = 10.0;
pub const DEFAULT_MAX_CAPACITY_M3: f64 = 10.0;
