//! Swap Router Configuration
//!
//! Settings, loading and startup logging for the swap router service.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, ConfigLoadError, ENV_PREFIX};
pub use settings::{
	ChainSettings, ConfigValidationError, LogFormat, LoggingSettings, ServerSettings, Settings,
	SourceSettings, TimeoutSettings, TuningSettings,
};
pub use startup_logger::{log_service_info, log_service_shutdown, log_startup_complete};
