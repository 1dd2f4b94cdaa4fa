mod acquisition_config;
mod configuration;
mod configuration_error;
mod device_config;
mod ingest_config;
mod live_view_config;

pub use acquisition_config::AcquisitionConfig;
pub use configuration::Configuration;
pub use configuration_error::ConfigurationError;
pub use device_config::DeviceConfig;
pub use ingest_config::IngestConfig;
pub use live_view_config::LiveViewConfig;
