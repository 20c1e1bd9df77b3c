//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, CacheConfig, ConfigError, Environment, GatewayConfig, StorageConfig,
};
