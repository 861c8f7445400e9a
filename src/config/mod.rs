pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AppConfig, DatabaseConfig, GeneralConfig, LoggingConfig, SessionConfig, UpstreamConfig,
};
pub use envconfig::EnvConfig;
