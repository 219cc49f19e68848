pub mod app;
pub mod client;
pub mod config;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod seed;
pub mod services;

pub use config::{ClientConfig, Config, ConfigError};
pub use observability::{
    init_logging, init_observability, shutdown_observability, Metrics,
};
