//! Service configuration.
//!
//! Loaded in layers: built-in defaults, then an optional `order-lifecycle.yaml` or
//! `order-lifecycle.toml` in the working directory, then `ORDER__*` environment variables
//! (`ORDER__PAYMENT_TIMEOUT_MS=1500`, `ORDER__SUBSCRIBER__MAX_REDELIVERIES=3`).

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default configuration file name, without extension.
pub const DEFAULT_CONFIG_FILE: &str = "order-lifecycle";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "ORDER";

#[derive(Debug, Error)]
#[error("Invalid configuration: {0}")]
pub struct ConfigError(#[from] ::config::ConfigError);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    pub catalog_timeout_ms: u64,
    pub payment_timeout_ms: u64,
    /// Request channel capacity of each actor.
    pub store_buffer: usize,
    pub topics: TopicsConfig,
    pub subscriber: SubscriberConfig,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            catalog_timeout_ms: 5_000,
            payment_timeout_ms: 3_000,
            store_buffer: 32,
            topics: TopicsConfig::default(),
            subscriber: SubscriberConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TopicsConfig {
    pub order_paid: String,
    pub order_assembled: String,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            order_paid: "order.paid".to_string(),
            order_assembled: "order.assembled".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SubscriberConfig {
    /// Consumer group the assembly subscriber commits under.
    pub group: String,
    /// Deliveries of a retryable failure before the record is skipped.
    pub max_redeliveries: u32,
    pub redelivery_backoff_ms: u64,
    /// Number of recent event ids remembered for deduplication.
    pub dedup_capacity: usize,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            group: "order-service".to_string(),
            max_redeliveries: 5,
            redelivery_backoff_ms: 200,
            dedup_capacity: 1024,
        }
    }
}

impl SubscriberConfig {
    pub fn redelivery_backoff(&self) -> Duration {
        Duration::from_millis(self.redelivery_backoff_ms)
    }
}

impl OrderConfig {
    /// Loads configuration from the default file (if present) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Loads configuration from `path` (any extension the `config` crate knows, optional) and
    /// the environment.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        use ::config::{Config, Environment, File};

        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }

    pub fn payment_timeout(&self) -> Duration {
        Duration::from_millis(self.payment_timeout_ms)
    }
}
