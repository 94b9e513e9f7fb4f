use crate::core::retry::RetryPolicy;
use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

pub struct Config {
    pub queue_path: String,
    pub gateway_url: String,
    pub log_level: String,
    pub retry_max: u32,
    pub retry_base_delay_ms: u64,
    pub queue_capacity: Option<usize>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("queue_path", &self.queue_path)
            .field("gateway_url", &"<redacted>")
            .field("log_level", &self.log_level)
            .field("retry_max", &self.retry_max)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .field("queue_capacity", &self.queue_capacity)
            .finish()
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            queue_path: env::var("LEDGER_QUEUE_PATH")
                .unwrap_or_else(|_| "hostel-ledger-queue.json".to_string()),
            gateway_url: env::var("LEDGER_GATEWAY_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            retry_max: env::var("LEDGER_RETRY_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            retry_base_delay_ms: env::var("LEDGER_RETRY_BASE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            queue_capacity: env::var("LEDGER_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_max, Duration::from_millis(self.retry_base_delay_ms))
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
