//! Application-level configuration loaded from the environment.

use std::{env, path::PathBuf};

use tracing::{info, warn};

/// Environment variable naming the HTTP port (falls back to `PORT`).
const PORT_ENV: &str = "MATCHDAY_PORT";
/// Environment variable pointing at the push service-account JSON key.
const PUSH_CREDENTIALS_ENV: &str = "MATCHDAY_PUSH_CREDENTIALS";
/// Environment variable sizing the push dispatch queue.
const PUSH_QUEUE_CAPACITY_ENV: &str = "MATCHDAY_PUSH_QUEUE_CAPACITY";
/// Environment variable sizing the in-process live event channel.
const LIVE_CHANNEL_CAPACITY_ENV: &str = "MATCHDAY_LIVE_CHANNEL_CAPACITY";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PUSH_QUEUE_CAPACITY: usize = 256;
const DEFAULT_LIVE_CHANNEL_CAPACITY: usize = 64;

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Path to the push provider credentials file, when push is enabled.
    pub push_credentials_path: Option<PathBuf>,
    /// Capacity of the bounded push dispatch queue.
    pub push_queue_capacity: usize,
    /// Capacity of the in-process live event broadcast channel.
    pub live_channel_capacity: usize,
}

impl AppConfig {
    /// Load the configuration from the environment, falling back to baked-in
    /// defaults for anything unset or unparsable.
    pub fn load() -> Self {
        let port = env::var(PORT_ENV)
            .or_else(|_| env::var("PORT"))
            .ok()
            .and_then(|value| parse_or_warn(PORT_ENV, &value))
            .unwrap_or(DEFAULT_PORT);

        let push_credentials_path = env::var_os(PUSH_CREDENTIALS_ENV)
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty());
        if push_credentials_path.is_none() {
            info!("{PUSH_CREDENTIALS_ENV} not set; push notifications disabled");
        }

        let push_queue_capacity = env::var(PUSH_QUEUE_CAPACITY_ENV)
            .ok()
            .and_then(|value| parse_or_warn(PUSH_QUEUE_CAPACITY_ENV, &value))
            .unwrap_or(DEFAULT_PUSH_QUEUE_CAPACITY);

        let live_channel_capacity = env::var(LIVE_CHANNEL_CAPACITY_ENV)
            .ok()
            .and_then(|value| parse_or_warn(LIVE_CHANNEL_CAPACITY_ENV, &value))
            .unwrap_or(DEFAULT_LIVE_CHANNEL_CAPACITY);

        Self {
            port,
            push_credentials_path,
            push_queue_capacity,
            live_channel_capacity,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            push_credentials_path: None,
            push_queue_capacity: DEFAULT_PUSH_QUEUE_CAPACITY,
            live_channel_capacity: DEFAULT_LIVE_CHANNEL_CAPACITY,
        }
    }
}

fn parse_or_warn<T: std::str::FromStr>(name: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(%name, %value, "unparsable value; using default");
            None
        }
    }
}
