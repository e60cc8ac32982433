//! Runtime configuration consumed by the panel core.
//!
//! The binary translates its TOML file into a [`PanelConfig`]; tests build
//! one directly through [`PanelConfig::new`].

use std::ops::RangeInclusive;
use std::time::Duration;
use url::Url;

/// Default period between two full-status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default delay before the status is refreshed after a kick completes
pub const DEFAULT_KICK_REFRESH_DELAY: Duration = Duration::from_secs(3);

/// Default number of entries kept in the log window
pub const DEFAULT_LOG_CAPACITY: usize = 2000;

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for one panel session against one game server.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Base URL of the administration backend (e.g. `http://127.0.0.1:8080`)
    pub base_url: Url,
    /// Timeout applied to every API request
    pub request_timeout: Duration,
    /// Period of the background full-status poll
    pub poll_interval: Duration,
    /// Delay before the player list is refreshed after a kick
    pub kick_refresh_delay: Duration,
    /// Accepted character length of a server chat message
    pub message_len: RangeInclusive<usize>,
    /// Maximum number of entries kept in the log window
    pub log_capacity: usize,
}

impl PanelConfig {
    /// Creates a configuration for `base_url` with default timings.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            kick_refresh_delay: DEFAULT_KICK_REFRESH_DELAY,
            message_len: 1..=256,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}
