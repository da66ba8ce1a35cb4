//! Configuration types for the index client.

use std::env;
use std::time::Duration;

use tracing::debug;

use crate::errors::{IndexError, Result};

/// Default delay, in milliseconds, used both as the first task-poll backoff
/// and as the ceiling for every later one.
pub const DEFAULT_TASK_WAIT_MS: u64 = 10_000;

/// Page size forced on the searches issued by delete-by-query.
pub const DELETE_BY_QUERY_BATCH_SIZE: u32 = 100;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`HttpTransport`](crate::http::HttpTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Application identifier sent with every request.
    pub application_id: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Base URL for requests that write.
    pub write_url: String,
    /// Base URL for search, browse and multi-get requests.
    pub read_url: String,
    /// Timeout applied to each request.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config pointing at the default hosts for `application_id`.
    pub fn new(application_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        let application_id = application_id.into();
        Self {
            write_url: default_write_url(&application_id),
            read_url: default_read_url(&application_id),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            application_id,
        }
    }

    /// Use a single base URL for both reads and writes.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.read_url = url.clone();
        self.write_url = url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load the config from the environment, reading a `.env` file first if
    /// one exists.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_APPLICATION_ID`: application identifier (required)
    /// - `SEARCH_API_KEY`: API key (required)
    /// - `SEARCH_WRITE_URL`: write base URL (default: `https://{app}.algolia.net`)
    /// - `SEARCH_READ_URL`: read base URL (default: `https://{app}-dsn.algolia.net`)
    /// - `SEARCH_TIMEOUT_SECS`: per-request timeout (default: 30)
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let application_id = lookup("SEARCH_APPLICATION_ID")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| IndexError::invalid_argument("SEARCH_APPLICATION_ID is not set"))?;
        let api_key = lookup("SEARCH_API_KEY")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| IndexError::invalid_argument("SEARCH_API_KEY is not set"))?;

        let mut config = Self::new(application_id, api_key);

        if let Some(url) = lookup("SEARCH_WRITE_URL") {
            config.write_url = url;
        }
        if let Some(url) = lookup("SEARCH_READ_URL") {
            config.read_url = url;
        }
        if let Some(secs) = lookup("SEARCH_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|e| {
                IndexError::invalid_argument(format!("Invalid SEARCH_TIMEOUT_SECS: {}", e))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        debug!(
            application_id = %config.application_id,
            write_url = %config.write_url,
            read_url = %config.read_url,
            "Loaded client config from environment"
        );

        Ok(config)
    }
}

fn default_write_url(application_id: &str) -> String {
    format!("https://{}.algolia.net", application_id)
}

fn default_read_url(application_id: &str) -> String {
    format!("https://{}-dsn.algolia.net", application_id)
}

/// Backoff settings for waiting on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskWaitConfig {
    /// Delay before the second probe. Doubles after every unpublished probe.
    /// Zero is allowed and means tight polling, since zero doubled stays zero.
    pub initial_delay: Duration,
    /// Ceiling applied to each individual sleep.
    pub max_delay: Duration,
}

impl Default for TaskWaitConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(DEFAULT_TASK_WAIT_MS),
            max_delay: Duration::from_millis(DEFAULT_TASK_WAIT_MS),
        }
    }
}

impl TaskWaitConfig {
    /// Create a config with a custom initial delay and the default ceiling.
    pub fn with_initial_delay(initial_delay: Duration) -> Self {
        Self {
            initial_delay,
            ..Default::default()
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }
}
