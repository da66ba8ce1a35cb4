//! Index operations.
//!
//! [`Index`] is the entry point application code uses to mutate, query and
//! scan one remote index. Operations are split by concern:
//!
//! - `objects`: single-document reads and writes, search, settings
//! - `batch`: the batch executor and its bulk conveniences
//! - `task`: waiting for asynchronous writes to become durable
//! - `browse`: cursor-based full-index scans
//! - `delete_by_query`: search + delete + wait until nothing matches
//! - `keys`: per-index credential management

mod action;
mod batch;
mod browse;
mod delete_by_query;
mod handle;
mod keys;
mod objects;
mod task;

pub use action::{ActionKind, ActionRecord};
pub use browse::BrowseIterator;
pub use handle::IndexHandle;
pub use task::backoff_delays;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::TaskWaitConfig;
use crate::errors::{IndexError, Result};
use crate::interfaces::{Sleeper, TokioSleeper, Transport, TransportRequest};
use search_client_shared::TaskReference;

/// Client for one remote index.
///
/// Cheap to clone and safe to share between tasks: it holds no mutable state.
/// Iterators created by [`Index::browse`] and in-flight waits carry their own
/// state and belong to a single caller.
///
/// # Example
///
/// ```ignore
/// let transport = Arc::new(HttpTransport::new(ClientConfig::from_env()?)?);
/// let index = Index::new(transport, "products")?;
///
/// let task = index.add_objects(vec![json!({"name": "lamp"})]).await?;
/// index.wait_task(&task).await?;
/// ```
#[derive(Clone)]
pub struct Index {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    handle: IndexHandle,
    wait_config: TaskWaitConfig,
}

impl Index {
    /// Create a client for the index called `name`.
    ///
    /// No request is sent; the index does not need to exist yet.
    pub fn new(transport: Arc<dyn Transport>, name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            transport,
            sleeper: Arc::new(TokioSleeper::new()),
            handle: IndexHandle::new(name)?,
            wait_config: TaskWaitConfig::default(),
        })
    }

    /// Replace the sleeper used between task-status probes.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Replace the backoff used by [`Index::wait_task`].
    pub fn with_wait_config(mut self, wait_config: TaskWaitConfig) -> Self {
        self.wait_config = wait_config;
        self
    }

    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn handle(&self) -> &IndexHandle {
        &self.handle
    }

    fn path(&self, suffix: &str) -> String {
        format!("{}{}", self.handle.base_path(), suffix)
    }

    async fn send(&self, request: TransportRequest) -> Result<Value> {
        self.transport.send(request).await
    }

    /// Extract the task reference from a write acknowledgment.
    fn task_from_ack(&self, ack: &Value) -> Result<TaskReference> {
        TaskReference::from_ack(self.name(), ack)
            .ok_or_else(|| IndexError::malformed("response has no taskID"))
    }
}

/// Decode a response body into a typed value.
fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| IndexError::malformed(format!("Unexpected {} response: {}", what, e)))
}

/// Reject empty identifiers before they reach a path.
fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(IndexError::invalid_argument(format!("{} must not be empty", what)));
    }
    Ok(())
}
