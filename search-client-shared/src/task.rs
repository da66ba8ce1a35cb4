//! Asynchronous task identifiers and statuses.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status string the service reports once a task is durably applied.
pub const PUBLISHED: &str = "published";

/// Status string the service reports while a task is still queued.
pub const NOT_PUBLISHED: &str = "notPublished";

/// Reference to a server-side task created by a mutating call.
///
/// The task id is opaque. It is only ever used as a key when polling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskReference {
    /// Name (not encoded) of the index the task belongs to.
    pub index_name: String,
    /// Task identifier as returned by the service.
    pub task_id: String,
}

impl TaskReference {
    pub fn new(index_name: impl Into<String>, task_id: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            task_id: task_id.into(),
        }
    }

    /// Extract the `taskID` field from an acknowledgment body.
    ///
    /// The service sends task ids as JSON numbers, but strings are accepted
    /// too. Returns `None` when the field is absent or has another type.
    pub fn from_ack(index_name: &str, ack: &Value) -> Option<Self> {
        let task_id = match ack.get("taskID")? {
            Value::Number(n) => n.to_string(),
            Value::String(s) if !s.is_empty() => s.clone(),
            _ => return None,
        };
        Some(Self::new(index_name, task_id))
    }
}

impl fmt::Display for TaskReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index_name, self.task_id)
    }
}

/// Status of a task as derived from a single poll response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Unknown,
    Enqueued,
    Published,
}

impl TaskStatus {
    /// Map the service's `status` string.
    pub fn from_status(status: &str) -> Self {
        match status {
            PUBLISHED => Self::Published,
            NOT_PUBLISHED => Self::Enqueued,
            _ => Self::Unknown,
        }
    }

    pub fn is_published(self) -> bool {
        self == Self::Published
    }
}
