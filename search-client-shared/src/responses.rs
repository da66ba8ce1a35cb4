//! Typed response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::task::TaskReference;

/// Result page of a search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Matching documents for the requested page.
    #[serde(default)]
    pub hits: Vec<Value>,
    /// Total number of matches across all pages.
    pub nb_hits: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub nb_pages: Option<u32>,
    #[serde(default)]
    pub hits_per_page: Option<u32>,
    #[serde(default, rename = "processingTimeMS")]
    pub processing_time_ms: Option<u64>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub params: Option<String>,
}

/// One page of a browse request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsePage {
    #[serde(default)]
    pub hits: Vec<Value>,
    /// Continuation token. Absent or empty on the last page.
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub nb_pages: Option<u32>,
    #[serde(default)]
    pub nb_hits: Option<u64>,
}

impl BrowsePage {
    /// The cursor to continue from, if another page exists.
    pub fn next_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// Acknowledgment of a single add with a server-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddObjectResponse {
    /// Identifier the service assigned to the new document.
    pub object_id: String,
    /// Task that applies the write.
    pub task: TaskReference,
}
