//! # Search Client Shared
//!
//! Plain data types exchanged with the hosted search service: query
//! configuration, task identifiers, credential parameters, and the typed
//! shapes of search and browse responses.
//!
//! Nothing in this crate performs I/O.

pub mod keys;
pub mod query;
pub mod responses;
pub mod task;

pub use keys::{Acl, ApiKey, ApiKeyParams, KeyAck};
pub use query::Query;
pub use responses::{AddObjectResponse, BrowsePage, SearchResponse};
pub use task::{TaskReference, TaskStatus};

/// Name of the identifier attribute every stored document carries.
pub const OBJECT_ID_FIELD: &str = "objectID";
