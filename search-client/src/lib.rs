//! # Search Client
//!
//! This crate provides a client for one index of a hosted search service. It
//! covers document writes through batches of action records, waiting on the
//! asynchronous tasks those writes create, cursor-based scans of a whole
//! index, delete-by-query and index-scoped key management.
//!
//! Network access goes through the [`Transport`] trait; [`HttpTransport`] is
//! the reqwest-based implementation used in production.

pub mod config;
pub mod errors;
pub mod http;
pub mod index;
pub mod interfaces;

#[cfg(test)]
mod test_support;

pub use config::{ClientConfig, TaskWaitConfig};
pub use errors::{IndexError, Result};
pub use http::HttpTransport;
pub use index::{backoff_delays, ActionKind, ActionRecord, BrowseIterator, Index, IndexHandle};
pub use interfaces::{Method, RequestKind, Sleeper, TokioSleeper, Transport, TransportRequest};
pub use search_client_shared::{
    Acl, AddObjectResponse, ApiKey, ApiKeyParams, BrowsePage, KeyAck, Query, SearchResponse,
    TaskReference, TaskStatus,
};
