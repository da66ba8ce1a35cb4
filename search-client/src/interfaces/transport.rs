//! Transport trait definition.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::Result;

/// HTTP method of a service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a request only reads data (search, browse, multi-get) or may write.
///
/// Transports may route the two kinds to different hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Read,
    Write,
}

/// A single request to the service.
///
/// `path` is already percent-encoded and may carry a query string.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub kind: RequestKind,
}

impl TransportRequest {
    fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            kind: RequestKind::Write,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path, Some(body))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path, None)
    }

    /// Mark the request as read-only.
    pub fn read(mut self) -> Self {
        self.kind = RequestKind::Read;
        self
    }
}

/// Abstract interface for sending signed requests to the search service.
///
/// Implementations authenticate the request, send it, and return the parsed
/// JSON body of a successful response. Service-side failures surface as
/// [`IndexError::Transport`](crate::IndexError::Transport) carrying the HTTP
/// status and the service's message.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one transport is shared by every
/// index handle created from it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the decoded JSON response body.
    async fn send(&self, request: TransportRequest) -> Result<Value>;
}
