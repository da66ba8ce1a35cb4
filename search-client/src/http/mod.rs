//! HTTP implementation of the transport.
//!
//! This module provides a concrete implementation of `Transport` using
//! `reqwest` against one read host and one write host.

mod client;

pub use client::{HttpTransport, API_KEY_HEADER, APPLICATION_ID_HEADER};
