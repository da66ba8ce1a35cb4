//! Interface definitions for the collaborators the index client consumes.
//!
//! The transport and the backoff sleeper are traits so that the HTTP layer
//! and wall-clock delays can be swapped out, most importantly in tests.

mod sleeper;
mod transport;

pub use sleeper::{Sleeper, TokioSleeper};
pub use transport::{Method, RequestKind, Transport, TransportRequest};
