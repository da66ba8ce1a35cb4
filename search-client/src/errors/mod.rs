//! Error types for the index operations client.

mod index_error;

pub use index_error::{IndexError, Result};
