//! Backoff sleep abstraction.
//!
//! The task poller never calls `tokio::time::sleep` directly. It goes through
//! a [`Sleeper`] so tests can observe the delays without waiting, and so a
//! caller can interrupt a long wait with a shutdown signal.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::warn;

use crate::errors::{IndexError, Result};

/// Suspends the current task for a backoff delay.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Sleep for `duration`.
    ///
    /// Returns [`IndexError::Interrupted`] if the sleep was cut short.
    async fn sleep(&self, duration: Duration) -> Result<()>;
}

/// Sleeper backed by the tokio timer.
///
/// With a shutdown receiver attached, a sleep fails with
/// [`IndexError::Interrupted`] as soon as the channel holds `true`. If the
/// sender is dropped the sleep simply runs to completion.
#[derive(Debug, Clone, Default)]
pub struct TokioSleeper {
    shutdown: Option<watch::Receiver<bool>>,
}

impl TokioSleeper {
    pub fn new() -> Self {
        Self { shutdown: None }
    }

    /// Create a sleeper that is interrupted when `shutdown` becomes `true`.
    pub fn with_shutdown(shutdown: watch::Receiver<bool>) -> Self {
        Self {
            shutdown: Some(shutdown),
        }
    }
}

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) -> Result<()> {
        let Some(ref shutdown) = self.shutdown else {
            tokio::time::sleep(duration).await;
            return Ok(());
        };

        let mut shutdown = shutdown.clone();
        if *shutdown.borrow_and_update() {
            warn!("Shutdown already requested, not sleeping");
            return Err(IndexError::Interrupted);
        }

        let sleep = tokio::time::sleep(duration);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return Ok(()),
                changed = shutdown.changed() => match changed {
                    Ok(()) => {
                        if *shutdown.borrow_and_update() {
                            warn!(delay_ms = duration.as_millis() as u64, "Backoff sleep interrupted");
                            return Err(IndexError::Interrupted);
                        }
                    }
                    Err(_) => {
                        // Sender gone: nobody can interrupt us any more.
                        (&mut sleep).await;
                        return Ok(());
                    }
                },
            }
        }
    }
}
