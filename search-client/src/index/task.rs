//! Waiting for asynchronous tasks.
//!
//! Writes are applied by the service asynchronously. A caller that needs to
//! read its own writes waits on the returned task: the poller probes the task
//! status right away, then backs off exponentially between probes, each sleep
//! capped at the configured ceiling. There is no attempt limit or timeout; the
//! wait ends when the task is published, when a probe fails, or when the
//! sleeper reports an interruption.

use std::time::Duration;

use tracing::{debug, instrument};

use super::handle::encode_segment;
use super::Index;
use crate::config::TaskWaitConfig;
use crate::errors::{IndexError, Result};
use crate::interfaces::TransportRequest;
use search_client_shared::{TaskReference, TaskStatus};

/// Sleep durations applied between successive probes.
///
/// Starts at `initial_delay` and doubles each step; every yielded value is
/// capped at `max_delay`. The sequence is infinite.
pub fn backoff_delays(config: TaskWaitConfig) -> impl Iterator<Item = Duration> {
    let mut nominal = config.initial_delay;
    std::iter::from_fn(move || {
        let applied = nominal.min(config.max_delay);
        nominal = nominal.saturating_mul(2);
        Some(applied)
    })
}

impl Index {
    /// Query the current status of a task.
    pub async fn task_status(&self, task: &TaskReference) -> Result<TaskStatus> {
        let path = format!(
            "/1/indexes/{}/task/{}",
            encode_segment(&task.index_name),
            encode_segment(&task.task_id)
        );
        let response = self.send(TransportRequest::get(path)).await?;

        let status = response
            .get("status")
            .and_then(|s| s.as_str())
            .ok_or_else(|| IndexError::malformed("task response has no status"))?;
        Ok(TaskStatus::from_status(status))
    }

    /// Wait until `task` is published, using this index's wait config.
    pub async fn wait_task(&self, task: &TaskReference) -> Result<()> {
        self.wait_task_with_config(task, self.wait_config).await
    }

    /// Wait until `task` is published, using the given backoff.
    #[instrument(skip(self, task), fields(index = %task.index_name, task_id = %task.task_id))]
    pub async fn wait_task_with_config(
        &self,
        task: &TaskReference,
        config: TaskWaitConfig,
    ) -> Result<()> {
        let mut delays = backoff_delays(config);
        let mut probes: u32 = 0;

        loop {
            let status = self.task_status(task).await?;
            probes += 1;

            if status.is_published() {
                debug!(probes = probes, "Task published");
                return Ok(());
            }

            let delay = delays.next().unwrap_or(config.max_delay);
            debug!(
                status = ?status,
                probes = probes,
                delay_ms = delay.as_millis() as u64,
                "Task not published yet, backing off"
            );
            self.sleeper.sleep(delay).await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::{MockTransport, RecordingSleeper};
    use serde_json::json;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn enqueued() -> Result<serde_json::Value> {
        Ok(json!({"status": "notPublished", "pendingTask": true}))
    }

    fn published() -> Result<serde_json::Value> {
        Ok(json!({"status": "published", "pendingTask": false}))
    }

    fn index_with(transport: Arc<MockTransport>, sleeper: Arc<RecordingSleeper>) -> Index {
        Index::new(transport, "products")
            .unwrap()
            .with_sleeper(sleeper)
    }

    #[test]
    fn test_backoff_sequence_is_capped() {
        let config = TaskWaitConfig::with_initial_delay(ms(1000)).with_max_delay(ms(10_000));
        let delays: Vec<Duration> = backoff_delays(config).take(7).collect();

        assert_eq!(
            delays,
            vec![
                ms(1000),
                ms(2000),
                ms(4000),
                ms(8000),
                ms(10_000),
                ms(10_000),
                ms(10_000)
            ]
        );
    }

    #[test]
    fn test_backoff_default_is_flat() {
        let delays: Vec<Duration> = backoff_delays(TaskWaitConfig::default()).take(3).collect();
        assert_eq!(delays, vec![ms(10_000); 3]);
    }

    #[test]
    fn test_backoff_zero_stays_zero() {
        let config = TaskWaitConfig::with_initial_delay(Duration::ZERO);
        let delays: Vec<Duration> = backoff_delays(config).take(4).collect();
        assert_eq!(delays, vec![Duration::ZERO; 4]);
    }

    #[test]
    fn test_backoff_nominal_delay_saturates() {
        let config = TaskWaitConfig::with_initial_delay(Duration::MAX).with_max_delay(ms(5));
        let delays: Vec<Duration> = backoff_delays(config).take(3).collect();
        assert_eq!(delays, vec![ms(5); 3]);
    }

    #[tokio::test]
    async fn test_wait_published_immediately() {
        let transport = MockTransport::with_responses([published()]);
        let sleeper = RecordingSleeper::new();
        let index = index_with(transport.clone(), sleeper.clone());

        index
            .wait_task(&TaskReference::new("products", "12"))
            .await
            .unwrap();

        assert!(sleeper.sleeps().await.is_empty());
        let requests = transport.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/1/indexes/products/task/12");
    }

    #[tokio::test]
    async fn test_wait_two_sleeps_before_publish() {
        let transport = MockTransport::with_responses([enqueued(), enqueued(), published()]);
        let sleeper = RecordingSleeper::new();
        let index = index_with(transport.clone(), sleeper.clone());

        index
            .wait_task(&TaskReference::new("products", "12"))
            .await
            .unwrap();

        assert_eq!(sleeper.sleeps().await, vec![ms(10_000), ms(10_000)]);
        assert_eq!(transport.requests().await.len(), 3);
    }

    #[tokio::test]
    async fn test_wait_applies_capped_backoff() {
        let mut responses: Vec<Result<serde_json::Value>> = (0..6).map(|_| enqueued()).collect();
        responses.push(published());
        let transport = MockTransport::with_responses(responses);
        let sleeper = RecordingSleeper::new();
        let index = index_with(transport, sleeper.clone());

        let config = TaskWaitConfig::with_initial_delay(ms(1000));
        index
            .wait_task_with_config(&TaskReference::new("products", "1"), config)
            .await
            .unwrap();

        assert_eq!(
            sleeper.sleeps().await,
            vec![ms(1000), ms(2000), ms(4000), ms(8000), ms(10_000), ms(10_000)]
        );
    }

    #[tokio::test]
    async fn test_unknown_status_keeps_polling() {
        let transport =
            MockTransport::with_responses([Ok(json!({"status": "processing"})), published()]);
        let sleeper = RecordingSleeper::new();
        let index = index_with(transport, sleeper.clone());

        index
            .wait_task(&TaskReference::new("products", "1"))
            .await
            .unwrap();

        assert_eq!(sleeper.sleeps().await.len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_stops_polling() {
        let transport = MockTransport::with_responses([
            enqueued(),
            Err(IndexError::transport(500, "Internal error")),
            published(),
        ]);
        let sleeper = RecordingSleeper::new();
        let index = index_with(transport.clone(), sleeper.clone());

        let result = index.wait_task(&TaskReference::new("products", "1")).await;

        assert_eq!(result, Err(IndexError::transport(500, "Internal error")));
        assert_eq!(sleeper.sleeps().await.len(), 1);
        assert_eq!(transport.remaining().await, 1);
    }

    #[tokio::test]
    async fn test_missing_status_is_malformed() {
        let transport = MockTransport::with_responses([Ok(json!({"pendingTask": false}))]);
        let index = index_with(transport, RecordingSleeper::new());

        let result = index.wait_task(&TaskReference::new("products", "1")).await;
        assert!(matches!(result, Err(IndexError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_task_path_uses_task_index() {
        let transport = MockTransport::with_responses([published()]);
        let index = index_with(transport.clone(), RecordingSleeper::new());

        index
            .wait_task(&TaskReference::new("products staging", "77"))
            .await
            .unwrap();

        let requests = transport.requests().await;
        assert_eq!(requests[0].path, "/1/indexes/products%20staging/task/77");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_wait() {
        use crate::interfaces::TokioSleeper;
        use tokio::sync::watch;

        let (tx, rx) = watch::channel(false);
        let transport = MockTransport::with_responses([enqueued(), enqueued()]);
        let index = Index::new(transport, "products")
            .unwrap()
            .with_sleeper(Arc::new(TokioSleeper::with_shutdown(rx)));

        let handle = tokio::spawn(async move {
            index
                .wait_task(&TaskReference::new("products", "1"))
                .await
        });
        tokio::task::yield_now().await;
        tx.send(true).unwrap();

        assert_eq!(handle.await.unwrap(), Err(IndexError::Interrupted));
    }
}
