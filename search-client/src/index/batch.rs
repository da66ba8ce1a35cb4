//! Batch executor and bulk conveniences.

use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::action::{object_id_of, ActionRecord};
use super::Index;
use crate::errors::{IndexError, Result};
use crate::interfaces::TransportRequest;
use search_client_shared::TaskReference;

impl Index {
    /// Submit action records as one batch.
    ///
    /// Records are applied by the service in the order given. Transport
    /// failures are returned as-is; nothing is retried here.
    ///
    /// # Returns
    ///
    /// * `Ok(TaskReference)` - The task applying the batch
    /// * `Err(IndexError::InvalidArgument)` - If `actions` is empty
    /// * `Err(IndexError::MalformedResponse)` - If the acknowledgment has no `taskID`
    /// * `Err(IndexError::Transport)` - If the request fails
    #[instrument(skip(self, actions), fields(index = %self.name(), count = actions.len()))]
    pub async fn batch(&self, actions: Vec<ActionRecord>) -> Result<TaskReference> {
        if actions.is_empty() {
            return Err(IndexError::invalid_argument("batch must contain at least one action"));
        }

        let requests = serde_json::to_value(&actions)
            .map_err(|e| IndexError::invalid_argument(format!("Unserializable batch: {}", e)))?;
        let ack = self
            .send(TransportRequest::post(
                self.path("/batch"),
                json!({ "requests": requests }),
            ))
            .await?;

        let task = self.task_from_ack(&ack)?;
        debug!(task_id = %task.task_id, "Batch submitted");
        Ok(task)
    }

    /// Add documents, letting the service assign identifiers unless a
    /// document carries its own `objectID`.
    pub async fn add_objects(
        &self,
        objects: impl IntoIterator<Item = Value>,
    ) -> Result<TaskReference> {
        let actions = objects.into_iter().map(ActionRecord::add).collect();
        self.batch(actions).await
    }

    /// Replace documents entirely. Each document must carry its `objectID`.
    pub async fn save_objects(
        &self,
        objects: impl IntoIterator<Item = Value>,
    ) -> Result<TaskReference> {
        let actions = objects
            .into_iter()
            .map(|object| ActionRecord::update(object_id_of(&object)?, object))
            .collect::<Result<Vec<_>>>()?;
        self.batch(actions).await
    }

    /// Partially update documents. Each document must carry its `objectID`.
    pub async fn partial_update_objects(
        &self,
        objects: impl IntoIterator<Item = Value>,
    ) -> Result<TaskReference> {
        let actions = objects
            .into_iter()
            .map(|object| ActionRecord::partial_update(object_id_of(&object)?, object))
            .collect::<Result<Vec<_>>>()?;
        self.batch(actions).await
    }

    /// Delete documents by identifier.
    pub async fn delete_objects<S: AsRef<str>>(&self, object_ids: &[S]) -> Result<TaskReference> {
        let actions = object_ids
            .iter()
            .map(|id| ActionRecord::delete(id.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.batch(actions).await
    }

    /// Delete documents, taking each identifier from the document's own
    /// `objectID`.
    pub async fn delete_objects_by_documents(
        &self,
        documents: impl IntoIterator<Item = Value>,
    ) -> Result<TaskReference> {
        let actions = documents
            .into_iter()
            .map(|document| ActionRecord::delete(object_id_of(&document)?))
            .collect::<Result<Vec<_>>>()?;
        self.batch(actions).await
    }
}
