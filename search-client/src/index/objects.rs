//! Single-document operations, search and settings.

use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::handle::encode_segment;
use super::{decode, require_non_empty, Index};
use crate::errors::{IndexError, Result};
use crate::interfaces::TransportRequest;
use search_client_shared::{AddObjectResponse, Query, SearchResponse, TaskReference, OBJECT_ID_FIELD};

impl Index {
    /// Add a document and let the service assign its identifier.
    #[instrument(skip(self, object), fields(index = %self.name()))]
    pub async fn add_object(&self, object: &Value) -> Result<AddObjectResponse> {
        let ack = self
            .send(TransportRequest::post(self.handle.base_path(), object.clone()))
            .await?;

        let task = self.task_from_ack(&ack)?;
        let object_id = ack
            .get(OBJECT_ID_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| IndexError::malformed("response has no objectID"))?
            .to_string();

        debug!(object_id = %object_id, task_id = %task.task_id, "Object added");
        Ok(AddObjectResponse { object_id, task })
    }

    /// Add or replace the document stored under `object_id`.
    #[instrument(skip(self, object), fields(index = %self.name()))]
    pub async fn save_object(&self, object: &Value, object_id: &str) -> Result<TaskReference> {
        require_non_empty(object_id, "objectID")?;
        let ack = self
            .send(TransportRequest::put(
                self.handle.object_path(object_id),
                object.clone(),
            ))
            .await?;
        self.task_from_ack(&ack)
    }

    /// Fetch one document.
    pub async fn get_object(&self, object_id: &str) -> Result<Value> {
        require_non_empty(object_id, "objectID")?;
        self.send(TransportRequest::get(self.handle.object_path(object_id)))
            .await
    }

    /// Fetch one document, retrieving only the listed attributes.
    pub async fn get_object_with_attributes<S: AsRef<str>>(
        &self,
        object_id: &str,
        attributes: &[S],
    ) -> Result<Value> {
        require_non_empty(object_id, "objectID")?;
        let attributes = attributes
            .iter()
            .map(|a| encode_segment(a.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        let path = format!(
            "{}?attributes={}",
            self.handle.object_path(object_id),
            attributes
        );
        self.send(TransportRequest::get(path)).await
    }

    /// Fetch several documents of this index in one request.
    ///
    /// Results come back in the order of `object_ids`.
    #[instrument(skip(self, object_ids), fields(index = %self.name(), count = object_ids.len()))]
    pub async fn get_objects<S: AsRef<str>>(&self, object_ids: &[S]) -> Result<Vec<Value>> {
        let requests: Vec<Value> = object_ids
            .iter()
            .map(|id| {
                let id = id.as_ref();
                require_non_empty(id, "objectID")?;
                Ok(json!({ "indexName": self.name(), OBJECT_ID_FIELD: id }))
            })
            .collect::<Result<_>>()?;

        let response = self
            .send(
                TransportRequest::post("/1/indexes/*/objects", json!({ "requests": requests }))
                    .read(),
            )
            .await?;

        match response.get("results") {
            Some(Value::Array(results)) => Ok(results.clone()),
            _ => Err(IndexError::malformed("response has no results array")),
        }
    }

    /// Update some attributes of a document, leaving the others untouched.
    #[instrument(skip(self, partial), fields(index = %self.name()))]
    pub async fn partial_update_object(
        &self,
        partial: &Value,
        object_id: &str,
    ) -> Result<TaskReference> {
        require_non_empty(object_id, "objectID")?;
        let path = format!("{}/partial", self.handle.object_path(object_id));
        let ack = self.send(TransportRequest::post(path, partial.clone())).await?;
        self.task_from_ack(&ack)
    }

    /// Delete one document.
    #[instrument(skip(self), fields(index = %self.name()))]
    pub async fn delete_object(&self, object_id: &str) -> Result<TaskReference> {
        require_non_empty(object_id, "objectID")?;
        let ack = self
            .send(TransportRequest::delete(self.handle.object_path(object_id)))
            .await?;
        self.task_from_ack(&ack)
    }

    /// Run a search against the index.
    #[instrument(skip(self, query), fields(index = %self.name()))]
    pub async fn search(&self, query: &Query) -> Result<SearchResponse> {
        let params = query.to_query_string();
        let path = if params.is_empty() {
            self.handle.base_path()
        } else {
            format!("{}?{}", self.handle.base_path(), params)
        };

        let response: SearchResponse =
            decode(self.send(TransportRequest::get(path).read()).await?, "search")?;

        debug!(
            nb_hits = response.nb_hits,
            returned = response.hits.len(),
            "Search completed"
        );
        Ok(response)
    }

    /// Fetch the index settings.
    pub async fn get_settings(&self) -> Result<Value> {
        self.send(TransportRequest::get(self.path("/settings"))).await
    }

    /// Replace the index settings with `settings`.
    #[instrument(skip(self, settings), fields(index = %self.name()))]
    pub async fn set_settings(&self, settings: &Value) -> Result<TaskReference> {
        let ack = self
            .send(TransportRequest::put(self.path("/settings"), settings.clone()))
            .await?;
        self.task_from_ack(&ack)
    }

    /// Delete every document while keeping settings and keys.
    #[instrument(skip(self), fields(index = %self.name()))]
    pub async fn clear_index(&self) -> Result<TaskReference> {
        let ack = self
            .send(TransportRequest::post(self.path("/clear"), json!({})))
            .await?;
        self.task_from_ack(&ack)
    }
}
