//! Action envelope used by the batch endpoint.
//!
//! Every mutation is expressed as one [`ActionRecord`]: a kind, an optional
//! object identifier and a JSON body. The batch executor never looks at the
//! kind, so adding a mutation never requires a new request builder.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{IndexError, Result};
use search_client_shared::OBJECT_ID_FIELD;

/// Kind of mutation carried by an action record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    /// Add a document. The identifier is optional.
    AddObject,
    /// Replace a document entirely.
    UpdateObject,
    /// Update some attributes of a document.
    PartialUpdateObject,
    /// Delete a document.
    DeleteObject,
}

impl ActionKind {
    /// Whether records of this kind must carry an object identifier.
    pub fn requires_object_id(self) -> bool {
        !matches!(self, Self::AddObject)
    }
}

/// Wire-level `{action, objectID?, body}` record.
///
/// Decoding goes through [`ActionRecord::new`], so a decoded record obeys
/// the same identifier rules as a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawActionRecord")]
pub struct ActionRecord {
    action: ActionKind,
    #[serde(rename = "objectID", skip_serializing_if = "Option::is_none")]
    object_id: Option<String>,
    body: Value,
}

#[derive(Deserialize)]
struct RawActionRecord {
    action: ActionKind,
    #[serde(rename = "objectID", default)]
    object_id: Option<String>,
    #[serde(default)]
    body: Value,
}

impl TryFrom<RawActionRecord> for ActionRecord {
    type Error = IndexError;

    fn try_from(raw: RawActionRecord) -> Result<Self> {
        Self::new(raw.action, raw.object_id, raw.body)
    }
}

impl ActionRecord {
    /// Build a record, validating the identifier against the kind.
    ///
    /// For [`ActionKind::DeleteObject`] the supplied body is ignored and
    /// replaced with `{"objectID": id}`.
    ///
    /// # Returns
    ///
    /// * `Ok(ActionRecord)` - The record
    /// * `Err(IndexError::InvalidArgument)` - If the kind requires an identifier
    ///   and none was given, or the identifier is empty
    pub fn new(kind: ActionKind, object_id: Option<String>, body: Value) -> Result<Self> {
        match object_id {
            Some(ref id) if id.is_empty() => {
                return Err(IndexError::invalid_argument(format!(
                    "{:?} record has an empty objectID",
                    kind
                )));
            }
            None if kind.requires_object_id() => {
                return Err(IndexError::invalid_argument(format!(
                    "{:?} record requires an objectID",
                    kind
                )));
            }
            _ => {}
        }

        let body = match (kind, &object_id) {
            (ActionKind::DeleteObject, Some(id)) => json!({ OBJECT_ID_FIELD: id }),
            _ => body,
        };

        Ok(Self {
            action: kind,
            object_id,
            body,
        })
    }

    /// Add a document and let the service assign its identifier.
    pub fn add(body: Value) -> Self {
        Self {
            action: ActionKind::AddObject,
            object_id: None,
            body,
        }
    }

    pub fn add_with_id(object_id: impl Into<String>, body: Value) -> Result<Self> {
        Self::new(ActionKind::AddObject, Some(object_id.into()), body)
    }

    pub fn update(object_id: impl Into<String>, body: Value) -> Result<Self> {
        Self::new(ActionKind::UpdateObject, Some(object_id.into()), body)
    }

    pub fn partial_update(object_id: impl Into<String>, body: Value) -> Result<Self> {
        Self::new(ActionKind::PartialUpdateObject, Some(object_id.into()), body)
    }

    pub fn delete(object_id: impl Into<String>) -> Result<Self> {
        Self::new(ActionKind::DeleteObject, Some(object_id.into()), Value::Null)
    }

    pub fn kind(&self) -> ActionKind {
        self.action
    }

    pub fn object_id(&self) -> Option<&str> {
        self.object_id.as_deref()
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

/// Read the identifier a document carries in its `objectID` attribute.
pub(crate) fn object_id_of(document: &Value) -> Result<String> {
    match document.get(OBJECT_ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(IndexError::invalid_argument(format!(
            "document has no non-empty string {}",
            OBJECT_ID_FIELD
        ))),
    }
}
