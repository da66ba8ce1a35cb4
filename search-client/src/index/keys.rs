//! Index-scoped API key management.

use serde::Deserialize;
use tracing::{info, instrument};

use super::handle::encode_segment;
use super::{decode, require_non_empty, Index};
use crate::errors::{IndexError, Result};
use crate::interfaces::TransportRequest;
use search_client_shared::{ApiKey, ApiKeyParams, KeyAck};

#[derive(Deserialize)]
struct KeyList {
    #[serde(default)]
    keys: Vec<ApiKey>,
}

impl Index {
    fn key_path(&self, key: &str) -> Result<String> {
        require_non_empty(key, "key")?;
        Ok(self.path(&format!("/keys/{}", encode_segment(key))))
    }

    fn params_body(params: &ApiKeyParams) -> Result<serde_json::Value> {
        serde_json::to_value(params)
            .map_err(|e| IndexError::invalid_argument(format!("Unserializable key parameters: {}", e)))
    }

    /// List the keys scoped to this index.
    pub async fn list_keys(&self) -> Result<Vec<ApiKey>> {
        let response = self.send(TransportRequest::get(self.path("/keys"))).await?;
        let list: KeyList = decode(response, "key list")?;
        Ok(list.keys)
    }

    /// Fetch one key and its permissions.
    pub async fn get_key(&self, key: &str) -> Result<ApiKey> {
        let path = self.key_path(key)?;
        decode(self.send(TransportRequest::get(path)).await?, "key")
    }

    /// Create a key restricted to this index.
    ///
    /// The generated key value is returned in [`KeyAck::key`].
    #[instrument(skip(self, params), fields(index = %self.name()))]
    pub async fn add_key(&self, params: &ApiKeyParams) -> Result<KeyAck> {
        let body = Self::params_body(params)?;
        let ack: KeyAck = decode(
            self.send(TransportRequest::post(self.path("/keys"), body)).await?,
            "key creation",
        )?;
        info!(acl = ?params.acl, "Key created");
        Ok(ack)
    }

    /// Replace the permissions and limits of an existing key.
    #[instrument(skip(self, key, params), fields(index = %self.name()))]
    pub async fn update_key(&self, key: &str, params: &ApiKeyParams) -> Result<KeyAck> {
        let path = self.key_path(key)?;
        let body = Self::params_body(params)?;
        decode(self.send(TransportRequest::put(path, body)).await?, "key update")
    }

    /// Revoke a key.
    #[instrument(skip(self, key), fields(index = %self.name()))]
    pub async fn delete_key(&self, key: &str) -> Result<KeyAck> {
        let path = self.key_path(key)?;
        let ack = decode(self.send(TransportRequest::delete(path)).await?, "key deletion")?;
        info!("Key deleted");
        Ok(ack)
    }
}
