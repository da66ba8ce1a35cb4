//! Per-index credential types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::query::Query;

/// Operation a key is allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Acl {
    Search,
    Browse,
    AddObject,
    DeleteObject,
    DeleteIndex,
    Settings,
    EditSettings,
    Analytics,
    ListIndexes,
}

/// Parameters for creating or updating an index key.
///
/// `validity`, `max_queries_per_ip_per_hour` and `max_hits_per_query` are
/// always sent; zero means "no limit". The remaining fields are only sent
/// when set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyParams {
    pub acl: Vec<Acl>,
    /// Lifetime of the key in seconds.
    pub validity: u64,
    #[serde(rename = "maxQueriesPerIPPerHour")]
    pub max_queries_per_ip_per_hour: u32,
    pub max_hits_per_query: u32,
    #[serde(rename = "indices", skip_serializing_if = "Option::is_none")]
    pub indexes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Query string forced on every search made with the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_parameters: Option<String>,
}

impl ApiKeyParams {
    pub fn new(acl: impl IntoIterator<Item = Acl>) -> Self {
        Self {
            acl: acl.into_iter().collect(),
            validity: 0,
            max_queries_per_ip_per_hour: 0,
            max_hits_per_query: 0,
            indexes: None,
            referers: None,
            description: None,
            query_parameters: None,
        }
    }

    pub fn with_validity(mut self, seconds: u64) -> Self {
        self.validity = seconds;
        self
    }

    pub fn with_max_queries_per_ip_per_hour(mut self, max: u32) -> Self {
        self.max_queries_per_ip_per_hour = max;
        self
    }

    pub fn with_max_hits_per_query(mut self, max: u32) -> Self {
        self.max_hits_per_query = max;
        self
    }

    pub fn with_indexes<I, S>(mut self, indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexes = Some(indexes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_referers<I, S>(mut self, referers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.referers = Some(referers.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Force the given query parameters on every search made with the key.
    pub fn with_query_parameters(mut self, query: &Query) -> Self {
        self.query_parameters = Some(query.to_query_string());
        self
    }
}

/// A key as listed or fetched from the service.
///
/// ACLs are kept as strings so that permissions added to the service later
/// still deserialize.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub value: String,
    #[serde(default)]
    pub acl: Vec<String>,
    #[serde(default)]
    pub validity: u64,
    #[serde(default, rename = "maxQueriesPerIPPerHour")]
    pub max_queries_per_ip_per_hour: u32,
    #[serde(default)]
    pub max_hits_per_query: u32,
    #[serde(default, alias = "indices")]
    pub indexes: Option<Vec<String>>,
    #[serde(default)]
    pub referers: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub query_parameters: Option<String>,
}

/// Acknowledgment of a key creation, update or deletion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyAck {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_params_serialize_limits() {
        let params = ApiKeyParams::new([Acl::Search, Acl::Browse]);

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "acl": ["search", "browse"],
                "validity": 0,
                "maxQueriesPerIPPerHour": 0,
                "maxHitsPerQuery": 0
            })
        );
    }

    #[test]
    fn test_full_params() {
        let params = ApiKeyParams::new([Acl::AddObject])
            .with_validity(3600)
            .with_max_hits_per_query(20)
            .with_referers(["*.example.com"])
            .with_description("importer")
            .with_query_parameters(&Query::default().with_filters("public:true"));

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["acl"], json!(["addObject"]));
        assert_eq!(value["validity"], json!(3600));
        assert_eq!(value["maxHitsPerQuery"], json!(20));
        assert_eq!(value["referers"], json!(["*.example.com"]));
        assert_eq!(value["description"], json!("importer"));
        assert_eq!(value["queryParameters"], json!("filters=public%3Atrue"));
        assert!(value.get("indices").is_none());
    }

    #[test]
    fn test_indexes_serialize_as_indices() {
        let params = ApiKeyParams::new([Acl::Search]).with_indexes(["products", "dev_*"]);

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["indices"], json!(["products", "dev_*"]));
    }

    #[test]
    fn test_key_ack_parses_timestamp() {
        let ack: KeyAck = serde_json::from_value(json!({
            "key": "107da8d0afc2d225ff9a7548caaf599f",
            "createdAt": "2013-01-18T15:33:13.556Z"
        }))
        .unwrap();

        assert_eq!(ack.key.as_deref(), Some("107da8d0afc2d225ff9a7548caaf599f"));
        assert!(ack.created_at.is_some());
        assert!(ack.updated_at.is_none());
    }

    #[test]
    fn test_api_key_tolerates_unknown_acl() {
        let key: ApiKey = serde_json::from_value(json!({
            "value": "k1",
            "acl": ["search", "seeUnretrievableAttributes"]
        }))
        .unwrap();

        assert_eq!(key.acl.len(), 2);
        assert_eq!(key.validity, 0);
    }
}
