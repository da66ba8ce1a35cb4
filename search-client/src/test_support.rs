//! Test doubles for the transport and sleeper traits.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::errors::{IndexError, Result};
use crate::interfaces::{Method, Sleeper, Transport, TransportRequest};

/// Transport that replays scripted responses in order and records every
/// request it receives.
#[derive(Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub(crate) fn with_responses(responses: impl IntoIterator<Item = Result<Value>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) async fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().await.clone()
    }

    pub(crate) async fn remaining(&self) -> usize {
        self.responses.lock().await.len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<Value> {
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(IndexError::connection("no scripted response left")))
    }
}

/// Sleeper that records requested delays and returns immediately.
#[derive(Default)]
pub(crate) struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().await.clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) -> Result<()> {
        self.sleeps.lock().await.push(duration);
        Ok(())
    }
}

/// Minimal in-memory stand-in for the service, covering batch writes,
/// multi-get, search and task status for a single index.
///
/// Every write is published immediately. Search returns documents in
/// identifier order and honours `hitsPerPage` only.
#[derive(Default)]
pub(crate) struct InMemoryTransport {
    objects: Mutex<BTreeMap<String, Value>>,
    requests: Mutex<Vec<TransportRequest>>,
    next_task: Mutex<u64>,
}

impl InMemoryTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn insert(&self, object_id: &str, body: Value) {
        let mut body = body;
        body["objectID"] = json!(object_id);
        self.objects.lock().await.insert(object_id.to_string(), body);
    }

    pub(crate) async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    pub(crate) async fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().await.clone()
    }

    async fn task_ack(&self) -> Value {
        let mut next = self.next_task.lock().await;
        *next += 1;
        json!({ "taskID": *next })
    }

    async fn apply_batch(&self, body: &Value) -> Result<Value> {
        let requests = body["requests"]
            .as_array()
            .ok_or_else(|| IndexError::transport(400, "missing requests"))?;
        let mut objects = self.objects.lock().await;
        let mut object_ids = Vec::new();

        for request in requests {
            let action = request["action"].as_str().unwrap_or_default();
            let object_id = request
                .get("objectID")
                .and_then(Value::as_str)
                .or_else(|| request["body"].get("objectID").and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| format!("generated-{}", objects.len()));
            let mut body = request["body"].clone();

            match action {
                "addObject" | "updateObject" => {
                    body["objectID"] = json!(object_id);
                    objects.insert(object_id.clone(), body);
                }
                "partialUpdateObject" => {
                    let entry = objects
                        .entry(object_id.clone())
                        .or_insert_with(|| json!({ "objectID": object_id }));
                    if let (Some(target), Some(fields)) = (entry.as_object_mut(), body.as_object()) {
                        for (k, v) in fields {
                            target.insert(k.clone(), v.clone());
                        }
                    }
                }
                "deleteObject" => {
                    objects.remove(&object_id);
                }
                other => return Err(IndexError::transport(400, format!("bad action {}", other))),
            }
            object_ids.push(object_id);
        }
        drop(objects);

        let mut ack = self.task_ack().await;
        ack["objectIDs"] = json!(object_ids);
        Ok(ack)
    }

    async fn search(&self, query_string: &str) -> Value {
        let hits_per_page = url::form_urlencoded::parse(query_string.as_bytes())
            .find(|(k, _)| k == "hitsPerPage")
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(20);
        let objects = self.objects.lock().await;
        let hits: Vec<Value> = objects.values().take(hits_per_page).cloned().collect();
        json!({ "hits": hits, "nbHits": objects.len() })
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send(&self, request: TransportRequest) -> Result<Value> {
        self.requests.lock().await.push(request.clone());

        let (path, query_string) = match request.path.split_once('?') {
            Some((path, qs)) => (path.to_string(), qs.to_string()),
            None => (request.path.clone(), String::new()),
        };
        let empty = json!({});
        let body = request.body.as_ref().unwrap_or(&empty);

        match request.method {
            Method::Post if path == "/1/indexes/*/objects" => {
                let objects = self.objects.lock().await;
                let results: Vec<Value> = body["requests"]
                    .as_array()
                    .map(|requests| {
                        requests
                            .iter()
                            .map(|r| {
                                let id = r["objectID"].as_str().unwrap_or_default();
                                objects.get(id).cloned().unwrap_or(Value::Null)
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(json!({ "results": results }))
            }
            Method::Post if path.ends_with("/batch") => self.apply_batch(body).await,
            Method::Get if path.contains("/task/") => Ok(json!({ "status": "published" })),
            Method::Get if path.matches('/').count() == 3 => Ok(self.search(&query_string).await),
            _ => Err(IndexError::transport(404, format!("unhandled {} {}", request.method, path))),
        }
    }
}
