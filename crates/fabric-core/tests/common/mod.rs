//! Test doubles and common utilities for reconciliation contract tests
//!
//! This module provides an in-memory stand-in for the remote management
//! service. It behaves like the real collection API closely enough to verify
//! the engine's contract (one fetch, at most one mutation, correct paths and
//! payloads) without any network.

#![allow(dead_code)]

use fabric_core::error::{Error, Result};
use fabric_core::traits::{RemoteResponse, Transport};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One request the engine sent
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Fetch { path: String },
    Create { path: String, payload: Value },
    Delete { path: String },
}

impl Request {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Request::Fetch { .. })
    }
}

/// Scripted replacement for one operation's response
#[derive(Debug, Clone)]
enum Override {
    Respond(RemoteResponse),
    Fail(String),
}

#[derive(Debug, Default)]
struct Shared {
    /// Collections keyed by path, in remote order
    collections: Mutex<HashMap<String, Vec<Value>>>,
    /// Every request, in order
    requests: Mutex<Vec<Request>>,
    fetch_count: AtomicUsize,
    create_count: AtomicUsize,
    delete_count: AtomicUsize,
    next_id: AtomicUsize,
    fetch_override: Mutex<Option<Override>>,
    create_override: Mutex<Option<Override>>,
    delete_override: Mutex<Option<Override>>,
}

/// An in-memory Transport that records every call
///
/// Creates append the payload to the collection, keeping a declared `id` or
/// generating one, and answer `201 {"id": ...}`; deletes remove the entry
/// and answer `202`.
#[derive(Debug, Clone, Default)]
pub struct MockFabric {
    shared: Arc<Shared>,
}

impl MockFabric {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection with remote entries
    pub fn with_items(self, path: &str, items: Vec<Value>) -> Self {
        self.shared
            .collections
            .lock()
            .unwrap()
            .insert(path.to_string(), items);
        self
    }

    /// Answer every fetch with this response instead of the collection
    pub fn with_fetch_response(self, status: u16, body: Value) -> Self {
        *self.shared.fetch_override.lock().unwrap() =
            Some(Override::Respond(RemoteResponse::new(status, body)));
        self
    }

    /// Answer every create with this response, leaving the collection alone
    pub fn with_create_response(self, status: u16, body: Value) -> Self {
        *self.shared.create_override.lock().unwrap() =
            Some(Override::Respond(RemoteResponse::new(status, body)));
        self
    }

    /// Answer every delete with this response, leaving the collection alone
    pub fn with_delete_response(self, status: u16, body: Value) -> Self {
        *self.shared.delete_override.lock().unwrap() =
            Some(Override::Respond(RemoteResponse::new(status, body)));
        self
    }

    /// Fail every fetch as if no response was obtained
    pub fn with_unreachable_fetch(self, message: &str) -> Self {
        *self.shared.fetch_override.lock().unwrap() = Some(Override::Fail(message.to_string()));
        self
    }

    /// A boxed handle sharing state with this one, for handing to the engine
    pub fn boxed(&self) -> Box<dyn Transport> {
        Box::new(self.clone())
    }

    pub fn fetch_count(&self) -> usize {
        self.shared.fetch_count.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.shared.create_count.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.shared.delete_count.load(Ordering::SeqCst)
    }

    pub fn mutation_count(&self) -> usize {
        self.create_count() + self.delete_count()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.shared.requests.lock().unwrap().clone()
    }

    /// Current contents of a collection
    pub fn items(&self, path: &str) -> Vec<Value> {
        self.shared
            .collections
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, request: Request) {
        self.shared.requests.lock().unwrap().push(request);
    }

    fn scripted(slot: &Mutex<Option<Override>>) -> Option<Result<RemoteResponse>> {
        match slot.lock().unwrap().clone()? {
            Override::Respond(response) => Some(Ok(response)),
            Override::Fail(message) => Some(Err(Error::http(message))),
        }
    }
}

#[async_trait::async_trait]
impl Transport for MockFabric {
    async fn fetch_collection(&self, path: &str) -> Result<RemoteResponse> {
        self.shared.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.record(Request::Fetch {
            path: path.to_string(),
        });

        if let Some(scripted) = Self::scripted(&self.shared.fetch_override) {
            return scripted;
        }

        Ok(RemoteResponse::new(200, json!({ "items": self.items(path) })))
    }

    async fn create(&self, path: &str, payload: &Value) -> Result<RemoteResponse> {
        self.shared.create_count.fetch_add(1, Ordering::SeqCst);
        self.record(Request::Create {
            path: path.to_string(),
            payload: payload.clone(),
        });

        if let Some(scripted) = Self::scripted(&self.shared.create_override) {
            return scripted;
        }

        // Kinds that declare their own id (rack types) keep it
        let mut entry = payload.clone();
        let id = match entry.get("id") {
            Some(declared) if !declared.is_null() => declared.clone(),
            _ => {
                let generated = self.shared.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                Value::String(format!("generated-{}", generated))
            }
        };
        if let Value::Object(fields) = &mut entry {
            fields.insert("id".to_string(), id.clone());
        }
        self.shared
            .collections
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push(entry);

        Ok(RemoteResponse::new(201, json!({ "id": id })))
    }

    async fn delete(&self, path: &str) -> Result<RemoteResponse> {
        self.shared.delete_count.fetch_add(1, Ordering::SeqCst);
        self.record(Request::Delete {
            path: path.to_string(),
        });

        if let Some(scripted) = Self::scripted(&self.shared.delete_override) {
            return scripted;
        }

        let (collection, id) = path.rsplit_once('/').expect("record path has an id segment");
        let mut collections = self.shared.collections.lock().unwrap();
        let items = collections.entry(collection.to_string()).or_default();
        let before = items.len();
        items.retain(|item| match &item["id"] {
            Value::String(existing) => existing != id,
            Value::Number(existing) => existing.to_string() != id,
            _ => true,
        });

        if items.len() == before {
            return Ok(RemoteResponse::new(404, json!({ "errors": "not found" })));
        }
        Ok(RemoteResponse::new(202, Value::Null))
    }

    fn transport_name(&self) -> &'static str {
        "mock"
    }
}

/// The IP pool declaration used across scenarios
pub fn cicd_ip_pool() -> Value {
    json!({
        "display_name": "cicd_test",
        "subnets": ["100.1.1.0/24"]
    })
}

/// A remote IP pool entry as the service would list it
pub fn remote_ip_pool(id: &str, display_name: &str) -> Value {
    json!({
        "id": id,
        "display_name": display_name,
        "subnets": [{"network": "100.1.1.0/24", "status": "pool_element_available"}],
        "tags": [],
        "status": "not_in_use"
    })
}
