//! Inventory snapshots
//!
//! A snapshot is the full collection for one kind as the remote service
//! returned it, in the service's order. It is fetched fresh for every
//! reconciliation and dropped afterwards.

use crate::error::{Error, Result};
use serde_json::Value;

/// Point-in-time read of one remote collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySnapshot {
    items: Vec<Value>,
}

impl InventorySnapshot {
    /// Build a snapshot from a collection response body
    ///
    /// The body must be an object with an `items` key holding a list. A bare
    /// list, a scalar, or an object without a list under `items` is a schema
    /// error; nothing is coerced.
    pub fn from_body(body: Value) -> Result<Self> {
        let mut container = match body {
            Value::Object(container) => container,
            other => {
                return Err(Error::schema(
                    "collection response is not an object with an 'items' key",
                    other,
                ));
            }
        };

        match container.remove("items") {
            Some(Value::Array(items)) => Ok(Self { items }),
            Some(other) => {
                container.insert("items".to_string(), other);
                Err(Error::schema(
                    "collection 'items' is not a list",
                    Value::Object(container),
                ))
            }
            None => Err(Error::schema(
                "collection response has no 'items' key",
                Value::Object(container),
            )),
        }
    }

    /// Entries in remote order
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
