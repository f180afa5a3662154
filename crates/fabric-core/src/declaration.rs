//! Declared resources
//!
//! A declaration names a resource kind, the desired state and a kind-specific
//! attribute bag. Declaration documents are JSON:
//!
//! ```json
//! {
//!   "resources": [
//!     { "kind": "ip-pools", "state": "present",
//!       "display_name": "cicd_test", "subnets": ["100.1.1.0/24"] }
//!   ]
//! }
//! ```
//!
//! Entries are kept in document order. The engine does not resolve
//! dependencies between them, so dependent resources must be listed after
//! the resources they refer to.

use crate::catalog::{ResourceKind, display_path, lookup};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Whether a resource should exist remotely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// The resource should exist
    Present,
    /// The resource should not exist
    Absent,
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesiredState::Present => f.write_str("present"),
            DesiredState::Absent => f.write_str("absent"),
        }
    }
}

/// The caller's input for one reconciliation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredResource {
    /// Resource kind
    pub kind: ResourceKind,

    /// Desired state
    pub state: DesiredState,

    /// Kind-specific attributes, including the identity value(s)
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl DeclaredResource {
    /// Create a declaration from an attribute object
    ///
    /// Fails with a declaration error when `attributes` is not a JSON object.
    pub fn new(kind: ResourceKind, state: DesiredState, attributes: Value) -> Result<Self> {
        match attributes {
            Value::Object(attributes) => Ok(Self {
                kind,
                state,
                attributes,
            }),
            other => Err(Error::declaration(format!(
                "{} attributes must be an object, got: {}",
                kind, other
            ))),
        }
    }

    /// Attributes as a JSON value
    pub fn attributes_value(&self) -> Value {
        Value::Object(self.attributes.clone())
    }

    /// Human-readable identity for logging (`display_name=cicd_test`)
    pub fn identity_summary(&self) -> String {
        let attributes = self.attributes_value();
        self.kind
            .descriptor()
            .identity
            .iter()
            .map(|key| {
                let value = lookup(&attributes, key.declared)
                    .map(Value::to_string)
                    .unwrap_or_else(|| "<missing>".to_string());
                format!("{}={}", display_path(key.declared), value)
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// An ordered list of declared resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Declarations {
    /// Declared resources, in document order
    pub resources: Vec<DeclaredResource>,
}

impl Declarations {
    /// Parse a declaration document
    pub fn parse(document: &str) -> Result<Self> {
        let declarations: Declarations = serde_json::from_str(document)
            .map_err(|e| Error::declaration(format!("Invalid declaration document: {}", e)))?;
        declarations.validate()?;
        Ok(declarations)
    }

    /// Load a declaration document from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|e| {
            Error::declaration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&document)
    }

    /// Validate the document as a whole
    pub fn validate(&self) -> Result<()> {
        if self.resources.is_empty() {
            return Err(Error::declaration("No resources declared"));
        }
        Ok(())
    }

    /// Number of declared resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether no resources are declared
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
