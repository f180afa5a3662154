//! Planned actions and reported outcomes

use crate::catalog::ResourceKind;
use crate::declaration::DesiredState;
use crate::engine::matcher::{self, MatchResult};
use serde::Serialize;
use serde_json::{Value, json};

/// The single corrective step chosen for one declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Matched and desired present: the existing entry is accepted as-is
    Retain {
        /// The matched remote entry
        entry: Value,
    },
    /// Not matched and desired absent: nothing to delete
    Skip {
        /// Human-readable explanation
        message: String,
    },
    /// Not matched and desired present
    Create {
        /// Collection path to POST to
        path: String,
        /// Wire-shape create payload
        payload: Value,
    },
    /// Matched and desired absent
    Delete {
        /// Record path to DELETE
        path: String,
        /// Remote identifier of the matched entry
        remote_id: String,
    },
}

impl Action {
    /// Whether carrying out the action mutates remote state
    pub fn is_mutation(&self) -> bool {
        matches!(self, Action::Create { .. } | Action::Delete { .. })
    }
}

/// Everything decided for one declaration before any mutation
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Resource kind
    pub kind: ResourceKind,
    /// Desired state
    pub state: DesiredState,
    /// What the identity scan found
    pub matched: MatchResult,
    /// The chosen action
    pub action: Action,
}

/// What one reconciliation call reports back
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationOutcome {
    /// Whether remote state was (or in dry-run, would be) changed
    pub changed: bool,
    /// Remote response body, matched entry, or a message
    pub data: Value,
}

impl ReconciliationOutcome {
    /// Outcome of a mutation
    pub fn changed(data: Value) -> Self {
        Self {
            changed: true,
            data,
        }
    }

    /// Outcome of a no-op
    pub fn unchanged(data: Value) -> Self {
        Self {
            changed: false,
            data,
        }
    }

    /// Identifier assigned by the remote service on create
    ///
    /// Lets a caller feed the new `id` into dependent declarations.
    /// String and numeric ids are both accepted, numbers rendered in decimal.
    pub fn created_id(&self) -> Option<String> {
        matcher::remote_id(&self.data)
    }

    /// Outcome for a mutation that was planned but not sent
    pub(crate) fn dry_run(action: &Action) -> Self {
        let mut data = serde_json::to_value(action).unwrap_or_else(|_| json!({}));
        if let Value::Object(fields) = &mut data {
            fields.insert("dry_run".to_string(), Value::Bool(true));
        }
        Self::changed(data)
    }
}
