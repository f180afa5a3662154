//! Identity matching
//!
//! Decides whether a remote entry denotes the same resource as a
//! declaration. Every identity component of the kind must be equal, with
//! exact JSON equality: no case folding, no trimming, no string/number
//! coercion. An entry that lacks an identity field simply does not match.
//!
//! The scan visits every entry and the last matching entry wins. Duplicate
//! identities in the remote inventory are not an error here; they are logged
//! and the final one is used.

use crate::catalog::{ResourceDescriptor, display_path, lookup};
use crate::engine::snapshot::InventorySnapshot;
use crate::error::{Error, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// Declared identity values, one per identity key of the kind
#[derive(Debug, Clone, PartialEq)]
pub struct Identity<'a> {
    values: Vec<&'a Value>,
}

impl<'a> Identity<'a> {
    /// Extract identity values from a declaration
    ///
    /// Fails with an identity error naming the first key whose value is
    /// missing or `null`.
    pub fn from_declared(descriptor: &ResourceDescriptor, declared: &'a Value) -> Result<Self> {
        let values = descriptor
            .identity
            .iter()
            .map(|key| match lookup(declared, key.declared) {
                Some(Value::Null) | None => {
                    Err(Error::identity(descriptor.name, display_path(key.declared)))
                }
                Some(value) => Ok(value),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { values })
    }

    /// Whether a remote entry carries this identity
    pub fn matches(&self, descriptor: &ResourceDescriptor, entry: &Value) -> bool {
        descriptor
            .identity
            .iter()
            .zip(&self.values)
            .all(|(key, expected)| lookup(entry, key.remote) == Some(*expected))
    }
}

/// Result of scanning a snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    /// Remote identifier of the matched entry
    pub remote_id: Option<String>,
    /// The matched entry as returned by the remote service
    pub remote_entry: Option<Value>,
}

impl MatchResult {
    /// No entry matched
    pub fn unmatched() -> Self {
        Self::default()
    }

    /// Whether an entry matched
    pub fn matched(&self) -> bool {
        self.remote_entry.is_some()
    }
}

/// Scan a snapshot for the entry carrying `identity`
///
/// A matched entry must carry a string or numeric `id`; otherwise the
/// snapshot violates the collection contract and a schema error is returned.
pub fn find_match(
    descriptor: &ResourceDescriptor,
    snapshot: &InventorySnapshot,
    identity: &Identity<'_>,
) -> Result<MatchResult> {
    let mut found: Option<&Value> = None;
    let mut hits = 0usize;

    for entry in snapshot.items() {
        if identity.matches(descriptor, entry) {
            hits += 1;
            found = Some(entry);
        }
    }

    let Some(entry) = found else {
        debug!(
            "No {} entry matched among {} remote entries",
            descriptor.name,
            snapshot.len()
        );
        return Ok(MatchResult::unmatched());
    };

    if hits > 1 {
        warn!(
            "{} remote {} entries share the declared identity; using the last one",
            hits, descriptor.name
        );
    }

    let remote_id = remote_id(entry)
        .ok_or_else(|| Error::schema("matched entry has no usable 'id'", entry.clone()))?;

    debug!("Matched {} entry with id {}", descriptor.name, remote_id);

    Ok(MatchResult {
        remote_id: Some(remote_id),
        remote_entry: Some(entry.clone()),
    })
}

pub(crate) fn remote_id(entry: &Value) -> Option<String> {
    match entry.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
