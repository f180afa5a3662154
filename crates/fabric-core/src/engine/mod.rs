//! Core reconciliation engine
//!
//! The ReconcileEngine is responsible for:
//! - Fetching a fresh inventory snapshot for the declared kind
//! - Matching the declaration's identity against the snapshot
//! - Choosing at most one corrective action (create or delete)
//! - Carrying it out through the Transport and reporting the outcome
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ DeclaredResource │── kind, state, attributes ──┐
//! └──────────────────┘                             │
//!                                                  ▼
//!                                      ┌──────────────────┐
//!                                      │ ReconcileEngine  │
//!                                      └──────────────────┘
//!                                                  │
//!         ┌────────────────────┬───────────────────┼────────────────────┐
//!         │                    │                   │                    │
//!         ▼                    ▼                   ▼                    ▼
//! ┌──────────────┐   ┌─────────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │  Transport   │   │ Identity match  │   │   Payload    │   │    Transport     │
//! │ (fetch)      │   │ (last wins)     │   │ (transform)  │   │ (create/delete)  │
//! └──────────────┘   └─────────────────┘   └──────────────┘   └──────────────────┘
//! ```
//!
//! ## Decision Table
//!
//! | Matched | Desired | Action                     | changed |
//! |---------|---------|----------------------------|---------|
//! | no      | absent  | none, "does not exist"     | false   |
//! | yes     | absent  | DELETE `{collection}/{id}` | true    |
//! | no      | present | POST payload to collection | true    |
//! | yes     | present | none, entry accepted as-is | false   |
//!
//! Existing entries are never updated and never diffed against the
//! declaration.
//!
//! ## Concurrency
//!
//! Each call is independent and the engine keeps no state between calls.
//! The remote API offers no conditional create, so two callers reconciling
//! the same unmatched identity at the same time can both create it, and a
//! delete can race a caller that still relies on the entry. Callers that
//! need exclusivity must serialize reconciliations themselves.

pub mod matcher;
pub mod outcome;
pub mod payload;
pub mod snapshot;

pub use matcher::{Identity, MatchResult, find_match};
pub use outcome::{Action, Plan, ReconciliationOutcome};
pub use payload::build_create_payload;
pub use snapshot::InventorySnapshot;

use crate::catalog::{ResourceDescriptor, ResourceKind};
use crate::config::EngineConfig;
use crate::declaration::{DeclaredResource, DesiredState};
use crate::error::{Error, Result};
use crate::traits::{RemoteResponse, Transport};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Status the remote service must return for each call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Exactly this status
    Exactly(u16),
    /// Any 2xx status
    Success,
}

impl Expect {
    fn accepts(self, response: &RemoteResponse) -> bool {
        match self {
            Expect::Exactly(expected) => response.status == expected,
            Expect::Success => response.is_success(),
        }
    }
}

const FETCH_EXPECT: Expect = Expect::Exactly(200);
const CREATE_EXPECT: Expect = Expect::Exactly(201);
const DELETE_EXPECT: Expect = Expect::Success;

/// Core reconciliation engine
///
/// Generic over resource kinds: everything kind-specific comes from the
/// kind's [`ResourceDescriptor`].
///
/// ## Lifecycle
///
/// 1. Create with [`ReconcileEngine::new()`]
/// 2. Call [`ReconcileEngine::reconcile()`] once per declaration, in order
/// 3. Drop when done
///
/// ## Errors
///
/// Every failure is returned to the caller unchanged; nothing is retried
/// and nothing is rolled back.
pub struct ReconcileEngine {
    /// Transport to the remote management service
    transport: Box<dyn Transport>,

    /// Plan mutations without issuing them
    dry_run: bool,
}

impl ReconcileEngine {
    /// Create a new reconciliation engine
    ///
    /// # Parameters
    ///
    /// - `transport`: Transport implementation
    /// - `config`: Engine configuration
    pub fn new(transport: Box<dyn Transport>, config: EngineConfig) -> Self {
        Self {
            transport,
            dry_run: config.dry_run,
        }
    }

    /// Whether the engine runs in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Reconcile one declaration
    ///
    /// # Parameters
    ///
    /// - `kind`: Resource kind
    /// - `state`: Desired state
    /// - `attributes`: Kind-specific attribute object including the identity
    ///
    /// # Returns
    ///
    /// - `Ok(ReconciliationOutcome)`: The change (or no-op) that was made
    /// - `Err(Error)`: Identity, transport or schema failure
    pub async fn reconcile(
        &self,
        kind: ResourceKind,
        state: DesiredState,
        attributes: &Value,
    ) -> Result<ReconciliationOutcome> {
        let plan = self.plan(kind, state, attributes).await?;
        self.execute(plan).await
    }

    /// Reconcile a loaded declaration
    pub async fn reconcile_declared(
        &self,
        declared: &DeclaredResource,
    ) -> Result<ReconciliationOutcome> {
        debug!(
            "Reconciling {} [{}] -> {}",
            declared.kind,
            declared.identity_summary(),
            declared.state
        );
        self.reconcile(declared.kind, declared.state, &declared.attributes_value())
            .await
    }

    /// Read and match only, returning the action reconcile would take
    ///
    /// Fails fast with an identity error before any remote call when the
    /// declaration lacks an identity value.
    pub async fn plan(
        &self,
        kind: ResourceKind,
        state: DesiredState,
        attributes: &Value,
    ) -> Result<Plan> {
        let descriptor = kind.descriptor();
        let identity = Identity::from_declared(descriptor, attributes)?;

        let snapshot = self.fetch_snapshot(descriptor).await?;
        let matched = find_match(descriptor, &snapshot, &identity)?;
        let action = decide(descriptor, state, &matched, attributes)?;

        debug!(
            "Planned {} for {} (matched: {})",
            action_name(&action),
            kind,
            matched.matched()
        );

        Ok(Plan {
            kind,
            state,
            matched,
            action,
        })
    }

    /// Carry out a plan
    async fn execute(&self, plan: Plan) -> Result<ReconciliationOutcome> {
        if self.dry_run && plan.action.is_mutation() {
            warn!(
                "[DRY-RUN] Would {} {}",
                action_name(&plan.action),
                plan.kind
            );
            return Ok(ReconciliationOutcome::dry_run(&plan.action));
        }

        let body = match &plan.action {
            Action::Create { path, payload } => {
                info!("Creating {} at {}", plan.kind, path);
                let response = self.transport.create(path, payload).await?;
                let body = expect_status("POST", path, response, CREATE_EXPECT)?;
                info!(
                    "Created {} (id: {})",
                    plan.kind,
                    body.get("id").unwrap_or(&serde_json::Value::Null)
                );
                body
            }
            Action::Delete { path, remote_id } => {
                info!("Deleting {} {}", plan.kind, remote_id);
                let response = self.transport.delete(path).await?;
                let body = expect_status("DELETE", path, response, DELETE_EXPECT)?;
                info!("Deleted {} {}", plan.kind, remote_id);
                body
            }
            Action::Retain { entry } => {
                debug!("{} already present, leaving it unchanged", plan.kind);
                return Ok(ReconciliationOutcome::unchanged(entry.clone()));
            }
            Action::Skip { message } => {
                debug!("{}", message);
                return Ok(ReconciliationOutcome::unchanged(Value::String(message.clone())));
            }
        };

        Ok(ReconciliationOutcome::changed(body))
    }

    /// Fetch the full collection for a kind
    async fn fetch_snapshot(&self, descriptor: &ResourceDescriptor) -> Result<InventorySnapshot> {
        let path = descriptor.collection_path;
        debug!(
            "Fetching {} via {}",
            path,
            self.transport.transport_name()
        );

        let response = self.transport.fetch_collection(path).await?;
        let body = expect_status("GET", path, response, FETCH_EXPECT)?;
        InventorySnapshot::from_body(body)
    }
}

/// Choose the action for a match result and desired state
///
/// Pure: no remote calls. The payload is only built on the create branch.
pub fn decide(
    descriptor: &ResourceDescriptor,
    state: DesiredState,
    matched: &MatchResult,
    attributes: &Value,
) -> Result<Action> {
    let action = match (state, &matched.remote_id, &matched.remote_entry) {
        (DesiredState::Absent, Some(remote_id), Some(_)) => Action::Delete {
            path: descriptor.record_path(remote_id),
            remote_id: remote_id.clone(),
        },
        (DesiredState::Absent, _, _) => Action::Skip {
            message: descriptor.absent_message(),
        },
        (DesiredState::Present, _, Some(entry)) => Action::Retain {
            entry: entry.clone(),
        },
        (DesiredState::Present, _, None) => Action::Create {
            path: descriptor.collection_path.to_string(),
            payload: build_create_payload(descriptor, attributes)?,
        },
    };
    Ok(action)
}

fn expect_status(
    operation: &'static str,
    path: &str,
    response: RemoteResponse,
    expect: Expect,
) -> Result<Value> {
    if expect.accepts(&response) {
        Ok(response.body)
    } else {
        Err(Error::transport(operation, path, response.status, response.body))
    }
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::Retain { .. } => "retain",
        Action::Skip { .. } => "skip",
        Action::Create { .. } => "create",
        Action::Delete { .. } => "delete",
    }
}
