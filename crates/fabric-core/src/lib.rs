// # fabric-core
//
// Core library for declarative fabric design reconciliation.
//
// ## Architecture Overview
//
// This library reconciles declared infrastructure-design resources against
// the inventory held by a remote fabric management service:
// - **ResourceKind / ResourceDescriptor**: Static table describing each kind
//   (collection path, identity keys, create payload shape)
// - **Transport**: Trait for the remote REST collaborator (fetch, create, delete)
// - **ReconcileEngine**: Fetch, match, act, report, for one declaration at a time
// - **TransportRegistry**: Plugin-based registry for transports
// - **Declarations**: Declared resources loaded from JSON
//
// ## Design Principles
//
// 1. **Table-Driven**: One generic engine, no per-kind reconcile code
// 2. **Create/Delete Only**: Existing entries are never updated
// 3. **Plugin-Based**: Transports are registered dynamically, no hard-coded if-else
// 4. **Library-First**: All core functionality can be used as a library
// 5. **Convergence**: Repeating a reconciliation on a converged inventory is a no-op

pub mod catalog;
pub mod config;
pub mod declaration;
pub mod engine;
pub mod error;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use catalog::{ResourceDescriptor, ResourceKind};
pub use config::{EngineConfig, FabricConfig, TransportConfig};
pub use declaration::{DeclaredResource, Declarations, DesiredState};
pub use engine::{Action, Plan, ReconcileEngine, ReconciliationOutcome};
pub use error::{Error, Result};
pub use registry::TransportRegistry;
pub use traits::{RemoteResponse, Transport, TransportFactory};
