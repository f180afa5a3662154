//! Core traits for the fabric reconciliation system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Transport`]: Read and mutate remote inventory collections

pub mod transport;

pub use transport::{RemoteResponse, Transport, TransportFactory};
