//! Contract Test: Fetch Shape and Failure Propagation
//!
//! Verifies that the inventory read is strict about what it accepts and
//! that read failures stop the reconciliation before any mutation.
//!
//! Constraints verified:
//! - A bare list body is a schema error, never coerced
//! - A body without `items` is a schema error
//! - A fetch status other than 200 is a transport error
//! - A fetch that obtains no response surfaces the transport's error
//!
//! If this test fails, the engine may act on an inventory it misread.

mod common;

use common::*;
use fabric_core::{DesiredState, EngineConfig, Error, ReconcileEngine, ResourceKind};
use serde_json::json;

#[tokio::test]
async fn bare_list_is_schema_error() {
    let fabric = MockFabric::new()
        .with_fetch_response(200, json!([remote_ip_pool("pool-1", "cicd_test")]));
    let engine = ReconcileEngine::new(fabric.boxed(), EngineConfig::live());

    let err = engine
        .reconcile(ResourceKind::IpPools, DesiredState::Absent, &cicd_ip_pool())
        .await
        .unwrap_err();

    match err {
        Error::Schema { payload, .. } => assert!(payload.is_array()),
        other => panic!("expected schema error, got {:?}", other),
    }
    assert_eq!(fabric.mutation_count(), 0);
}

#[tokio::test]
async fn object_without_items_is_schema_error() {
    let fabric = MockFabric::new().with_fetch_response(200, json!({"pools": []}));
    let engine = ReconcileEngine::new(fabric.boxed(), EngineConfig::live());

    let err = engine
        .reconcile(ResourceKind::IpPools, DesiredState::Present, &cicd_ip_pool())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Schema { .. }));
    assert_eq!(fabric.mutation_count(), 0);
}

#[tokio::test]
async fn fetch_status_must_be_200() {
    for status in [201u16, 204, 401, 500] {
        let fabric = MockFabric::new().with_fetch_response(status, json!({"items": []}));
        let engine = ReconcileEngine::new(fabric.boxed(), EngineConfig::live());

        let err = engine
            .reconcile(ResourceKind::IpPools, DesiredState::Present, &cicd_ip_pool())
            .await
            .unwrap_err();

        match err {
            Error::Transport {
                operation,
                path,
                status: reported,
                ..
            } => {
                assert_eq!(operation, "GET");
                assert_eq!(path, "resources/ip-pools");
                assert_eq!(reported, status);
            }
            other => panic!("expected transport error for {}, got {:?}", status, other),
        }
        assert_eq!(fabric.mutation_count(), 0);
    }
}

#[tokio::test]
async fn unreachable_service_surfaces_http_error() {
    let fabric = MockFabric::new().with_unreachable_fetch("connection refused");
    let engine = ReconcileEngine::new(fabric.boxed(), EngineConfig::live());

    let err = engine
        .reconcile(ResourceKind::AsnPools, DesiredState::Absent, &json!({"display_name": "a"}))
        .await
        .unwrap_err();

    match err {
        Error::Http(message) => assert_eq!(message, "connection refused"),
        other => panic!("expected http error, got {:?}", other),
    }
    assert_eq!(fabric.fetch_count(), 1);
}

#[tokio::test]
async fn unauthorized_fetch_body_is_carried_in_error() {
    let fabric = MockFabric::new()
        .with_fetch_response(401, json!({"errors": "Invalid token"}));
    let engine = ReconcileEngine::new(fabric.boxed(), EngineConfig::live());

    let err = engine
        .reconcile(ResourceKind::IpPools, DesiredState::Absent, &cicd_ip_pool())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Invalid token"));
}
