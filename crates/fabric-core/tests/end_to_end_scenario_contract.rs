//! Contract Test: End-to-end Scenarios
//!
//! Drives the engine with the IP pool scenario against an empty inventory,
//! then runs a whole declaration document through a create/delete lifecycle.
//!
//! Constraints verified:
//! - present against `items: []` issues one POST with the wire payload
//! - absent against `items: []` issues nothing and says "does not exist"
//! - A document reconciles in order and converges on a second pass
//!
//! If this test fails, the engine does not converge the inventory.

mod common;

use common::*;
use fabric_core::{
    Declarations, DesiredState, EngineConfig, ReconcileEngine, ResourceKind,
};
use serde_json::json;

#[tokio::test]
async fn ip_pool_present_against_empty_inventory() {
    let fabric = MockFabric::new().with_items("resources/ip-pools", vec![]);
    let engine = ReconcileEngine::new(fabric.boxed(), EngineConfig::live());

    let outcome = engine
        .reconcile(ResourceKind::IpPools, DesiredState::Present, &cicd_ip_pool())
        .await
        .expect("reconcile succeeds");

    assert!(outcome.changed);
    assert_eq!(fabric.create_count(), 1);
    assert_eq!(fabric.delete_count(), 0);
    assert_eq!(
        fabric.requests()[1],
        Request::Create {
            path: "resources/ip-pools".to_string(),
            payload: json!({
                "display_name": "cicd_test",
                "subnets": [{"network": "100.1.1.0/24"}],
                "tags": []
            }),
        }
    );
}

#[tokio::test]
async fn ip_pool_absent_against_empty_inventory() {
    let fabric = MockFabric::new().with_items("resources/ip-pools", vec![]);
    let engine = ReconcileEngine::new(fabric.boxed(), EngineConfig::live());

    let outcome = engine
        .reconcile(ResourceKind::IpPools, DesiredState::Absent, &cicd_ip_pool())
        .await
        .expect("reconcile succeeds");

    assert!(!outcome.changed);
    assert_eq!(outcome.data, json!("IP Pool does not exist, exiting"));
    assert_eq!(fabric.mutation_count(), 0);
}

const LAB_DOCUMENT: &str = r#"{
  "resources": [
    { "kind": "asn-pools", "state": "present",
      "display_name": "cicd_asn", "ranges": [{"first": 65300, "last": 65399}] },
    { "kind": "ip-pools", "state": "present",
      "display_name": "cicd_test", "subnets": ["100.1.1.0/24", "100.1.2.0/24"] },
    { "kind": "external-routers", "state": "present",
      "display_name": "edge-1", "asn": 65000, "address": "192.168.10.255" },
    { "kind": "rack-types", "state": "present",
      "id": "L2_Virtual", "display_name": "L2 Virtual",
      "leafs": [{"label": "leaf", "logical_device": "AOS-7x10-Leaf", "link_per_spine_count": 1}] }
  ]
}"#;

#[tokio::test]
async fn declaration_document_converges() {
    let declarations = Declarations::parse(LAB_DOCUMENT).expect("document parses");
    let fabric = MockFabric::new();
    let engine = ReconcileEngine::new(fabric.boxed(), EngineConfig::live());

    for declared in &declarations.resources {
        let outcome = engine
            .reconcile_declared(declared)
            .await
            .expect("first pass succeeds");
        assert!(outcome.changed, "{} was not created", declared.kind);
    }
    assert_eq!(fabric.create_count(), 4);
    assert_eq!(
        fabric.items("resources/ip-pools")[0]["subnets"],
        json!([{"network": "100.1.1.0/24"}, {"network": "100.1.2.0/24"}])
    );

    for declared in &declarations.resources {
        let outcome = engine
            .reconcile_declared(declared)
            .await
            .expect("second pass succeeds");
        assert!(!outcome.changed, "{} changed on second pass", declared.kind);
    }
    assert_eq!(fabric.create_count(), 4);
}

#[tokio::test]
async fn present_then_absent_lifecycle() {
    let fabric = MockFabric::new();
    let engine = ReconcileEngine::new(fabric.boxed(), EngineConfig::live());
    let router = json!({"display_name": "edge-2", "asn": 65001, "address": "10.10.10.1"});

    let created = engine
        .reconcile(ResourceKind::ExternalRouters, DesiredState::Present, &router)
        .await
        .unwrap();
    let id = created.created_id().expect("id assigned");

    let deleted = engine
        .reconcile(ResourceKind::ExternalRouters, DesiredState::Absent, &router)
        .await
        .unwrap();
    assert!(deleted.changed);
    assert_eq!(
        fabric.requests().last(),
        Some(&Request::Delete {
            path: format!("resources/external-routers/{}", id)
        })
    );

    let again = engine
        .reconcile(ResourceKind::ExternalRouters, DesiredState::Absent, &router)
        .await
        .unwrap();
    assert!(!again.changed);
    assert_eq!(again.data, json!("External Router does not exist, exiting"));
    assert!(fabric.items("resources/external-routers").is_empty());
}
