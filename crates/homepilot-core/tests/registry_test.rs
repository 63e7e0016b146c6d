#![allow(clippy::unwrap_used)]
// Integration tests for `Registry` discovery against a wiremock hub.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use homepilot_api::{HubClient, TransportConfig};
use homepilot_core::host::memory::InMemoryHost;
use homepilot_core::{
    AccessoryHandle, CoreError, PlatformConfig, Position, Registry, RegistryEntry, Service,
    SharedAccessory, accessory_uuid,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn device(did: &str, device_number: &str, position: i64) -> Value {
    json!({
        "did": did,
        "deviceNumber": device_number,
        "name": format!("Blind {did}"),
        "description": "",
        "statusesMap": { "position": position },
        "hasErrors": 0
    })
}

async fn setup(prune_missing: bool) -> (MockServer, Arc<InMemoryHost>, Registry) {
    let server = MockServer::start().await;
    let url = Url::parse(&server.uri()).unwrap();
    let config = PlatformConfig {
        prune_missing,
        ..PlatformConfig::new(url.clone())
    };
    let client = HubClient::new(url, &TransportConfig::default()).unwrap();
    let host = Arc::new(InMemoryHost::new());
    let registry = Registry::with_client(config, client, host.clone());
    (server, host, registry)
}

async fn mount_devices(server: &MockServer, body: Value) {
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/v4/devices"))
        .and(query_param("devtype", "Actuator"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Discovery ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_discovery_registers_supported_devices() {
    let (server, host, registry) = setup(false).await;
    mount_devices(
        &server,
        json!({ "devices": [device("1", "14234511", 20), device("2", "35000864", 80)] }),
    )
    .await;

    let report = registry.did_finish_launching().await;

    assert_eq!(report.added, vec!["1".to_string(), "2".to_string()]);
    assert!(report.rebound.is_empty());
    assert_eq!(registry.len(), 2);
    assert_eq!(host.registration_count(accessory_uuid("1")), 1);
    assert_eq!(host.registration_count(accessory_uuid("2")), 1);

    let adapter = registry.adapter_by_did("2").unwrap();
    assert_eq!(adapter.state().last_position, Position::new(80).unwrap());
    assert_eq!(adapter.display_name(), "Blind 2");
    let created = host.accessory(accessory_uuid("2")).unwrap();
    assert_eq!(created.service_name(Service::WindowCovering), Some("Blind 2"));
    assert_eq!(
        registry.adapters().iter().map(|a| a.did().to_owned()).collect::<Vec<_>>(),
        vec!["1".to_string(), "2".to_string()]
    );
}

#[tokio::test]
async fn test_discovery_skips_unknown_device_numbers() {
    let (server, host, registry) = setup(false).await;
    mount_devices(
        &server,
        json!({ "devices": [device("1", "99999999", 0), device("2", "36500572_A", 0)] }),
    )
    .await;

    let report = registry.discover().await;

    assert_eq!(report.skipped, vec!["1".to_string()]);
    assert_eq!(report.added, vec!["2".to_string()]);
    assert!(registry.adapter_by_did("1").is_none());
    assert!(!host.is_registered(accessory_uuid("1")));
}

#[tokio::test]
async fn test_discovery_rebinds_restored_accessory() {
    let (server, host, registry) = setup(false).await;
    let uuid = accessory_uuid("7");
    let restored = host.restore("Cached blind", uuid);
    let shared: SharedAccessory = restored.clone();
    registry.configure_accessory(shared);
    assert!(matches!(registry.entry(uuid), Some(RegistryEntry::Restored(_))));

    mount_devices(&server, json!({ "devices": [device("7", "23602075", 55)] })).await;
    let report = registry.discover().await;

    assert_eq!(report.rebound, vec!["7".to_string()]);
    assert!(report.added.is_empty());
    // Restored records are never registered again.
    assert_eq!(host.registration_count(uuid), 0);

    let adapter = registry.adapter(uuid).unwrap();
    assert_eq!(adapter.uuid(), uuid);
    assert_eq!(adapter.display_name(), "Cached blind");
    assert!(restored.is_reachable());
    assert_eq!(restored.context().unwrap().serial, "7");
}

#[tokio::test]
async fn test_second_cycle_replaces_adapter_only() {
    let (server, host, registry) = setup(false).await;
    mount_devices(&server, json!({ "devices": [device("1", "14234511", 10)] })).await;
    registry.discover().await;
    let first = registry.adapter_by_did("1").unwrap();

    mount_devices(&server, json!({ "devices": [device("1", "14234511", 60)] })).await;
    let report = registry.discover().await;

    let second = registry.adapter_by_did("1").unwrap();
    assert_eq!(report.rebound, vec!["1".to_string()]);
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(first.accessory(), second.accessory()));
    assert_eq!(second.state().last_position, Position::new(60).unwrap());
    assert_eq!(host.registration_count(accessory_uuid("1")), 1);
}

#[tokio::test]
async fn test_malformed_discovery_creates_nothing() {
    let (server, host, registry) = setup(false).await;
    mount_devices(&server, json!({ "response": "error" })).await;

    let report = registry.discover().await;

    assert!(report.is_empty());
    assert!(registry.is_empty());
    assert!(host.registered_uuids().is_empty());

    let result = registry.try_discover().await;
    assert!(
        matches!(result, Err(CoreError::Discovery { .. })),
        "expected Discovery error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_sibling_does_not_block_discovery() {
    for bad in [
        json!({ "did": "2", "deviceNumber": "99999999", "hasErrors": "0" }),
        json!({ "did": "2", "deviceNumber": "99999999", "statusesMap": { "Position": "n/a" } }),
        json!({ "deviceNumber": "99999999" }),
        json!({ "did": "2", "deviceNumber": "99999999", "name": 7 }),
    ] {
        let (server, host, registry) = setup(false).await;
        mount_devices(&server, json!({ "devices": [device("1", "14234511", 20), bad] })).await;

        let report = registry.try_discover().await.unwrap();

        assert_eq!(report.added, vec!["1".to_string()]);
        assert_eq!(host.registration_count(accessory_uuid("1")), 1);
        assert_eq!(registry.len(), 1);
    }
}

#[tokio::test]
async fn test_devices_not_an_array_is_a_discovery_error() {
    let (server, host, registry) = setup(false).await;
    mount_devices(&server, json!({ "devices": { "1": {} } })).await;

    let result = registry.try_discover().await;

    assert!(
        matches!(result, Err(CoreError::Discovery { .. })),
        "expected Discovery error, got: {result:?}"
    );
    assert!(host.registered_uuids().is_empty());
}

#[tokio::test]
async fn test_unreachable_hub_is_swallowed() {
    let (server, _host, registry) = setup(false).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(registry.discover().await.is_empty());
    assert!(matches!(
        registry.try_discover().await,
        Err(CoreError::RequestFailed { .. })
    ));
}

// ── Removal ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_remove_accessory() {
    let (server, host, registry) = setup(false).await;
    mount_devices(&server, json!({ "devices": [device("1", "14234511", 10)] })).await;
    registry.discover().await;
    let uuid = accessory_uuid("1");
    let accessory = registry.entry(uuid).unwrap().accessory();

    registry.remove_accessory(&accessory);

    assert!(registry.entry(uuid).is_none());
    assert!(!host.is_registered(uuid));
    assert_eq!(host.unregistered(), vec![uuid]);
}

#[tokio::test]
async fn test_vanished_devices_are_kept_by_default() {
    let (server, host, registry) = setup(false).await;
    mount_devices(&server, json!({ "devices": [device("1", "14234511", 10)] })).await;
    registry.discover().await;

    mount_devices(&server, json!({ "devices": [] })).await;
    let report = registry.discover().await;

    assert!(report.pruned.is_empty());
    assert!(registry.adapter_by_did("1").is_some());
    assert!(host.is_registered(accessory_uuid("1")));
}

#[tokio::test]
async fn test_vanished_devices_are_pruned_when_enabled() {
    let (server, host, registry) = setup(true).await;
    mount_devices(
        &server,
        json!({ "devices": [device("1", "14234511", 10), device("2", "14234511", 10)] }),
    )
    .await;
    assert!(registry.discover().await.pruned.is_empty());

    let stale = accessory_uuid("old");
    let restored: SharedAccessory = host.restore("Old blind", stale);
    registry.configure_accessory(restored);

    mount_devices(&server, json!({ "devices": [device("1", "14234511", 10)] })).await;
    let report = registry.discover().await;

    let mut pruned = report.pruned.clone();
    pruned.sort();
    let mut expected = vec![stale, accessory_uuid("2")];
    expected.sort();
    assert_eq!(pruned, expected);
    assert_eq!(registry.len(), 1);
    assert!(!host.is_registered(accessory_uuid("2")));
    assert!(host.is_registered(accessory_uuid("1")));
}

#[tokio::test]
async fn test_failed_discovery_never_prunes() {
    let (server, host, registry) = setup(true).await;
    mount_devices(&server, json!({ "devices": [device("1", "14234511", 10)] })).await;
    registry.discover().await;

    mount_devices(&server, json!({ "oops": true })).await;
    registry.discover().await;

    assert_eq!(registry.len(), 1);
    assert!(host.is_registered(accessory_uuid("1")));
}
