#![allow(clippy::unwrap_used)]
// End-to-end tests for the `Switch` facade against a mocked NX-API endpoint.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nxvlan_core::{
    CollectingSink, ConfigDecodePolicy, CoreError, DeviceConfig, DiagnosticCode, PortMode, Switch,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Switch, Arc<CollectingSink>) {
    let server = MockServer::start().await;
    let switch = switch_for(&server, |_| {});
    let sink = Arc::new(CollectingSink::new());
    let switch = switch.with_sink(sink.clone());
    (server, switch, sink)
}

fn switch_for(server: &MockServer, tweak: impl FnOnce(&mut DeviceConfig)) -> Switch {
    let endpoint = Url::parse(&format!("{}/ins", server.uri())).unwrap();
    let mut config = DeviceConfig::new(
        endpoint,
        "admin",
        SecretString::from("Admin_1234!".to_string()),
    );
    tweak(&mut config);
    Switch::new(config).unwrap()
}

fn reply(output: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ins_api": {
            "type": "cli_show",
            "version": "1.0",
            "sid": "eoc",
            "outputs": { "output": output }
        }
    }))
}

fn config_codes(codes: &[(&str, &str)]) -> ResponseTemplate {
    let outputs: Vec<_> = codes
        .iter()
        .map(|(code, msg)| json!({ "code": code, "msg": msg, "body": {} }))
        .collect();
    reply(Value::Array(outputs))
}

fn vlan_row(id: u16, name: &str) -> Value {
    json!({
        "vlanshowbr-vlanid": id,
        "vlanshowbr-vlanid-utf": id.to_string(),
        "vlanshowbr-vlanname": name,
        "vlanshowbr-vlanstate": "active",
        "vlanshowbr-shutstate": "noshutdown"
    })
}

fn brief_body(rows: Value) -> Value {
    json!({
        "code": "200",
        "msg": "Success",
        "body": { "TABLE_vlanbriefxbrief": { "ROW_vlanbriefxbrief": rows } }
    })
}

async fn mount_brief(server: &MockServer, rows: Value) {
    Mock::given(method("POST"))
        .and(path("/ins"))
        .and(body_partial_json(json!({ "ins_api": { "type": "cli_show", "input": "show vlan brief" } })))
        .respond_with(reply(brief_body(rows)))
        .mount(server)
        .await;
}

// ── Create / delete ─────────────────────────────────────────────────

#[tokio::test]
async fn test_create_vlan_succeeds_when_every_output_is_200() {
    let (server, switch, sink) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "ins_api": { "type": "cli_conf", "input": "vlan 50;name Finance;exit" }
        })))
        .respond_with(config_codes(&[("200", "Success"), ("200", "Success"), ("200", "Success")]))
        .expect(1)
        .mount(&server)
        .await;

    assert!(switch.create_vlan(50, "Finance").await);
    assert!(sink.diagnostics().is_empty());
}

#[tokio::test]
async fn test_create_vlan_fails_with_device_message() {
    let (server, switch, sink) = setup().await;

    Mock::given(method("POST"))
        .respond_with(config_codes(&[
            ("200", "Success"),
            ("200", "Success"),
            ("500", "invalid mode"),
        ]))
        .mount(&server)
        .await;

    assert!(!switch.create_vlan(50, "Finance").await);

    let diags = sink.take();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, DiagnosticCode::DeviceError);
    assert_eq!(diags[0].message, "invalid mode");
    assert_eq!(diags[0].context_value("operation"), Some("create_vlan"));
}

#[tokio::test]
async fn test_execute_surfaces_rejection_as_error() {
    let (server, switch, _sink) = setup().await;

    Mock::given(method("POST"))
        .respond_with(config_codes(&[("400", "Invalid VLAN")]))
        .mount(&server)
        .await;

    let cmd = nxvlan_core::VlanCommand::Delete {
        id: "50".parse().unwrap(),
    };
    match switch.execute(&cmd).await {
        Err(CoreError::Rejected { message, .. }) => assert_eq!(message, "Invalid VLAN"),
        other => panic!("expected Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_vlan_with_undecodable_reply_is_lenient() {
    let (server, switch, sink) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "ins_api": { "input": "no vlan 50" } })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    assert!(switch.delete_vlan(50).await);
    let diags = sink.take();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, DiagnosticCode::UnverifiedOutcome);
}

#[tokio::test]
async fn test_delete_vlan_with_undecodable_reply_strict_policy() {
    let server = MockServer::start().await;
    let switch = switch_for(&server, |cfg| cfg.decode_policy = ConfigDecodePolicy::Strict);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    assert!(!switch.delete_vlan(50).await);
}

#[tokio::test]
async fn test_invalid_input_never_reaches_device() {
    let (server, switch, sink) = setup().await;

    Mock::given(method("POST"))
        .respond_with(config_codes(&[("200", "Success")]))
        .expect(0)
        .mount(&server)
        .await;

    assert!(!switch.create_vlan(0, "zero").await);
    assert!(!switch.create_vlan(4095, "too-high").await);
    assert!(!switch.create_vlan(10, "").await);
    assert!(!switch.assign_port(10, "Ethernet1/1;reload", PortMode::Access).await);

    let diags = sink.take();
    assert_eq!(diags.len(), 4);
    assert!(diags.iter().all(|d| d.code == DiagnosticCode::InvalidRequest));
}

// ── Read-after-write ────────────────────────────────────────────────

#[tokio::test]
async fn test_created_vlan_appears_in_listing() {
    let (server, switch, _sink) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "ins_api": { "type": "cli_conf" } })))
        .respond_with(config_codes(&[("200", "Success"), ("200", "Success"), ("200", "Success")]))
        .mount(&server)
        .await;
    mount_brief(&server, json!([vlan_row(1, "default"), vlan_row(50, "Finance")])).await;

    assert!(switch.create_vlan(50, "Finance").await);
    let vlans = switch.list_vlans().await;
    assert!(vlans.iter().any(|v| v.id().get() == 50));
    assert_eq!(switch.count_vlans().await, 2);
}

// ── Listing and lookups ─────────────────────────────────────────────

#[tokio::test]
async fn test_single_row_listing() {
    let (server, switch, sink) = setup().await;
    mount_brief(&server, vlan_row(1, "default")).await;

    let vlans = switch.list_vlans().await;
    assert_eq!(vlans.len(), 1);
    assert_eq!(vlans[0].name(), "default");
    assert_eq!(vlans[0].state(), "active");
    assert!(sink.diagnostics().is_empty());
}

#[tokio::test]
async fn test_unknown_table_shape_degrades_to_empty() {
    let (server, switch, sink) = setup().await;

    Mock::given(method("POST"))
        .respond_with(reply(json!({
            "code": "200",
            "body": { "TABLE_mystery": { "ROW_mystery": [] } }
        })))
        .mount(&server)
        .await;

    assert!(switch.list_vlans().await.is_empty());
    assert_eq!(switch.count_vlans().await, 0);

    let diags = sink.take();
    assert!(!diags.is_empty());
    assert!(diags.iter().all(|d| d.code == DiagnosticCode::ShapeError));
    assert_eq!(diags[0].context_value("command"), Some("show vlan brief"));
}

#[tokio::test]
async fn test_find_by_id_accepts_text_and_number() {
    let (server, switch, _sink) = setup().await;
    mount_brief(&server, json!([vlan_row(1, "default"), vlan_row(10, "users")])).await;

    let by_text = switch.find_vlan_by_id("10").await.unwrap();
    let by_number = switch.find_vlan_by_id(10).await.unwrap();
    assert_eq!(by_text, by_number);
    assert_eq!(by_text.name(), "users");
    assert!(switch.find_vlan_by_id(99).await.is_none());
}

#[tokio::test]
async fn test_find_by_name_is_case_insensitive() {
    let (server, switch, _sink) = setup().await;
    mount_brief(
        &server,
        json!([vlan_row(30, "guest-wifi"), vlan_row(40, "voice")]),
    )
    .await;

    let hits = switch.find_vlans_by_name("Guest").await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id().get(), 30);
}

#[tokio::test]
async fn test_query_vlan_uses_device_side_lookup() {
    let (server, switch, _sink) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "ins_api": { "input": "show vlan id 20" } })))
        .respond_with(reply(json!({
            "code": "200",
            "body": { "TABLE_vlanbriefid": { "ROW_vlanbriefid": {
                "vlanshowbr-vlanid": 20,
                "vlanshowbr-vlanname": "servers",
                "vlanshowbr-vlanstate": "active",
                "vlanshowbr-shutstate": "noshutdown",
                "vlanshowplist-ifidx": "Ethernet1/1,Ethernet1/2"
            } } }
        })))
        .mount(&server)
        .await;

    let vlan = switch
        .query_vlan("20".parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(vlan.name(), "servers");
    assert_eq!(vlan.ports().len(), 2);
}

// ── Ports and auth ──────────────────────────────────────────────────

#[tokio::test]
async fn test_assign_port_trunk_batch() {
    let (server, switch, _sink) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "ins_api": {
            "type": "cli_conf",
            "input": "interface Ethernet1/7;switchport mode trunk;switchport trunk allowed vlan add 20"
        } })))
        .respond_with(config_codes(&[("200", "Success"), ("200", "Success"), ("200", "Success")]))
        .expect(1)
        .mount(&server)
        .await;

    assert!(switch.assign_port(20, "Ethernet1/7", PortMode::Trunk).await);
}

#[tokio::test]
async fn test_authentication_probe() {
    let (server, switch, sink) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    assert!(!switch.test_authentication().await);
    assert!(matches!(
        switch.check_authentication().await,
        Err(CoreError::AuthenticationFailed { .. })
    ));
    assert_eq!(sink.take()[0].code, DiagnosticCode::HttpError);
}

// ── Unreachable device ──────────────────────────────────────────────

#[tokio::test]
async fn test_unreachable_switch_yields_false_and_empty() {
    let endpoint = Url::parse("http://127.0.0.1:1/ins").unwrap();
    let sink = Arc::new(CollectingSink::new());
    let switch = Switch::new(DeviceConfig::new(
        endpoint,
        "admin",
        SecretString::from("pw".to_string()),
    ))
    .unwrap()
    .with_sink(sink.clone());

    assert!(!switch.create_vlan(10, "users").await);
    assert!(switch.list_vlans().await.is_empty());
    assert!(switch.find_vlan_by_id(10).await.is_none());
    assert!(!switch.test_authentication().await);

    let diags = sink.take();
    assert_eq!(diags.len(), 4);
    assert!(diags.iter().all(|d| d.code == DiagnosticCode::NetworkError));
}

#[tokio::test]
async fn test_timeout_reports_configured_seconds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply(json!({})).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let switch = switch_for(&server, |cfg| cfg.timeout = Duration::from_secs(1));
    match switch.fetch_vlans().await {
        Err(CoreError::Timeout { timeout_secs }) => assert_eq!(timeout_secs, 1),
        other => panic!("expected Timeout, got: {other:?}"),
    }
}
