// Integration tests for `NdfcClient` using wiremock.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fabricctl_api::types::{
    AdminOperation, AdminStatusRequest, InterfaceRef, NetworkAttachRequest, VpcPairRequest,
    VrfAttachmentRequest, VrfLanAttach,
};
use fabricctl_api::{Credentials, Error, NdfcClient, TransportConfig};

const REST: &str = "/appcenter/cisco/ndfc/api/v1/lan-fabric/rest";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, NdfcClient) {
    let server = MockServer::start().await;
    let client = NdfcClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn rest(p: &str) -> String {
    format!("{REST}/{p}")
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_api_key_headers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(rest("control/fabrics")))
        .and(header("X-Nd-Apikey", "secret-key"))
        .and(header("X-Nd-Username", "admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "fabricName": "Site1", "templateName": "Easy_Fabric" }
        ])))
        .mount(&server)
        .await;

    let client = NdfcClient::from_api_key(
        &server.uri(),
        &SecretString::from("secret-key"),
        "admin",
        &TransportConfig::default(),
    )
    .unwrap();

    let fabrics = client.list_fabrics().await.unwrap();
    assert_eq!(fabrics.len(), 1);
    assert_eq!(fabrics[0].fabric_name, "Site1");
    assert_eq!(fabrics[0].template_name.as_deref(), Some("Easy_Fabric"));
}

#[tokio::test]
async fn test_login_caches_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({
            "userName": "admin",
            "userPasswd": "pw",
            "domain": "DefaultAuth"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jwttoken": "jwt-123" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(rest("top-down/fabrics/Site1/vrfs")))
        .and(header("Authorization", "Bearer jwt-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let credentials = Credentials::Login {
        username: "admin".into(),
        password: SecretString::from("pw"),
        domain: "DefaultAuth".into(),
    };
    let client = NdfcClient::connect(&server.uri(), &credentials, &TransportConfig::default())
        .await
        .unwrap();

    let vrfs = client.list_vrfs("Site1").await.unwrap();
    assert!(vrfs.is_empty());
}

#[tokio::test]
async fn test_login_failure_is_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let credentials = Credentials::Login {
        username: "admin".into(),
        password: SecretString::from("nope"),
        domain: "DefaultAuth".into(),
    };
    let result =
        NdfcClient::connect(&server.uri(), &credentials, &TransportConfig::default()).await;

    assert!(matches!(result, Err(Error::Authentication { .. })));
}

// ── Fabrics ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_fabric_posts_to_template_path() {
    let (server, client) = setup().await;

    let body = json!({ "FABRIC_NAME": "Site1", "BGP_AS": "65001" });
    Mock::given(method("POST"))
        .and(path(rest("control/fabrics/Site1/Easy_Fabric")))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.create_fabric("Site1", "Easy_Fabric", &body).await.unwrap();
}

#[tokio::test]
async fn test_pending_config_accepts_lines_and_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(rest("control/fabrics/Site1/config-preview")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "switchId": "SAL1", "pendingConfig": ["vlan 100", "  name web", ""] },
            { "switchId": "SAL2", "pendingConfig": "interface Ethernet1/1\n  no shutdown\n" }
        ])))
        .mount(&server)
        .await;

    let pending = client.fabric_pending_config("Site1").await.unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].pending_config.lines(), vec!["vlan 100", "  name web"]);
    assert_eq!(
        pending[1].pending_config.lines(),
        vec!["interface Ethernet1/1", "  no shutdown"]
    );
}

#[tokio::test]
async fn test_msd_add_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(rest("control/fabrics/msdAdd")))
        .and(body_json(json!({ "destFabric": "MSD1", "sourceFabric": "Site1" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.msd_add("MSD1", "Site1").await.unwrap();
}

// ── VRFs / Networks ─────────────────────────────────────────────────

#[tokio::test]
async fn test_vrf_attachments_query_and_decode() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(rest("top-down/fabrics/Site1/vrfs/attachments")))
        .and(query_param("vrf-names", "bluevrf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "vrfName": "bluevrf",
            "lanAttachList": [
                { "switchSerialNo": "SAL1", "switchName": "leaf1", "vlanId": 2001, "isLanAttached": true },
                { "switchSerialNo": "SAL2", "switchName": "leaf2", "isLanAttached": false }
            ]
        }])))
        .mount(&server)
        .await;

    let status = client.vrf_attachments("Site1", "bluevrf").await.unwrap();
    assert_eq!(status[0].lan_attach_list.len(), 2);
    assert!(status[0].lan_attach_list[0].is_lan_attached);
    assert_eq!(status[0].lan_attach_list[0].vlan_id, Some(2001));
    assert!(!status[0].lan_attach_list[1].is_lan_attached);
}

#[tokio::test]
async fn test_network_attachments_decode_attach_state() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(rest("top-down/fabrics/Site1/networks/web/attachments")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "networkName": "web",
                "switchSerialNo": "SAL1",
                "switchName": "leaf1",
                "portNames": "Ethernet1/1,Ethernet1/2",
                "vlanId": 100,
                "isLanAttached": true
            },
            { "networkName": "web", "switchSerialNo": "SAL2", "isLanAttached": false }
        ])))
        .mount(&server)
        .await;

    let status = client.network_attachments("Site1", "web").await.unwrap();
    assert_eq!(status.len(), 2);
    assert!(status[0].is_lan_attached);
    assert_eq!(status[0].ports(), vec!["Ethernet1/1", "Ethernet1/2"]);
    assert_eq!(status[0].vlan_id, Some(100));
    assert!(!status[1].is_lan_attached);
}

#[tokio::test]
async fn test_vrf_detach_body_has_deployment_false() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(rest("top-down/fabrics/Site1/vrfs/attachments")))
        .and(body_json(json!([{
            "vrfName": "bluevrf",
            "lanAttachList": [{
                "fabric": "Site1",
                "vrfName": "bluevrf",
                "serialNumber": "SAL1",
                "vlan": "2001",
                "deployment": false,
                "instanceValues": "",
                "freeformConfig": ""
            }]
        }])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let body = vec![VrfAttachmentRequest {
        vrf_name: "bluevrf".into(),
        lan_attach_list: vec![VrfLanAttach {
            fabric: "Site1".into(),
            vrf_name: "bluevrf".into(),
            serial_number: "SAL1".into(),
            vlan: "2001".into(),
            deployment: false,
            instance_values: String::new(),
            freeform_config: String::new(),
        }],
    }];
    client.post_vrf_attachments("Site1", &body).await.unwrap();
}

#[tokio::test]
async fn test_network_attach_omits_detach_ports() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(rest("top-down/fabrics/Site1/networks/web/attachments")))
        .and(body_json(json!({
            "fabric": "Site1",
            "networkName": "web",
            "serialNumber": "SAL1",
            "switchPorts": "Ethernet1/5",
            "vlan": 100,
            "deployment": true,
            "instanceValues": "",
            "freeformConfig": ""
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let body = NetworkAttachRequest {
        fabric: "Site1".into(),
        network_name: "web".into(),
        serial_number: "SAL1".into(),
        switch_ports: Some("Ethernet1/5".into()),
        detach_switch_ports: None,
        vlan: 100,
        deployment: true,
        instance_values: String::new(),
        freeform_config: String::new(),
    };
    client.post_network_attachment(&body).await.unwrap();
}

#[tokio::test]
async fn test_delete_rejection_keeps_status_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(rest("top-down/fabrics/Site1/vrfs/greenvrf")))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("VRF greenvrf has active attachments"),
        )
        .mount(&server)
        .await;

    let err = client.delete_vrf("Site1", "greenvrf").await.unwrap_err();
    match err {
        Error::Api { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("attachments"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

// ── Interfaces / vPC ────────────────────────────────────────────────

#[tokio::test]
async fn test_admin_status_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(rest("interface/adminstatus")))
        .and(body_json(json!({
            "operation": "shut",
            "interfaces": [{ "serialNumber": "SAL1", "ifName": "Ethernet1/9" }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let body = AdminStatusRequest {
        operation: AdminOperation::Shut,
        interfaces: vec![InterfaceRef {
            serial_number: "SAL1".into(),
            if_name: "Ethernet1/9".into(),
        }],
    };
    client.set_admin_status(&body).await.unwrap();
}

#[tokio::test]
async fn test_vpc_pair_create_and_delete() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(rest("vpcpair")))
        .and(body_json(json!({
            "peerOneId": "SAL1",
            "peerTwoId": "SAL2",
            "useVirtualPeerlink": false
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(rest("vpcpair")))
        .and(query_param("serialNumber", "SAL1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_vpc_pair(&VpcPairRequest {
            peer_one_id: "SAL1".into(),
            peer_two_id: "SAL2".into(),
            use_virtual_peerlink: false,
        })
        .await
        .unwrap();
    client.delete_vpc_pair("SAL1").await.unwrap();
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(rest("control/fabrics/Missing")))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = client.get_fabric("Missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_deserialization_error_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(rest("control/fabrics")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client.list_fabrics().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { ref body, .. } if body.contains("gateway")));
}

#[tokio::test]
async fn test_empty_list_body_decodes_as_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(rest("interface")))
        .and(query_param("serialNumber", "SAL1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let groups = client.list_interfaces("SAL1").await.unwrap();
    assert!(groups.is_empty());
}
