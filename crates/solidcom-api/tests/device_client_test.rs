#![allow(clippy::unwrap_used)]
// Integration tests for `DeviceClient` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use solidcom_api::{DeviceClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

const COOKIE: &str = "SESSIONID=abc123; Path=/";

async fn setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let http = TransportConfig::default().build_client().unwrap();
    let client = DeviceClient::with_client(
        http,
        base_url,
        Duration::from_secs(2),
        Duration::from_secs(2),
    );
    (server, client)
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/action/login"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", COOKIE))
        .mount(server)
        .await;
}

async fn logged_in() -> (MockServer, DeviceClient) {
    let (server, client) = setup().await;
    mount_login(&server).await;
    client.login("admin", &secret("admin")).await.unwrap();
    (server, client)
}

fn pack_body() -> serde_json::Value {
    json!([{
        "id": 1, "name": "BS-1", "online": 1, "cascade": 0, "roam": 1,
        "sn": "SC0042", "ip": "192.168.218.10",
        "PP": [
            { "id": 1, "name": "Director", "online": 1, "cell": 6, "rssi": 4,
              "role": { "id": 1, "name": "Production", "head": 1 },
              "talkMode": 2, "channel": ["A", "", "", "", "", ""], "type": 0 },
            { "id": 2, "name": "Camera 1", "online": 1, "cell": 3, "rssi": 2,
              "talkMode": 1, "channel": ["", "B", "", "", "", ""], "type": 0 },
            { "id": 100, "name": "4WIRE_IN", "online": 1, "cell": 0, "rssi": 0,
              "talkMode": 2, "channel": ["A", "", "", "", "", ""], "type": 2 },
            { "id": 101, "name": "UAC_OUT", "online": 1, "cell": 0, "rssi": 0,
              "talkMode": 2, "channel": ["", "", "", "", "", ""], "type": 3 }
        ]
    }])
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_posts_form_and_replays_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/action/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", COOKIE))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/action/getBsRole"))
        .and(header("cookie", COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.login("admin", &secret("s3cret")).await.unwrap();
    assert!(client.is_authenticated());
    client.fetch_roles().await.unwrap();
}

#[tokio::test]
async fn test_login_missing_credentials_sends_nothing() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/action/login"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", COOKIE))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.login("", &secret("admin")).await;
    assert!(matches!(result, Err(Error::Config { .. })), "got: {result:?}");

    let result = client.login("admin", &secret("")).await;
    assert!(matches!(result, Err(Error::Config { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_login_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/action/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let result = client.login("admin", &secret("wrong")).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_login_without_cookie_is_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/action/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = client.login("admin", &secret("admin")).await;
    assert!(matches!(result, Err(Error::Authentication { .. })), "got: {result:?}");
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_requests_without_session_fail_fast() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/action/getAllPpInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pack_body()))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.fetch_pack_info().await;
    assert!(matches!(result, Err(Error::Unauthenticated)), "got: {result:?}");
}

#[tokio::test]
async fn test_logout_drops_session() {
    let (_server, client) = logged_in().await;
    assert!(client.is_authenticated());
    client.logout();
    assert!(!client.is_authenticated());
    assert!(matches!(client.fetch_roles().await, Err(Error::Unauthenticated)));
}

// ── Pack info tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_pack_info_filters_fixed_endpoints() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/action/getAllPpInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pack_body()))
        .mount(&server)
        .await;

    let pack = client.fetch_pack_info().await.unwrap();
    let bs = pack.primary().unwrap();
    assert_eq!(bs.serial_number, "SC0042");
    assert_eq!(bs.headsets.len(), 2);
    assert_eq!(bs.headsets[1].name, "Camera 1");
    assert_eq!(bs.endpoints().len(), 2);
}

#[tokio::test]
async fn test_fetch_pack_info_parse_error_keeps_body() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/action/getAllPpInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    match client.fetch_pack_info().await {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>login</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_push_pack_info_sends_complete_document() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/action/getAllPpInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pack_body()))
        .mount(&server)
        .await;

    // An unchanged fetch pushes back the same document, fixed endpoints
    // included (they are written after the headsets).
    Mock::given(method("POST"))
        .and(path("/action/setPpInfo"))
        .and(header("cookie", COOKIE))
        .and(body_json(pack_body()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let pack = client.fetch_pack_info().await.unwrap();
    client.push_pack_info(&pack).await.unwrap();
}

// ── Role tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_roles_empty_body_is_empty_catalog() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/action/getBsRole"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
        .mount(&server)
        .await;

    let roles = client.fetch_roles().await.unwrap();
    assert!(roles.is_empty());
}

#[tokio::test]
async fn test_push_role_sends_take_effect() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/action/getBsRole"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Production", "head": 0 },
            { "id": 4, "name": "Lighting", "head": 0 }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/action/setBsRole"))
        .and(body_json(json!({ "id": 4, "name": "Lighting", "head": 1, "takeEffect": 1 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let roles = client.fetch_roles().await.unwrap();
    let lighting = roles.iter().find(|r| r.name == "Lighting").unwrap();
    client.push_role(&lighting.taking_effect(true)).await.unwrap();
}

// ── Failure mapping tests ───────────────────────────────────────────

#[tokio::test]
async fn test_rejected_session_is_dropped() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/action/getAllPpInfo"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.fetch_pack_info().await;
    assert!(matches!(result, Err(Error::SessionExpired)), "got: {result:?}");
    assert!(result.unwrap_err().is_auth_expired());
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_redirect_to_login_page_is_session_expired() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/action/getBsRole"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/login.html"))
        .mount(&server)
        .await;

    let result = client.fetch_roles().await;
    assert!(matches!(result, Err(Error::SessionExpired)), "got: {result:?}");
}

#[tokio::test]
async fn test_server_error_maps_to_http() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/action/setPpInfo"))
        .respond_with(ResponseTemplate::new(500).set_body_string("busy"))
        .mount(&server)
        .await;

    let err = client.push_pack_info(&Default::default()).await.unwrap_err();
    assert!(err.is_network());
    match err {
        Error::Http { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "busy");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
    // A device-side failure does not drop the session.
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_slow_read_times_out() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let client = DeviceClient::with_client(
        reqwest::Client::new(),
        base_url,
        Duration::from_millis(200),
        Duration::from_millis(200),
    );
    mount_login(&server).await;
    client.login("admin", &secret("admin")).await.unwrap();

    Mock::given(method("GET"))
        .and(path("/action/getAllPpInfo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(pack_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = client.fetch_pack_info().await;
    assert!(
        matches!(result, Err(Error::Timeout { timeout }) if timeout == Duration::from_millis(200)),
        "got: {result:?}"
    );
    let err = result.unwrap_err();
    assert!(err.is_timeout());
    // Sub-second bounds are reported as configured, not rounded to 0s.
    assert_eq!(err.to_string(), "Request timed out after 200ms");
}
