#![cfg(feature = "async")]

mod common;

use shelly::{
    datatypes::RelayState,
    error::{Error, ProtocolError},
    tokio::Shelly1,
};

use common::{refused_host, FakeShelly};

#[tokio::test]
async fn power_and_status() {
    let server = FakeShelly::serve(vec![
        (200, r#"{"ison": true}"#),
        (200, r#"{"relays": [{"ison": true}]}"#),
    ]);
    let device = Shelly1::new(&server.host()).unwrap();

    let response = device.power(0, true).await.unwrap();
    assert_eq!(Some(&serde_json::json!(true)), response.get("ison"));
    assert_eq!(
        vec![(0, RelayState::On)],
        device.relays().await.unwrap()
    );
    assert_eq!(
        vec!["GET /relay/0?turn=on HTTP/1.1", "GET /status HTTP/1.1"],
        server.requests()
    );
}

#[tokio::test]
async fn toggle_twice() {
    let server = FakeShelly::serve(vec![
        (200, r#"{"ison": true}"#),
        (200, r#"{"ison": false}"#),
    ]);
    let device = Shelly1::new(&server.host()).unwrap();

    device.toggle(0).await.unwrap();
    device.toggle(0).await.unwrap();

    assert_eq!(
        vec![
            "GET /relay/0?turn=toggle HTTP/1.1",
            "GET /relay/0?turn=toggle HTTP/1.1"
        ],
        server.requests()
    );
}

#[tokio::test]
async fn unreachable_device_is_connection_error() {
    let device = Shelly1::new(&refused_host()).unwrap();

    assert!(device.status().await.unwrap_err().is_connection());
}

#[tokio::test]
async fn missing_relay_and_bad_status() {
    let server = FakeShelly::serve(vec![
        (200, r#"{"relays": [{"ison": false}]}"#),
        (500, "Internal Server Error"),
    ]);
    let device = Shelly1::new(&server.host()).unwrap();

    assert!(matches!(
        device.relay_state(1).await,
        Err(Error::Protocol(ProtocolError::MissingRelay(1)))
    ));
    assert!(matches!(
        device.toggle(0).await,
        Err(Error::Protocol(ProtocolError::Status { status: 500, .. }))
    ));
}
