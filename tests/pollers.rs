use std::time::{Duration, Instant};

use azurerm::client::Client;
use azurerm::context::Context;
use azurerm::pollers::{DeletePoller, LongRunningPoller, Poller, PollerError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INTERVAL: Duration = Duration::from_millis(1);

fn client(uri: String) -> Client {
    Client::with_endpoint("test_token".to_string(), uri)
        .unwrap()
        .with_poll_interval(INTERVAL)
}

#[tokio::test]
async fn test_retry_after_overrides_poll_interval() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/operations/slow"))
        .respond_with(ResponseTemplate::new(202).insert_header("Retry-After", "1"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/slow"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "Succeeded" })),
        )
        .with_priority(2)
        .mount(&mock_server)
        .await;

    let url = format!("{}/operations/slow", mock_server.uri());
    let poller_type = LongRunningPoller::new(client(mock_server.uri()), url);
    let started = Instant::now();

    let response = Poller::new(poller_type, INTERVAL, 3)
        .with_initial_delay(Duration::ZERO)
        .poll_until_done(&Context::background())
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(response.map(|r| r.status), Some(200));
}

#[tokio::test]
async fn test_cancelled_status_spellings() {
    for status in ["Canceled", "cancelled"] {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/operations/op"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": status })),
            )
            .mount(&mock_server)
            .await;

        let url = format!("{}/operations/op", mock_server.uri());
        let poller_type = LongRunningPoller::new(client(mock_server.uri()), url);
        let err = Poller::new(poller_type, INTERVAL, 3)
            .poll_until_done(&Context::background())
            .await
            .unwrap_err();

        assert!(
            matches!(err, PollerError::Cancelled { .. }),
            "{status}: got {:?}",
            err
        );
    }
}

#[tokio::test]
async fn test_unexpected_status_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/operations/op"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/operations/op", mock_server.uri());
    let poller_type = LongRunningPoller::new(client(mock_server.uri()), url);
    let err = Poller::new(poller_type, INTERVAL, 3)
        .poll_until_done(&Context::background())
        .await
        .unwrap_err();

    match err {
        PollerError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("Expected UnexpectedStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_poller_waits_for_not_found() {
    let mock_server = MockServer::start().await;
    let resource_path = "/subscriptions/sub/providers/Microsoft.AppConfiguration/locations/westeurope/deletedConfigurationStores/appconf";

    Mock::given(method("GET"))
        .and(path(resource_path))
        .and(query_param("api-version", "2023-03-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "appconf" })))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(resource_path))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(2)
        .expect(1)
        .mount(&mock_server)
        .await;

    let poller_type =
        DeletePoller::for_resource(client(mock_server.uri()), resource_path, "2023-03-01").unwrap();
    let response = Poller::new(poller_type, INTERVAL, 3)
        .poll_until_done(&Context::background())
        .await
        .unwrap();

    assert_eq!(response.map(|r| r.status), Some(404));
}

#[tokio::test]
async fn test_too_many_dropped_connections() {
    // nothing listens on port 1, so every poll fails to connect
    let unreachable = "http://127.0.0.1:1".to_string();
    let poller_type = DeletePoller::new(
        client(unreachable.clone()),
        format!("{unreachable}/operations/op"),
    );

    let err = Poller::new(poller_type, INTERVAL, 3)
        .poll_until_done(&Context::background())
        .await
        .unwrap_err();

    match err {
        PollerError::TooManyDroppedConnections { count, .. } => assert_eq!(count, 4),
        other => panic!("Expected TooManyDroppedConnections, got {:?}", other),
    }
}
