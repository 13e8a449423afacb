use std::time::Duration;

use azurerm::client::{Client, ClientError, GenericResourcePredicate, ResourceClient};
use azurerm::context::{Context, ContextError};
use azurerm::models::{GenericResource, ProvisioningState, ResourceGroup};
use azurerm::pollers::PollerError;
use azurerm::resourceids::ResourceGroupId;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUBSCRIPTION: &str = "12345678-1234-9876-4563-123456789012";
const API_VERSION: &str = "2022-09-01";
const GROUP_PATH: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/example";

fn client(server: &MockServer) -> Client {
    Client::with_endpoint("test_token".to_string(), server.uri())
        .unwrap()
        .with_poll_interval(Duration::from_millis(1))
}

fn groups(server: &MockServer) -> ResourceClient<ResourceGroupId, ResourceGroup> {
    ResourceClient::new(client(server), API_VERSION)
}

fn group_id() -> ResourceGroupId {
    ResourceGroupId::new(SUBSCRIPTION, "example")
}

fn group_body(state: &str) -> serde_json::Value {
    serde_json::json!({
        "id": GROUP_PATH,
        "name": "example",
        "location": "westeurope",
        "tags": { "env": "test" },
        "properties": { "provisioningState": state }
    })
}

#[tokio::test]
async fn test_get_sends_token_and_api_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GROUP_PATH))
        .and(query_param("api-version", API_VERSION))
        .and(header("authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_body("Succeeded")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let group = groups(&mock_server)
        .get(&Context::background(), &group_id())
        .await
        .unwrap();

    assert_eq!(group.location, "westeurope");
    assert_eq!(group.tags.unwrap().get("env").map(String::as_str), Some("test"));
    assert_eq!(
        group.properties.unwrap().provisioning_state,
        Some(ProvisioningState::Succeeded)
    );
}

#[tokio::test]
async fn test_get_not_found_keeps_arm_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {
                "code": "ResourceGroupNotFound",
                "message": "Resource group 'example' could not be found."
            }
        })))
        .mount(&mock_server)
        .await;

    let err = groups(&mock_server)
        .get(&Context::background(), &group_id())
        .await
        .unwrap_err();

    assert!(err.was_not_found());
    match &err {
        ClientError::Api { code, message, .. } => {
            assert_eq!(code, "ResourceGroupNotFound");
            assert!(message.contains("could not be found"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
    assert!(!err.to_string().contains("test_token"));
}

#[tokio::test]
async fn test_list_complete_follows_next_link() {
    let mock_server = MockServer::start().await;
    let list_path = format!("{GROUP_PATH}/resources");

    Mock::given(method("GET"))
        .and(path(list_path.as_str()))
        .and(query_param_is_missing("$skiptoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [
                { "id": "/a", "name": "a", "type": "Microsoft.KeyVault/vaults" },
                { "id": "/b", "name": "b", "type": "Microsoft.Storage/storageAccounts" }
            ],
            "nextLink": format!("{}{}?api-version={}&$skiptoken=page2", mock_server.uri(), list_path, API_VERSION)
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(list_path.as_str()))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [
                { "id": "/c", "name": "c", "type": "Microsoft.KeyVault/vaults" }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resources: Vec<GenericResource> = client(&mock_server)
        .list_complete(&Context::background(), &list_path, API_VERSION)
        .await
        .unwrap();

    let ids: Vec<&str> = resources.iter().filter_map(|r| r.id.as_deref()).collect();
    assert_eq!(ids, vec!["/a", "/b", "/c"]);
}

#[tokio::test]
async fn test_list_complete_matching_predicate() {
    let mock_server = MockServer::start().await;
    let list_path = format!("{GROUP_PATH}/resources");

    Mock::given(method("GET"))
        .and(path(list_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [
                { "id": "/a", "name": "a", "type": "Microsoft.KeyVault/vaults" },
                { "id": "/b", "name": "b", "type": "Microsoft.Storage/storageAccounts" },
                { "id": "/c", "name": "c", "type": "Microsoft.KeyVault/vaults" }
            ],
            "nextLink": ""
        })))
        .mount(&mock_server)
        .await;

    let predicate = GenericResourcePredicate {
        type_: Some("Microsoft.KeyVault/vaults".to_string()),
        ..Default::default()
    };
    let vaults = client(&mock_server)
        .list_complete_matching_predicate(&Context::background(), &list_path, API_VERSION, predicate)
        .await
        .unwrap();

    let names: Vec<&str> = vaults.iter().filter_map(|r| r.name.as_deref()).collect();
    assert_eq!(names, vec!["a", "c"]);
}

#[tokio::test]
async fn test_list_complete_fails_on_bad_next_page() {
    let mock_server = MockServer::start().await;
    let list_path = format!("{GROUP_PATH}/resources");

    Mock::given(method("GET"))
        .and(path(list_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [],
            "nextLink": format!("{}/broken", mock_server.uri())
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .list_complete::<GenericResource>(&Context::background(), &list_path, API_VERSION)
        .await
        .unwrap_err();

    assert!(err.was_status_code(500));
}

#[tokio::test]
async fn test_create_or_update_then_poll_follows_async_operation() {
    let mock_server = MockServer::start().await;
    let operation_url = format!("{}/operations/op1", mock_server.uri());

    Mock::given(method("PUT"))
        .and(path(GROUP_PATH))
        .and(query_param("api-version", API_VERSION))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Azure-AsyncOperation", operation_url.as_str())
                .set_body_json(group_body("Creating")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/op1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "InProgress" })),
        )
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/op1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "Succeeded" })),
        )
        .with_priority(2)
        .expect(1)
        .mount(&mock_server)
        .await;

    let model = ResourceGroup {
        location: "westeurope".to_string(),
        ..Default::default()
    };
    groups(&mock_server)
        .create_or_update_then_poll(&Context::background(), &group_id(), &model)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_poll_failure_surfaces_operation_body() {
    let mock_server = MockServer::start().await;
    let operation_url = format!("{}/operations/op2", mock_server.uri());

    Mock::given(method("DELETE"))
        .and(path(GROUP_PATH))
        .respond_with(
            ResponseTemplate::new(202).insert_header("Azure-AsyncOperation", operation_url.as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/op2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "InProgress" })),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/op2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "Failed",
            "error": { "code": "ResourceGroupDeletionBlocked", "message": "blocked" }
        })))
        .with_priority(2)
        .mount(&mock_server)
        .await;

    let err = groups(&mock_server)
        .delete_then_poll(&Context::background(), &group_id())
        .await
        .unwrap_err();

    match err {
        ClientError::Polling(PollerError::Failed { body }) => {
            assert!(body.contains("ResourceGroupDeletionBlocked"));
        }
        other => panic!("Expected Failed polling error, got {:?}", other),
    }

    let polls = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/operations/op2")
        .count();
    assert_eq!(polls, 2);
}

#[tokio::test]
async fn test_location_poll_without_body_succeeds() {
    let mock_server = MockServer::start().await;
    let location = format!("{}/operationResults/op3", mock_server.uri());

    Mock::given(method("DELETE"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(202).insert_header("Location", location.as_str()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operationResults/op3"))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operationResults/op3"))
        .respond_with(ResponseTemplate::new(204))
        .with_priority(2)
        .expect(1)
        .mount(&mock_server)
        .await;

    groups(&mock_server)
        .delete_then_poll(&Context::background(), &group_id())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_provisioning_state_poll_on_put() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_body("Creating")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_body("Updating")))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_body("Succeeded")))
        .with_priority(2)
        .expect(1)
        .mount(&mock_server)
        .await;

    let model = ResourceGroup {
        location: "westeurope".to_string(),
        ..Default::default()
    };
    groups(&mock_server)
        .create_or_update_then_poll(&Context::background(), &group_id(), &model)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_poll_stops_at_deadline() {
    let mock_server = MockServer::start().await;
    let operation_url = format!("{}/operations/forever", mock_server.uri());

    Mock::given(method("DELETE"))
        .and(path(GROUP_PATH))
        .respond_with(
            ResponseTemplate::new(202).insert_header("Azure-AsyncOperation", operation_url.as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/forever"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "InProgress" })),
        )
        .mount(&mock_server)
        .await;

    let ctx = Context::background().with_timeout(Duration::from_millis(200));
    let err = groups(&mock_server)
        .delete_then_poll(&ctx, &group_id())
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            ClientError::Polling(PollerError::Context(ContextError::DeadlineExceeded))
        ),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn test_cancelled_context_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_body("Succeeded")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let ctx = Context::background();
    ctx.cancel();
    let err = groups(&mock_server).get(&ctx, &group_id()).await.unwrap_err();

    assert!(matches!(err, ClientError::Context(ContextError::Canceled)));
}
