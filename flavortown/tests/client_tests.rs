use flavortown::{FetchError, FlavortownClient, FlavortownURL};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer, api_key: &str) -> FlavortownClient {
    FlavortownClient::with_base(api_key, FlavortownURL::custom(format!("{}/api/v1", server.uri())))
        .unwrap()
}

#[tokio::test]
async fn sends_marker_and_accept_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .and(header("X-Flavortown-Ext-2532", "true"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "projects": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "").await;
    let projects = client.fetch_projects().await.unwrap();
    assert!(projects.is_empty());
}

#[tokio::test]
async fn attaches_normalized_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .and(header("Authorization", "Bearer sekrit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "users": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "sekrit").await;
    client.fetch_users().await.unwrap();
}

#[tokio::test]
async fn omits_authorization_without_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, "").await;
    client.fetch_users().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("Authorization").is_none());
}

#[tokio::test]
async fn store_decodes_each_wrapper_key() {
    for key in ["items", "store_items", "store"] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/store"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                key: [{"id": 1, "name": "Sticker", "ticket_cost": 30}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, "").await;
        let items = client.fetch_store_items().await.unwrap();
        assert_eq!(items.len(), 1, "wrapper key {key:?}");
        assert_eq!(items[0].base_cost(), Some(30));
    }
}

#[tokio::test]
async fn non_200_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/store"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let client = client_for(&server, "").await;
    let err = client.fetch_store_items().await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Status {
            status: 401,
            body: "invalid token".to_string()
        }
    );
    assert!(err.to_string().contains("401"));
    assert!(err.to_string().contains("invalid token"));
}

#[tokio::test]
async fn unreachable_host_surfaces_connection_error() {
    // Port from a listener that is immediately dropped, so nothing is bound.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = FlavortownClient::with_base(
        "",
        FlavortownURL::custom(format!("http://127.0.0.1:{port}/api/v1")),
    )
    .unwrap();

    match client.fetch_projects().await {
        Err(FetchError::Connection(_)) => {}
        other => panic!("expected connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_devlogs_hits_project_scoped_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/3/devlogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "devlogs": [{"id": "10", "duration_seconds": 1800}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, "").await;
    let devlogs = client.fetch_devlogs(3).await.unwrap();
    assert_eq!(devlogs[0].duration_seconds, Some(1800));
}
