use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::protocol::{AccessRequest, AccessRequestResult, GroupsSnapshot, Permission};

use super::*;

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn get_json_parses_success_body_in_server_order() {
    let router = Router::new().route(
        "/api/access-request/groups",
        get(|| async {
            Json(GroupsSnapshot {
                available_groups: vec!["zeta".into(), "alpha".into()],
                my_groups: vec!["shared".into()],
            })
        }),
    );
    let base = spawn_server(router).await;

    let client = ApiClient::new(base.as_str()).expect("client");
    let snapshot: GroupsSnapshot = client.get_json(&["groups"]).await.expect("groups");
    assert_eq!(snapshot.available_groups, vec!["zeta", "alpha"]);
    assert_eq!(snapshot.my_groups, vec!["shared"]);
}

#[tokio::test]
async fn non_2xx_with_conventional_body_surfaces_the_error_field() {
    let router = Router::new().route(
        "/api/access-request/submit",
        post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, r#"{"error":"bad tenant"}"#) }),
    );
    let base = spawn_server(router).await;

    let client = ApiClient::new(base.as_str()).expect("client");
    let request = AccessRequest {
        tenant_name: "kbase".into(),
        permission: Permission::ReadOnly,
        justification: None,
    };
    let err = client
        .post_json::<_, AccessRequestResult>(&["submit"], &request)
        .await
        .expect_err("should fail");
    assert_eq!(
        err,
        TransportError::Status {
            status: 422,
            message: "bad tenant".into()
        }
    );
}

#[tokio::test]
async fn non_2xx_with_unparsable_body_falls_back_to_status_message() {
    let router = Router::new().route(
        "/api/access-request/groups",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>") }),
    );
    let base = spawn_server(router).await;

    let client = ApiClient::new(base.as_str()).expect("client");
    let err = client
        .get_json::<GroupsSnapshot>(&["groups"])
        .await
        .expect_err("should fail");
    assert_eq!(
        err,
        TransportError::Status {
            status: 500,
            message: "Request failed: 500".into()
        }
    );
}

#[tokio::test]
async fn connection_failure_is_a_distinct_network_error() {
    // Bind then drop a listener so the port is (momentarily) closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = ApiClient::new(format!("http://{addr}")).expect("client");
    let err = client
        .get_json::<GroupsSnapshot>(&["groups"])
        .await
        .expect_err("should fail");
    assert!(matches!(err, TransportError::Network { .. }), "got {err:?}");
}

#[tokio::test]
async fn get_text_returns_raw_body() {
    let router = Router::new().route(
        "/api/access-request/credentials/config",
        get(|| async { "hub:\n  url: https://hub.example.org\n" }),
    );
    let base = spawn_server(router).await;

    let client = ApiClient::new(base.as_str()).expect("client");
    let body = client
        .get_text(&["credentials", "config"])
        .await
        .expect("config body");
    assert!(body.starts_with("hub:"));
}

#[test]
fn rejects_unsupported_base_urls() {
    assert!(matches!(
        ApiClient::new("not a url"),
        Err(TransportError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        ApiClient::new("ftp://hub.example.org"),
        Err(TransportError::InvalidBaseUrl { .. })
    ));
}

#[test]
fn endpoint_appends_prefix_and_segments_to_trimmed_base() {
    let client = ApiClient::new("https://hub.example.org/ ").expect("client");
    assert_eq!(
        client.endpoint(&["credentials", "info"]),
        "https://hub.example.org/api/access-request/credentials/info"
    );
}
