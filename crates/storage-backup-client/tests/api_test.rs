use mockito::{Matcher, Server};
use serde_json::json;
use storage_backup_client::{ApiClient, ApiError, CreateBucketRequest};

const SERVICE_KEY: &str = "service-role-key";

fn client_for(server: &Server) -> ApiClient {
    ApiClient::new(server.url(), SERVICE_KEY, None).expect("client")
}

#[tokio::test]
async fn list_buckets_sends_both_auth_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/storage/v1/bucket")
        .match_header("authorization", "Bearer service-role-key")
        .match_header("apikey", SERVICE_KEY)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": "avatars", "name": "avatars", "public": true,
                 "file_size_limit": 1048576, "allowed_mime_types": ["image/png"]},
                {"id": "docs", "name": "docs"},
                {"id": "legacy", "name": "legacy", "public": null}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let buckets = client_for(&server).list_buckets().await.unwrap();

    mock.assert_async().await;
    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets[0].name, "avatars");
    assert_eq!(buckets[0].public, Some(true));
    assert_eq!(buckets[0].file_size_limit, Some(1048576));
    assert_eq!(
        buckets[0].allowed_mime_types,
        Some(vec!["image/png".to_string()])
    );
    assert_eq!(buckets[1].public, None);
    assert_eq!(buckets[2].public, None);
}

#[tokio::test]
async fn list_objects_posts_single_page_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/storage/v1/object/list/avatars")
        .match_header("apikey", SERVICE_KEY)
        .match_body(Matcher::Json(
            json!({"prefix": "sub", "limit": 1000, "offset": 0}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"name": "nested", "id": null},
                {"name": "b.png", "id": "f9a0", "metadata": {"size": 5}}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let entries = client_for(&server)
        .list_objects("avatars", "sub")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(entries.len(), 2);
    assert!(entries[0].is_folder());
    assert_eq!(entries[1].name, "b.png");
    assert!(!entries[1].is_folder());
}

#[tokio::test]
async fn fetch_object_returns_raw_bytes() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/storage/v1/object/avatars/sub/b.png")
        .match_header("authorization", "Bearer service-role-key")
        .with_status(200)
        .with_body(vec![0x89, b'P', b'N', b'G'])
        .create_async()
        .await;

    let bytes = client_for(&server)
        .fetch_object("avatars", "sub/b.png")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(&bytes[..], &[0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn error_status_carries_code_and_body() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", "/storage/v1/object/avatars/gone.png")
        .with_status(404)
        .with_body(r#"{"error":"not_found","message":"Object not found"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .fetch_object("avatars", "gone.png")
        .await
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    match err {
        ApiError::Status { body, .. } => assert!(body.contains("Object not found")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn upload_object_sets_content_type_and_upsert() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/storage/v1/object/avatars/sub/b.png")
        .match_header("content-type", "image/png")
        .match_header("x-upsert", "true")
        .match_header("apikey", SERVICE_KEY)
        .match_body("png-bytes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"Key":"avatars/sub/b.png","Id":"1d2e"}"#)
        .create_async()
        .await;

    let key = client_for(&server)
        .upload_object(
            "avatars",
            "sub/b.png",
            b"png-bytes".to_vec(),
            "image/png",
            true,
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(key, "avatars/sub/b.png");
}

#[tokio::test]
async fn create_bucket_omits_unset_limits() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/storage/v1/bucket")
        .match_body(Matcher::Json(
            json!({"id": "docs", "name": "docs", "public": false}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name":"docs"}"#)
        .create_async()
        .await;

    let request = CreateBucketRequest {
        id: "docs".to_string(),
        name: "docs".to_string(),
        public: false,
        file_size_limit: None,
        allowed_mime_types: None,
    };
    client_for(&server).create_bucket(&request).await.unwrap();

    mock.assert_async().await;
}
