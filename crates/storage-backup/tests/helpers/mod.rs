#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use storage_backup_client::ApiClient;

pub const SERVICE_KEY: &str = "test-service-role-key";

pub fn client_for(server: &ServerGuard) -> ApiClient {
    ApiClient::new(server.url(), SERVICE_KEY, None).expect("Failed to create client")
}

/// Listing entry for a folder (no `id`).
pub fn folder(name: &str) -> Value {
    json!({
        "name": name,
        "id": null,
        "updated_at": null,
        "created_at": null,
        "last_accessed_at": null,
        "metadata": null
    })
}

/// Listing entry for a file.
pub fn file(name: &str) -> Value {
    json!({
        "name": name,
        "id": format!("id-{}", name),
        "updated_at": "2024-05-01T10:00:00Z",
        "created_at": "2024-05-01T10:00:00Z",
        "last_accessed_at": "2024-05-01T10:00:00Z",
        "metadata": {"size": 4, "mimetype": "application/octet-stream"}
    })
}

pub async fn mock_buckets(server: &mut ServerGuard, buckets: Value) -> Mock {
    server
        .mock("GET", "/storage/v1/bucket")
        .match_header("authorization", format!("Bearer {}", SERVICE_KEY).as_str())
        .match_header("apikey", SERVICE_KEY)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(buckets.to_string())
        .create_async()
        .await
}

pub async fn mock_listing(
    server: &mut ServerGuard,
    bucket: &str,
    prefix: &str,
    entries: Vec<Value>,
) -> Mock {
    server
        .mock("POST", format!("/storage/v1/object/list/{}", bucket).as_str())
        .match_header("apikey", SERVICE_KEY)
        .match_body(Matcher::Json(
            json!({"prefix": prefix, "limit": 1000, "offset": 0}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(Value::Array(entries).to_string())
        .create_async()
        .await
}

pub async fn mock_object(server: &mut ServerGuard, bucket: &str, path: &str, body: &[u8]) -> Mock {
    server
        .mock("GET", format!("/storage/v1/object/{}/{}", bucket, path).as_str())
        .match_header("apikey", SERVICE_KEY)
        .with_status(200)
        .with_body(body)
        .create_async()
        .await
}

pub async fn mock_status(
    server: &mut ServerGuard,
    method: &str,
    path: &str,
    status: usize,
) -> Mock {
    server
        .mock(method, path)
        .with_status(status)
        .with_body(r#"{"error":"request failed"}"#)
        .create_async()
        .await
}
