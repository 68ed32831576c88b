//! Storage domain methods for the API client.

use crate::models::{Bucket, CreateBucketRequest, ListObjectsRequest, ObjectEntry, UploadResponse};
use crate::{ApiClient, ApiResult};
use bytes::Bytes;
use serde::de::IgnoredAny;

/// Percent-encode each `/`-separated segment of an object path.
pub fn encode_object_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn object_url(bucket: &str, path: &str) -> String {
    format!(
        "/object/{}/{}",
        urlencoding::encode(bucket),
        encode_object_path(path)
    )
}

impl ApiClient {
    /// List every bucket of the project.
    pub async fn list_buckets(&self) -> ApiResult<Vec<Bucket>> {
        self.get("/bucket").await
    }

    /// List the direct children of `prefix` in `bucket` (first page only).
    pub async fn list_objects(&self, bucket: &str, prefix: &str) -> ApiResult<Vec<ObjectEntry>> {
        let path = format!("/object/list/{}", urlencoding::encode(bucket));
        self.post_json(&path, &ListObjectsRequest::first_page(prefix))
            .await
    }

    /// Download the bytes of one object.
    pub async fn fetch_object(&self, bucket: &str, path: &str) -> ApiResult<Bytes> {
        self.get_bytes(&object_url(bucket, path)).await
    }

    /// Create a bucket.
    pub async fn create_bucket(&self, request: &CreateBucketRequest) -> ApiResult<()> {
        let _: IgnoredAny = self.post_json("/bucket", request).await?;
        Ok(())
    }

    /// Upload an object, replacing an existing one when `upsert` is set.
    /// Returns the storage key reported by the server.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> ApiResult<String> {
        let upsert = if upsert { "true" } else { "false" };
        let response: UploadResponse = self
            .post_bytes(
                &object_url(bucket, path),
                data,
                content_type,
                &[("x-upsert", upsert)],
            )
            .await?;

        Ok(response
            .key
            .unwrap_or_else(|| format!("{}/{}", bucket, path)))
    }
}
