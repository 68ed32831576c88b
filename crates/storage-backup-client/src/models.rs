//! Wire types of the storage API.

use serde::{Deserialize, Serialize};

/// Number of entries requested per object listing. Only one page is fetched.
pub const LIST_PAGE_LIMIT: u32 = 1000;

/// Bucket as returned by `GET /bucket`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Some deployments send `null` here.
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub file_size_limit: Option<u64>,
    #[serde(default)]
    pub allowed_mime_types: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Entry of `POST /object/list/{bucket}`.
///
/// Folders come back without an `id`; files always carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_accessed_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl ObjectEntry {
    pub fn is_folder(&self) -> bool {
        self.id.is_none()
    }
}

/// Body of `POST /object/list/{bucket}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListObjectsRequest<'a> {
    pub prefix: &'a str,
    pub limit: u32,
    pub offset: u32,
}

impl<'a> ListObjectsRequest<'a> {
    /// First page under `prefix`.
    pub fn first_page(prefix: &'a str) -> Self {
        Self {
            prefix,
            limit: LIST_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// Body of `POST /bucket`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateBucketRequest {
    pub id: String,
    pub name: String,
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mime_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(rename = "Key", default)]
    pub key: Option<String>,
}
