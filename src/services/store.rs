//! Storage seams for the ingestion workflow.
//!
//! Handlers only ever see these traits; the AWS-backed implementations live
//! in `s3.rs` and `dynamo.rs`, and tests substitute in-memory mocks.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::record::FileRecord;

/// An object fetched from storage.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    pub etag: Option<String>,
}

/// Metadata from a HEAD request.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub size: i64,
    pub etag: Option<String>,
}

/// Object storage by bucket + key. A missing object must surface as
/// `AppError::NotFound` so callers can tell it apart from other failures.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, AppError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AppError>;

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo, AppError>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), AppError>;
}

/// Key-value metadata table keyed by `pk`. Writes overwrite whole rows
/// (last writer wins); there is no delete operation in this workflow.
#[async_trait]
pub trait MetadataTable: Send + Sync {
    async fn get_record(&self, pk: &str) -> Result<Option<FileRecord>, AppError>;

    async fn put_record(&self, record: &FileRecord) -> Result<(), AppError>;

    /// Bounded scan; rows beyond `limit` are not returned. All filtering
    /// beyond primary-key lookup happens in the handlers.
    async fn scan_records(&self, limit: i32) -> Result<Vec<FileRecord>, AppError>;
}
