use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};

/// Lifecycle stage of a stored file. The raw copy is the as-uploaded object;
/// the processed copy is the relocated, canonical one the record points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum FileStatus {
    #[serde(rename = "RAW")]
    Raw,
    #[serde(rename = "PROCESSED")]
    Processed,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Raw => "RAW",
            FileStatus::Processed => "PROCESSED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "RAW" => Some(FileStatus::Raw),
            "PROCESSED" => Some(FileStatus::Processed),
            _ => None,
        }
    }
}

/// One metadata row per storage location, keyed by content checksum (or a
/// synthetic `error-<key>-<timestamp>` pk for failed ingests). A file that
/// makes it through ingestion writes two records under the same pk; the
/// PROCESSED write supersedes the RAW one.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub pk: String,
    pub file: String,
    pub bucket: String,
    pub key: String,
    pub size: i64,
    pub etag: String,
    pub checksum: String,
    pub content_type: String,
    pub status: FileStatus,
    /// ISO-8601 UTC string of the last write. Kept as the wire string so
    /// listings echo exactly what was stored.
    pub processed_at: String,
    pub error: Option<String>,
}

impl FileRecord {
    /// Flatten to the table's native attribute map. The `error` attribute is
    /// only present on error records.
    pub fn to_item(&self) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::from([
            ("pk".to_string(), AttributeValue::S(self.pk.clone())),
            ("file".to_string(), AttributeValue::S(self.file.clone())),
            ("bucket".to_string(), AttributeValue::S(self.bucket.clone())),
            ("key".to_string(), AttributeValue::S(self.key.clone())),
            ("size".to_string(), AttributeValue::N(self.size.to_string())),
            ("etag".to_string(), AttributeValue::S(self.etag.clone())),
            (
                "checksum".to_string(),
                AttributeValue::S(self.checksum.clone()),
            ),
            (
                "contentType".to_string(),
                AttributeValue::S(self.content_type.clone()),
            ),
            (
                "status".to_string(),
                AttributeValue::S(self.status.as_str().to_string()),
            ),
            (
                "processedAt".to_string(),
                AttributeValue::S(self.processed_at.clone()),
            ),
        ]);

        if let Some(error) = &self.error {
            item.insert("error".to_string(), AttributeValue::S(error.clone()));
        }

        item
    }

    /// Build a typed record from a raw table item. Returns `None` for rows
    /// missing the pk or carrying an unknown status; callers skip those with
    /// a diagnostic instead of failing the whole operation.
    pub fn from_item(item: &HashMap<String, AttributeValue>) -> Option<Self> {
        let pk = get_s(item, "pk")?;
        let status = FileStatus::parse(&get_s(item, "status").unwrap_or_default())?;

        Some(FileRecord {
            file: get_s(item, "file").unwrap_or_default(),
            bucket: get_s(item, "bucket").unwrap_or_default(),
            key: get_s(item, "key").unwrap_or_default(),
            size: get_n(item, "size").unwrap_or(0),
            etag: get_s(item, "etag").unwrap_or_default(),
            checksum: get_s(item, "checksum").unwrap_or_else(|| pk.clone()),
            content_type: get_s(item, "contentType")
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            status,
            processed_at: get_s(item, "processedAt").unwrap_or_default(),
            error: get_s(item, "error"),
            pk,
        })
    }
}

fn get_s(item: &HashMap<String, AttributeValue>, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).cloned()
}

fn get_n(item: &HashMap<String, AttributeValue>, name: &str) -> Option<i64> {
    item.get(name)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
}
