//! The raw-to-processed ingestion pipeline, driven by storage-creation
//! events delivered to `POST /events/storage`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::get_config;
use crate::error::AppError;
use crate::models::record::{FileRecord, FileStatus};
use crate::state::AppState;
use crate::utils::{iso_timestamp, sha256_hex};

/// Storage-event payload: one entry per newly created object.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<StorageEventRecord>,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct StorageEventRecord {
    pub s3: S3EventEntity,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct S3EventEntity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ObjectEntity {
    pub key: String,
    #[serde(default)]
    pub size: i64,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct IngestOutcome {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Process a storage-event batch. Only the first record is handled per
/// invocation and its outcome returned; remaining records are left to the
/// trigger layer's redelivery. On failure an error-tagged record is written
/// best effort and the original error is surfaced so the trigger observes
/// the failure.
pub async fn process_event(
    state: &AppState,
    event: StorageEvent,
) -> Result<IngestOutcome, AppError> {
    let Some(record) = event.records.into_iter().next() else {
        return Ok(IngestOutcome {
            message: "No records to process".to_string(),
            checksum: None,
            key: None,
            status: None,
        });
    };

    let bucket = record.s3.bucket.name;
    let key = record.s3.object.key;
    let size = record.s3.object.size;

    println!("Ingest | bucket={} | key={} | size={}", bucket, key, size);

    match process_record(state, &bucket, &key, size).await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            record_failure(state, &bucket, &key, size, &e).await;
            Err(e)
        }
    }
}

async fn process_record(
    state: &AppState,
    bucket: &str,
    key: &str,
    size: i64,
) -> Result<IngestOutcome, AppError> {
    let object = state.objects.get_object(bucket, key).await?;
    let content_type = object
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let etag = object.etag.unwrap_or_default();

    // The checksum is re-derived from the fetched bytes rather than trusted
    // from whatever the uploader claimed.
    let checksum = sha256_hex(&object.data);

    let raw_record = FileRecord {
        pk: checksum.clone(),
        file: key.to_string(),
        bucket: bucket.to_string(),
        key: key.to_string(),
        size,
        etag,
        checksum: checksum.clone(),
        content_type: content_type.clone(),
        status: FileStatus::Raw,
        processed_at: iso_timestamp(Utc::now()),
        error: None,
    };
    state.table.put_record(&raw_record).await?;

    let dest_bucket = get_config().processed_bucket.clone();
    let dest_key = format!("processed/{}", checksum);

    state
        .objects
        .put_object(&dest_bucket, &dest_key, object.data, &content_type)
        .await?;

    let processed_info = state.objects.head_object(&dest_bucket, &dest_key).await?;

    // Same pk as the RAW row, so this write supersedes it.
    let processed_record = FileRecord {
        pk: checksum.clone(),
        file: dest_key.clone(),
        bucket: dest_bucket,
        key: dest_key.clone(),
        size,
        etag: processed_info.etag.unwrap_or_default(),
        checksum: checksum.clone(),
        content_type,
        status: FileStatus::Processed,
        processed_at: iso_timestamp(Utc::now()),
        error: None,
    };
    state.table.put_record(&processed_record).await?;

    // The raw object is deleted only once the processed copy is confirmed.
    state.objects.delete_object(bucket, key).await?;

    println!(
        "Ingest | checksum={} | key={} | res=PROCESSED",
        checksum, dest_key
    );

    Ok(IngestOutcome {
        message: "File processed successfully".to_string(),
        checksum: Some(checksum),
        key: Some(dest_key),
        status: Some("PROCESSED".to_string()),
    })
}

/// Best-effort error bookkeeping under a synthetic pk. A failure here is
/// logged and swallowed so it never masks the original error.
async fn record_failure(state: &AppState, bucket: &str, key: &str, size: i64, error: &AppError) {
    let error_time = iso_timestamp(Utc::now());

    let error_record = FileRecord {
        pk: format!("error-{}-{}", key, error_time),
        file: key.to_string(),
        bucket: bucket.to_string(),
        key: key.to_string(),
        size,
        etag: String::new(),
        checksum: String::new(),
        content_type: "application/octet-stream".to_string(),
        status: FileStatus::Raw,
        processed_at: error_time,
        error: Some(error.message().to_string()),
    };

    if let Err(db_error) = state.table.put_record(&error_record).await {
        eprintln!("Ingest | failed to store error record: {}", db_error);
    }
}
