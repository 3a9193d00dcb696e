use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::record::FileRecord;
use crate::state::AppState;
use crate::utils::parse_iso_datetime;

/// Hard cap on a single scan; rows beyond it are silently omitted.
const SCAN_LIMIT: i32 = 100;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ListFilesQuery {
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: String,
    pub pk: String,
    pub hash: String,
    pub bucket: String,
    pub key: String,
    pub size: i64,
    pub etag: String,
    pub status: String,
    pub content_type: String,
    pub processed_at: String,
    pub checksum: String,
}

impl From<FileRecord> for FileSummary {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.pk.clone(),
            hash: record.checksum.clone(),
            pk: record.pk,
            bucket: record.bucket,
            key: record.key,
            size: record.size,
            etag: record.etag,
            status: record.status.as_str().to_string(),
            content_type: record.content_type,
            processed_at: record.processed_at,
            checksum: record.checksum,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ListFilesResponse {
    pub files: Vec<FileSummary>,
    pub count: usize,
}

/// Keep a record iff it matches the status filter and its timestamp falls
/// within the supplied bounds. Unparseable bounds are ignored (unbounded)
/// and an unparseable row timestamp counts as "now", both permissive.
fn matches_filters(record: &FileRecord, query: &ListFilesQuery) -> bool {
    if let Some(status) = &query.status {
        if record.status.as_str() != status {
            return false;
        }
    }

    let processed_at = parse_iso_datetime(&record.processed_at).unwrap_or_else(Utc::now);

    if let Some(from) = query.from.as_deref().and_then(parse_iso_datetime) {
        if processed_at < from {
            return false;
        }
    }
    if let Some(to) = query.to.as_deref().and_then(parse_iso_datetime) {
        if processed_at > to {
            return false;
        }
    }

    true
}

#[utoipa::path(
    get,
    path = "/files",
    tag = "Files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Matching metadata records", body = ListFilesResponse),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<ListFilesResponse>, AppError> {
    let records = state.table.scan_records(SCAN_LIMIT).await?;

    let files: Vec<FileSummary> = records
        .into_iter()
        .filter(|record| matches_filters(record, &query))
        .map(FileSummary::from)
        .collect();

    println!("List | GET /files | count={} | res=200", files.len());
    Ok(Json(ListFilesResponse {
        count: files.len(),
        files,
    }))
}

#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "Files",
    params(("id" = String, Path, description = "Content checksum of the file")),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 400, description = "Missing file ID"),
        (status = 404, description = "File not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    if id.trim().is_empty() {
        return Err(AppError::BadRequest("Missing file ID".to_string()));
    }

    let record = state
        .table
        .get_record(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    // A storage miss here is a distinct 404 from the metadata miss above.
    let object = state.objects.get_object(&record.bucket, &record.key).await?;

    println!(
        "Get | GET /files/{} | key={} | res=200",
        record.pk, record.key
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, record.content_type)
        .header(header::CACHE_CONTROL, "public, max-age=31536000")
        .body(Body::from(object.data))
        .map_err(|_| AppError::InternalServerError("Failed to build response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::FileStatus;

    fn record(status: FileStatus, processed_at: &str) -> FileRecord {
        FileRecord {
            pk: "pk".to_string(),
            file: "key".to_string(),
            bucket: "bucket".to_string(),
            key: "key".to_string(),
            size: 1,
            etag: String::new(),
            checksum: "pk".to_string(),
            content_type: "application/octet-stream".to_string(),
            status,
            processed_at: processed_at.to_string(),
            error: None,
        }
    }

    fn query(status: Option<&str>, from: Option<&str>, to: Option<&str>) -> ListFilesQuery {
        ListFilesQuery {
            status: status.map(str::to_string),
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    #[test]
    fn status_filter_is_exact() {
        let raw = record(FileStatus::Raw, "2024-01-02T00:00:00Z");
        assert!(matches_filters(&raw, &query(Some("RAW"), None, None)));
        assert!(!matches_filters(&raw, &query(Some("PROCESSED"), None, None)));
    }

    #[test]
    fn date_range_is_inclusive_of_bounds() {
        let r = record(FileStatus::Processed, "2024-01-02T00:00:00Z");
        let q = query(None, Some("2024-01-01"), Some("2024-01-03"));
        assert!(matches_filters(&r, &q));

        let before = record(FileStatus::Processed, "2023-12-31T23:59:59Z");
        assert!(!matches_filters(&before, &q));

        let after = record(FileStatus::Processed, "2024-01-03T00:00:01Z");
        assert!(!matches_filters(&after, &q));
    }

    #[test]
    fn unparseable_bounds_are_ignored() {
        let r = record(FileStatus::Processed, "2024-01-02T00:00:00Z");
        assert!(matches_filters(
            &r,
            &query(None, Some("garbage"), Some("also-garbage"))
        ));
    }

    #[test]
    fn unparseable_row_timestamp_counts_as_now() {
        // "now" is after any past from-bound, so the row stays visible.
        let r = record(FileStatus::Processed, "not-a-timestamp");
        assert!(matches_filters(&r, &query(None, Some("2024-01-01"), None)));
        // ...and excluded by any past to-bound.
        assert!(!matches_filters(&r, &query(None, None, Some("2024-01-01"))));
    }
}
