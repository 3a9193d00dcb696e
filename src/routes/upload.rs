use axum::{body::Bytes, extract::State, http::header, http::HeaderMap, response::Json};
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use serde::Serialize;

use crate::config::get_config;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::sha256_hex;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub id: String,
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/files",
    tag = "Files",
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "File uploaded or already known", body = UploadResponse),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadResponse>, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let is_base64 = headers
        .get("content-transfer-encoding")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("base64"))
        .unwrap_or(false);

    let data = if is_base64 {
        general_purpose::STANDARD
            .decode(body.as_ref())
            .map_err(|_| AppError::BadRequest("Invalid base64 payload".to_string()))?
    } else {
        body.to_vec()
    };

    let checksum = sha256_hex(&data);

    // Best-effort dedup: a lookup failure is logged and the upload proceeds.
    match state.table.get_record(&checksum).await {
        Ok(Some(_)) => {
            println!("Upload | POST /files | hash={} | res=200 exists", checksum);
            return Ok(Json(UploadResponse {
                id: checksum.clone(),
                hash: checksum,
                status: None,
                message: "File already exists".to_string(),
            }));
        }
        Ok(None) => {}
        Err(e) => eprintln!("Upload | error checking existing file: {}", e),
    }

    // Time-stamped key, so identical bytes uploaded twice concurrently land
    // at distinct raw keys; dedup only holds at the metadata level.
    let timestamp = Utc::now().format("%Y%m%d%H%M%S%6f");
    let file_key = format!("raw/{}-{}", timestamp, checksum);
    let raw_bucket = &get_config().raw_bucket;

    state
        .objects
        .put_object(raw_bucket, &file_key, data, &content_type)
        .await?;

    println!("Upload | POST /files | hash={} | res=200", checksum);
    Ok(Json(UploadResponse {
        id: checksum.clone(),
        hash: checksum,
        status: Some("uploaded".to_string()),
        message: "File uploaded successfully, processing...".to_string(),
    }))
}
