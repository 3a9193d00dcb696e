use axum::response::Json;
use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct RootResponse {
    pub service: String,
    pub status: String,
    pub endpoints: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service info", body = RootResponse)
    ),
    tag = "General"
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        service: "file-ingestor".to_string(),
        status: "healthy".to_string(),
        endpoints: vec![
            "POST /files".to_string(),
            "GET /files".to_string(),
            "GET /files/{id}".to_string(),
            "POST /events/storage".to_string(),
        ],
    })
}
