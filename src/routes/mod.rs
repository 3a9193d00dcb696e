pub mod events;
pub mod files;
pub mod home;
pub mod upload;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

// Define the OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        home::root,
        upload::upload_file,
        files::list_files,
        files::get_file,
        events::storage_event,
    ),
    components(
        schemas(
            home::RootResponse,
            upload::UploadResponse,
            files::FileSummary,
            files::ListFilesResponse,
            crate::ingest::StorageEvent,
            crate::ingest::StorageEventRecord,
            crate::ingest::S3EventEntity,
            crate::ingest::BucketEntity,
            crate::ingest::ObjectEntity,
            crate::ingest::IngestOutcome,
            crate::models::record::FileStatus,
        )
    ),
    tags(
        (name = "General", description = "Service info"),
        (name = "Files", description = "Upload, listing, and retrieval of content-addressed files"),
        (name = "Ingest", description = "Storage-event driven raw-to-processed ingestion")
    ),
    info(
        title = "File Ingestor API",
        version = "0.1.0",
        description = "Content-addressed file ingestion: checksum-based dedup, raw-to-processed lifecycle, and metadata bookkeeping",
    )
)]
struct ApiDoc;

pub fn create_routes(state: AppState) -> Router {
    // Swagger UI (stateless)
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    // Every response carries Access-Control-Allow-Origin: *
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app_routes = Router::new()
        .route("/", get(home::root))
        .route("/files", post(upload::upload_file))
        .route("/files", get(files::list_files))
        .route("/files/{id}", get(files::get_file))
        .route("/events/storage", post(events::storage_event))
        .with_state(state);

    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .layer(cors)
}
