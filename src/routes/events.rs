use axum::{extract::State, response::Json};

use crate::error::AppError;
use crate::ingest::{self, IngestOutcome, StorageEvent};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/events/storage",
    tag = "Ingest",
    request_body = StorageEvent,
    responses(
        (status = 200, description = "First record processed", body = IngestOutcome),
        (status = 500, description = "Ingestion failed; the caller should redeliver")
    )
)]
pub async fn storage_event(
    State(state): State<AppState>,
    Json(event): Json<StorageEvent>,
) -> Result<Json<IngestOutcome>, AppError> {
    let outcome = ingest::process_event(&state, event).await?;
    println!(
        "Ingest | POST /events/storage | res=200 | {}",
        outcome.message
    );
    Ok(Json(outcome))
}
