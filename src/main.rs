use std::sync::Arc;

use file_ingestor::config::get_config;
use file_ingestor::routes::create_routes;
use file_ingestor::services::dynamo::DynamoTable;
use file_ingestor::services::s3::S3Store;
use file_ingestor::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = get_config();
    println!("Starting file-ingestor...");

    let objects = Arc::new(S3Store::new().await);
    let table = Arc::new(DynamoTable::new().await);
    let state = AppState::new(objects, table);

    let app = create_routes(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");
    println!("Listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
