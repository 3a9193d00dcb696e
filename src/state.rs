use std::sync::Arc;

use crate::services::store::{MetadataTable, ObjectStore};

/// Shared handler state. Clients are constructed once at startup and
/// injected here so tests can swap in in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub objects: Arc<dyn ObjectStore>,
    pub table: Arc<dyn MetadataTable>,
}

impl AppState {
    pub fn new(objects: Arc<dyn ObjectStore>, table: Arc<dyn MetadataTable>) -> Self {
        Self { objects, table }
    }
}
