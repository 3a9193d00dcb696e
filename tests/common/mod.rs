//! In-memory implementations of the storage seams, so handler and pipeline
//! behavior can be exercised without S3 or DynamoDB.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use file_ingestor::error::AppError;
use file_ingestor::models::record::FileRecord;
use file_ingestor::services::store::{MetadataTable, ObjectInfo, ObjectStore, StoredObject};
use file_ingestor::state::AppState;

/// Mock object store: bucket -> key -> (data, content_type).
#[derive(Default)]
pub struct MockObjectStore {
    objects: Mutex<HashMap<(String, String), (Vec<u8>, String)>>,
    pub put_calls: AtomicUsize,
    pub fail_puts: AtomicBool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, data: &[u8], content_type: &str) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (data.to_vec(), content_type.to_string()),
        );
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn keys_in(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, AppError> {
        let objects = self.objects.lock().unwrap();
        let (data, content_type) = objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| AppError::NotFound("File not found in storage".to_string()))?;

        Ok(StoredObject {
            data: data.clone(),
            content_type: Some(content_type.clone()),
            etag: Some(format!("etag-{}", data.len())),
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AppError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(AppError::InternalServerError(
                "injected storage put failure".to_string(),
            ));
        }
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.insert(bucket, key, &data, content_type);
        Ok(())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo, AppError> {
        let objects = self.objects.lock().unwrap();
        let (data, _) = objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| AppError::NotFound("File not found in storage".to_string()))?;

        Ok(ObjectInfo {
            size: data.len() as i64,
            etag: Some(format!("etag-{}", data.len())),
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), AppError> {
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

/// Mock metadata table keyed by pk, with last-writer-wins overwrites.
#[derive(Default)]
pub struct MockMetadataTable {
    records: Mutex<HashMap<String, FileRecord>>,
    pub fail_gets: AtomicBool,
    pub fail_puts: AtomicBool,
}

impl MockMetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: FileRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.pk.clone(), record);
    }

    pub fn get(&self, pk: &str) -> Option<FileRecord> {
        self.records.lock().unwrap().get(pk).cloned()
    }

    pub fn all(&self) -> Vec<FileRecord> {
        self.records.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl MetadataTable for MockMetadataTable {
    async fn get_record(&self, pk: &str) -> Result<Option<FileRecord>, AppError> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(AppError::InternalServerError(
                "injected table get failure".to_string(),
            ));
        }
        Ok(self.get(pk))
    }

    async fn put_record(&self, record: &FileRecord) -> Result<(), AppError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(AppError::InternalServerError(
                "injected table put failure".to_string(),
            ));
        }
        self.insert(record.clone());
        Ok(())
    }

    async fn scan_records(&self, limit: i32) -> Result<Vec<FileRecord>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records.values().take(limit as usize).cloned().collect())
    }
}

pub struct TestEnv {
    pub objects: Arc<MockObjectStore>,
    pub table: Arc<MockMetadataTable>,
    pub state: AppState,
}

pub fn test_env() -> TestEnv {
    let objects = Arc::new(MockObjectStore::new());
    let table = Arc::new(MockMetadataTable::new());
    let state = AppState::new(objects.clone(), table.clone());
    TestEnv {
        objects,
        table,
        state,
    }
}
