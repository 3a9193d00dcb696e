use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::config::get_config;
use crate::error::AppError;
use crate::models::record::FileRecord;
use crate::services::store::MetadataTable;

/// DynamoDB-backed metadata table. Item maps are converted to and from
/// `FileRecord` here; nothing outside this module touches `AttributeValue`.
#[derive(Clone)]
pub struct DynamoTable {
    client: Client,
    table_name: String,
}

impl DynamoTable {
    pub async fn new() -> Self {
        let config = get_config();

        let credentials = aws_sdk_dynamodb::config::Credentials::new(
            config.aws_access_key_id.clone(),
            config.aws_secret_access_key.clone(),
            None,
            None,
            "manual_config",
        );

        let region = aws_sdk_dynamodb::config::Region::new(config.aws_region.clone());

        let mut db_config_builder = aws_sdk_dynamodb::config::Builder::new()
            .behavior_version(aws_sdk_dynamodb::config::BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.aws_endpoint_url {
            db_config_builder = db_config_builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(db_config_builder.build()),
            table_name: config.table_name.clone(),
        }
    }
}

#[async_trait]
impl MetadataTable for DynamoTable {
    async fn get_record(&self, pk: &str) -> Result<Option<FileRecord>, AppError> {
        let resp = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("pk", AttributeValue::S(pk.to_string()))
            .send()
            .await
            .map_err(|e| {
                eprintln!("DynamoDB Get Error: {:?}", e);
                AppError::InternalServerError(format!(
                    "Failed to read metadata for {}: {}",
                    pk,
                    e.into_service_error()
                ))
            })?;

        Ok(resp.item.as_ref().and_then(FileRecord::from_item))
    }

    async fn put_record(&self, record: &FileRecord) -> Result<(), AppError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record.to_item()))
            .send()
            .await
            .map_err(|e| {
                eprintln!("DynamoDB Put Error: {:?}", e);
                AppError::InternalServerError(format!(
                    "Failed to write metadata for {}: {}",
                    record.pk,
                    e.into_service_error()
                ))
            })?;

        Ok(())
    }

    async fn scan_records(&self, limit: i32) -> Result<Vec<FileRecord>, AppError> {
        let resp = self
            .client
            .scan()
            .table_name(&self.table_name)
            .limit(limit)
            .send()
            .await
            .map_err(|e| {
                eprintln!("DynamoDB Scan Error: {:?}", e);
                AppError::InternalServerError(format!(
                    "Failed to scan metadata table: {}",
                    e.into_service_error()
                ))
            })?;

        let records = resp
            .items
            .unwrap_or_default()
            .iter()
            .filter_map(|item| {
                let record = FileRecord::from_item(item);
                if record.is_none() {
                    eprintln!("List | skipping malformed metadata row");
                }
                record
            })
            .collect();

        Ok(records)
    }
}
