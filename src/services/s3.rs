use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::config::get_config;
use crate::error::AppError;
use crate::services::store::{ObjectInfo, ObjectStore, StoredObject};

/// S3-backed object store. Buckets are passed per call because the workflow
/// spans a raw and a processed bucket.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub async fn new() -> Self {
        let config = get_config();

        let credentials = aws_sdk_s3::config::Credentials::new(
            config.aws_access_key_id.clone(),
            config.aws_secret_access_key.clone(),
            None,
            None,
            "manual_config",
        );

        let region = aws_sdk_s3::config::Region::new(config.aws_region.clone());

        let mut s3_config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.aws_endpoint_url {
            // Path-style addressing is required for LocalStack/MinIO.
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }

        Self {
            client: Client::from_conf(s3_config_builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, AppError> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    AppError::NotFound("File not found in storage".to_string())
                } else {
                    eprintln!("S3 Download Error: {:?}", service_err);
                    AppError::InternalServerError(format!(
                        "Failed to download s3://{}/{}: {}",
                        bucket, key, service_err
                    ))
                }
            })?;

        let content_type = resp.content_type().map(|s| s.to_string());
        let etag = resp.e_tag().map(|s| s.trim_matches('"').to_string());

        let data = resp.body.collect().await.map_err(|e| {
            eprintln!("S3 Body Error: {:?}", e);
            AppError::InternalServerError("Failed to read S3 body".to_string())
        })?;

        Ok(StoredObject {
            data: data.into_bytes().to_vec(),
            content_type,
            etag,
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                eprintln!("S3 Upload Error: {:?}", e);
                AppError::InternalServerError(format!(
                    "Failed to upload s3://{}/{}: {}",
                    bucket,
                    key,
                    e.into_service_error()
                ))
            })?;

        Ok(())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo, AppError> {
        let resp = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    AppError::NotFound("File not found in storage".to_string())
                } else {
                    eprintln!("S3 Head Error: {:?}", service_err);
                    AppError::InternalServerError(format!(
                        "Failed to stat s3://{}/{}: {}",
                        bucket, key, service_err
                    ))
                }
            })?;

        Ok(ObjectInfo {
            size: resp.content_length().unwrap_or(0),
            etag: resp.e_tag().map(|s| s.trim_matches('"').to_string()),
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                eprintln!("S3 Delete Error: {}", e);
                AppError::InternalServerError(format!(
                    "Failed to delete s3://{}/{}",
                    bucket, key
                ))
            })?;

        Ok(())
    }
}
