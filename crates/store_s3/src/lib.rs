use async_trait::async_trait;
use aws_sdk_s3::operation::get_object::{GetObjectError, GetObjectOutput};
use aws_sdk_s3::operation::head_object::HeadObjectError;
use store::StoreErrorReason::{BackendFailure, NotFound};
use store::StoreOperation::{GetObject, HeadObject};
use store::{ObjectStore, StoreError};
use std::sync::Arc;

pub struct S3ObjectStore {
    s3_client: Arc<aws_sdk_s3::Client>,
}

impl S3ObjectStore {
    pub fn new(s3_client: Arc<aws_sdk_s3::Client>) -> Self {
        S3ObjectStore { s3_client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let output: GetObjectOutput = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err.into_service_error() {
                GetObjectError::NoSuchKey(_) => StoreError::new(bucket, key, GetObject, NotFound),
                other => StoreError::new(bucket, key, GetObject, BackendFailure(other.into())),
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|err| StoreError::new(bucket, key, GetObject, BackendFailure(err.into())))?;

        Ok(body.to_vec())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.s3_client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err.into_service_error() {
                HeadObjectError::NotFound(_) => StoreError::new(bucket, key, HeadObject, NotFound),
                other => StoreError::new(bucket, key, HeadObject, BackendFailure(other.into())),
            })?;

        Ok(())
    }
}
