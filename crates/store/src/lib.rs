use async_trait::async_trait;
use model::Error;
use std::fmt::{Debug, Display, Formatter};

/// Read access to the bucket holding uploaded videos and metadata files.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Download the whole object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Check the object exists without reading it.
    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), StoreError>;
}

/// Errors arising from reading the object store.
#[derive(Debug)]
pub struct StoreError {
    pub bucket: String,
    pub key: String,

    pub operation: StoreOperation,
    pub reason: StoreErrorReason,
}

#[derive(Debug)]
pub enum StoreErrorReason {
    // No object under the key
    NotFound,
    // An error from the underlying store
    BackendFailure(Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    GetObject,
    HeadObject,
}

impl StoreError {
    pub fn new(bucket: &str, key: &str, operation: StoreOperation, reason: StoreErrorReason) -> Self {
        StoreError {
            bucket: bucket.to_string(),
            key: key.to_string(),
            operation,
            reason,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.reason, StoreErrorReason::NotFound)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            StoreErrorReason::NotFound => write!(
                f,
                "{:?} failed, s3://{}/{} was not found",
                self.operation, self.bucket, self.key
            ),
            StoreErrorReason::BackendFailure(err) => write!(
                f,
                "{:?} failed for s3://{}/{}: {}",
                self.operation, self.bucket, self.key, err
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.reason {
            StoreErrorReason::NotFound => None,
            StoreErrorReason::BackendFailure(err) => Some(err.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_object() {
        let err: StoreError = StoreError::new(
            "source",
            "videos/a.mp4",
            StoreOperation::HeadObject,
            StoreErrorReason::NotFound,
        );

        assert!(err.is_not_found());
        assert_eq!(
            "HeadObject failed, s3://source/videos/a.mp4 was not found",
            err.to_string()
        );
    }

    #[test]
    fn backend_failure_keeps_source() {
        let err: StoreError = StoreError::new(
            "source",
            "a.json",
            StoreOperation::GetObject,
            StoreErrorReason::BackendFailure("access denied".into()),
        );

        assert!(!err.is_not_found());
        assert_eq!(
            "access denied",
            std::error::Error::source(&err).unwrap().to_string()
        );
    }
}
