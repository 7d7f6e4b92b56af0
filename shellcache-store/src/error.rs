use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
