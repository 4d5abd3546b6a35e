use thiserror::Error;

#[derive(Debug, Error)]
pub enum BillingStoreError {
    #[error("billing backend error: {0}")]
    Backend(String),
    #[error("billing backend timed out after {0}ms")]
    Timeout(u64),
}
