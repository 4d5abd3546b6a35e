use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditStoreError {
    #[error("audit store unavailable: {0}")]
    Unavailable(String),
    #[error("audit io error: {0}")]
    Io(String),
}
