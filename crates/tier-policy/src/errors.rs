use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid policy table: {0}")]
    Invalid(String),
}
