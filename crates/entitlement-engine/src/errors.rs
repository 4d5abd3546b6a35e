use thiserror::Error;

/// The only error class `check` surfaces: a broken integration, never a
/// runtime condition. Expired trials, insufficient tiers, and unreachable
/// backends all come back as well-formed denied results instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("tenant id must not be empty")]
    EmptyTenantId,
}
