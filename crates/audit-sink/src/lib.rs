pub mod api;
pub mod errors;
pub mod model;

pub use api::{
    AuditSink, AuditSinkConfig, AuditStore, ChannelAuditSink, MemoryAuditStore, NoopAuditSink,
};
pub use errors::AuditStoreError;
pub use model::{AuditEntry, AuditKind};
