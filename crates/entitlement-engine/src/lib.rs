pub mod engine;
pub mod errors;
pub mod resolver;
pub mod sync;

pub use engine::{EngineConfig, EntitlementEngine};
pub use errors::EngineError;
pub use resolver::resolve;
pub use sync::{BillingSyncHandler, SyncOutcome};
