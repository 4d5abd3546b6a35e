pub mod api;
pub mod errors;
pub mod model;

pub use api::{BillingBackend, BillingStateStore, MemoryBillingBackend, UpsertOutcome};
pub use errors::BillingStoreError;
pub use model::{BillingState, BillingSyncEvent};

#[cfg(test)]
mod tests;
