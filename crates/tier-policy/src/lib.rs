pub mod defaults;
pub mod errors;
pub mod loader;
pub mod model;

pub use defaults::default_table;
pub use errors::PolicyError;
pub use loader::load_table;
pub use model::TierPolicyTable;

#[cfg(test)]
mod tests;
