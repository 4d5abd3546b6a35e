use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use parcelbase_core_types::Tier;

use crate::defaults::default_table;
use crate::errors::PolicyError;
use crate::model::TierPolicyTable;

/// On-disk table layout: a revision plus feature-key overrides.
#[derive(Debug, Deserialize)]
struct TierPolicyFile {
    rev: Option<u64>,
    #[serde(default)]
    features: HashMap<String, Tier>,
}

/// Loads the policy table: built-in defaults overlaid with an optional
/// YAML file. Called once at process start; the result is immutable.
pub fn load_table(path: Option<&Path>) -> Result<TierPolicyTable, PolicyError> {
    let mut table = default_table();
    let Some(path) = path else {
        return Ok(table);
    };
    if !path.exists() {
        debug!(path = %path.display(), "policy table file absent; using builtin table");
        return Ok(table);
    }

    let content = fs::read_to_string(path).map_err(|err| PolicyError::Io(err.to_string()))?;
    let file: TierPolicyFile =
        serde_yaml::from_str(&content).map_err(|err| PolicyError::Invalid(err.to_string()))?;

    if let Some(rev) = file.rev {
        if rev <= table.rev() {
            return Err(PolicyError::Invalid(format!(
                "file rev {rev} does not supersede builtin rev {}",
                table.rev()
            )));
        }
        table.set_rev(rev);
    }
    for (feature, tier) in file.features {
        if feature.trim().is_empty() {
            return Err(PolicyError::Invalid("empty feature key".into()));
        }
        table.merge_entry(feature, tier);
    }
    Ok(table)
}
