use serde::{Deserialize, Serialize};

use crate::util::Result;

/// How a registry combines two or more sources during `update()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Fold sources into an accumulator with two-pointer merges.
    #[default]
    Pairwise,
    /// One k-way pass over all sources with a min-heap.
    Heap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryOptions {
    pub merge_strategy: MergeStrategy,
    /// Round interpolated and extrapolated keys (half toward +inf). Suits
    /// integral key domains such as millisecond timestamps.
    pub round_interpolated_keys: bool,
    /// Check every source snapshot is finite and strictly ascending before
    /// merging. Costs one extra linear pass per source per rebuild.
    pub verify_sources: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        RegistryOptions {
            merge_strategy: MergeStrategy::Pairwise,
            round_interpolated_keys: true,
            verify_sources: false,
        }
    }
}

impl RegistryOptions {
    /// Parse options from JSON. Missing fields take their default.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
