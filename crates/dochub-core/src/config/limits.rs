//! Project size limit configuration.

use serde::{Deserialize, Serialize};

/// Limits applied to every structural mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum number of entities (docs + files + folders) per project.
    /// Exceeding this fails mutations with `ProjectTooLarge` and puts the
    /// project on cooldown.
    #[serde(default = "default_max_entities")]
    pub max_entities_per_project: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_entities_per_project: default_max_entities(),
        }
    }
}

fn default_max_entities() -> usize {
    2000
}
