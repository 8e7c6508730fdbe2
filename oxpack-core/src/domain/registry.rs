//! Registry domain types

use serde::{Deserialize, Serialize};

/// A container registry known to the build service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    pub name: String,
    pub resource_group: String,
    pub login_server: String,
    pub tier: RegistryTier,
}

/// Service tier of a registry
///
/// Only managed registries can execute task runs on the service side;
/// lower tiers are plain image stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryTier {
    Basic,
    Standard,
    Managed,
}

impl RegistryTier {
    /// Whether this tier can execute task runs server-side
    pub fn supports_task_runs(&self) -> bool {
        matches!(self, RegistryTier::Managed)
    }
}

impl std::fmt::Display for RegistryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryTier::Basic => write!(f, "basic"),
            RegistryTier::Standard => write!(f, "standard"),
            RegistryTier::Managed => write!(f, "managed"),
        }
    }
}
