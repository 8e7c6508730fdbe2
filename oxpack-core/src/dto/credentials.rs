//! Registry credential DTOs

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// How a run authenticates against the registry it pushes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// No credentials are made available to the run
    None,
    /// The service injects its default identity for the registry
    Default,
}

/// Error from parsing an auth mode argument
#[derive(Debug, Error)]
#[error("unknown auth mode '{0}', expected 'none' or 'default'")]
pub struct AuthModeParseError(String);

impl FromStr for AuthMode {
    type Err = AuthModeParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_lowercase().as_str() {
            "none" => Ok(AuthMode::None),
            "default" => Ok(AuthMode::Default),
            _ => Err(AuthModeParseError(raw.to_string())),
        }
    }
}

/// Credential set attached to a scheduled run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunCredentials {
    pub source_registry: SourceRegistryCredentials,
}

/// Credentials the run uses against the source (target) registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRegistryCredentials {
    pub login_mode: AuthMode,
}

impl RunCredentials {
    /// Build the credential set for a requested auth mode
    pub fn for_auth_mode(mode: AuthMode) -> Self {
        Self {
            source_registry: SourceRegistryCredentials { login_mode: mode },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_mode_parsing() {
        assert_eq!("none".parse::<AuthMode>().unwrap(), AuthMode::None);
        assert_eq!("Default".parse::<AuthMode>().unwrap(), AuthMode::Default);
        assert!("token".parse::<AuthMode>().is_err());
    }

    #[test]
    fn test_credentials_carry_the_requested_mode() {
        let creds = RunCredentials::for_auth_mode(AuthMode::None);
        assert_eq!(creds.source_registry.login_mode, AuthMode::None);
    }
}
