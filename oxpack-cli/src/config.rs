//! Configuration module
//!
//! Handles CLI configuration including the build service URL.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the registry build service
    pub service_url: String,
}
