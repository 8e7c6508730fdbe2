//! Build platform descriptor
//!
//! Parses and validates `os[/arch[/variant]]` platform strings into the
//! fields the build service expects. Missing components fall back to
//! `linux/amd64`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validated target platform for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub os: Os,
    pub architecture: Arch,
    pub variant: Option<Variant>,
}

/// Operating system of the build agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Windows,
}

/// CPU architecture of the build agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Amd64,
    Arm,
    Arm64,
    #[serde(rename = "386")]
    I386,
}

/// Architecture variant, only meaningful for arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    V6,
    V7,
    V8,
}

/// Errors from parsing a platform string
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("unsupported OS '{0}', expected one of: linux, windows")]
    UnknownOs(String),

    #[error("unsupported architecture '{0}', expected one of: amd64, arm, arm64, 386")]
    UnknownArch(String),

    #[error("unsupported variant '{0}', expected one of: v6, v7, v8")]
    UnknownVariant(String),

    #[error("platform '{0}' has too many components, expected os[/arch[/variant]]")]
    TooManyComponents(String),
}

impl Platform {
    /// Parse a platform string of the form `os[/arch[/variant]]`
    ///
    /// `None` or an empty string yields the default platform. Components
    /// are matched case-insensitively.
    pub fn parse(spec: Option<&str>) -> Result<Self, PlatformError> {
        let Some(spec) = spec.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self::default());
        };

        let parts: Vec<&str> = spec.split('/').collect();
        if parts.len() > 3 {
            return Err(PlatformError::TooManyComponents(spec.to_string()));
        }

        let os = Os::parse(parts[0])?;
        let architecture = match parts.get(1) {
            Some(raw) => Arch::parse(raw)?,
            None => Arch::Amd64,
        };
        let variant = parts.get(2).map(|raw| Variant::parse(raw)).transpose()?;

        Ok(Self {
            os,
            architecture,
            variant,
        })
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            os: Os::Linux,
            architecture: Arch::Amd64,
            variant: None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.os, self.architecture)?;
        if let Some(variant) = self.variant {
            write!(f, "/{}", variant)?;
        }
        Ok(())
    }
}

impl Os {
    fn parse(raw: &str) -> Result<Self, PlatformError> {
        match raw.to_lowercase().as_str() {
            "linux" => Ok(Os::Linux),
            "windows" => Ok(Os::Windows),
            _ => Err(PlatformError::UnknownOs(raw.to_string())),
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Os::Linux => write!(f, "linux"),
            Os::Windows => write!(f, "windows"),
        }
    }
}

impl Arch {
    fn parse(raw: &str) -> Result<Self, PlatformError> {
        match raw.to_lowercase().as_str() {
            "amd64" => Ok(Arch::Amd64),
            "arm" => Ok(Arch::Arm),
            "arm64" => Ok(Arch::Arm64),
            "386" => Ok(Arch::I386),
            _ => Err(PlatformError::UnknownArch(raw.to_string())),
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arch::Amd64 => write!(f, "amd64"),
            Arch::Arm => write!(f, "arm"),
            Arch::Arm64 => write!(f, "arm64"),
            Arch::I386 => write!(f, "386"),
        }
    }
}

impl Variant {
    fn parse(raw: &str) -> Result<Self, PlatformError> {
        match raw.to_lowercase().as_str() {
            "v6" => Ok(Variant::V6),
            "v7" => Ok(Variant::V7),
            "v8" => Ok(Variant::V8),
            _ => Err(PlatformError::UnknownVariant(raw.to_string())),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::V6 => write!(f, "v6"),
            Variant::V7 => write!(f, "v7"),
            Variant::V8 => write!(f, "v8"),
        }
    }
}
