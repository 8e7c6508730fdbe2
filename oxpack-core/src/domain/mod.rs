//! Core domain types
//!
//! This module contains the domain structures shared by the client and the
//! CLI. They represent the build service's entities as seen from the
//! submitting side: registries, runs, and build platforms.

pub mod platform;
pub mod registry;
pub mod run;
