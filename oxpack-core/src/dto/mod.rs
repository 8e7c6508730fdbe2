//! Wire objects for the registry build service API
//!
//! These DTOs are what actually crosses the network between the client and
//! the build service. They are deliberately thin; validation happens
//! before they are constructed.

pub mod credentials;
pub mod run;
pub mod source;
