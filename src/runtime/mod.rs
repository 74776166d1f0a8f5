//! Model runtime integration
//!
//! Capability probing, API client, and the provisioner that turns a model
//! identifier into a workspace artifact.

pub mod client;
pub mod platform;
pub mod provisioner;

pub use client::{ModelInfo, OllamaClient, PullProgress};
pub use platform::{HostPlatform, RuntimePlatform};
pub use provisioner::{ModelProvisioner, ProvisionOutcome};
