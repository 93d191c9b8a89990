//! Core traits, types, and error handling for azdo-tools.
//!
//! This crate provides the foundational abstractions used across all azdo components.

pub mod config;
pub mod error;
pub mod provider;
pub mod types;

pub use config::{AzureDevOpsConfig, Config, OutputConfig};
pub use error::{Error, Result};
pub use provider::{BuildProvider, ChangesetProvider, GitProvider, Provider, PullRequestProvider};
pub use types::*;
