//! Azure DevOps provider implementation for azdo-tools.
//!
//! Talks to the Azure DevOps REST API (TFVC, Build, Git, Policy) and maps
//! responses to the unified types in `azdo-core`.

mod client;
mod types;

pub use client::AzureDevOpsClient;

/// Default Azure DevOps Services URL.
pub const DEFAULT_AZURE_DEVOPS_URL: &str = "https://dev.azure.com";
