//! `azdo-tools serve`: run the MCP server on stdio.

use std::sync::Arc;

use anyhow::Context;
use azdo_azure::AzureDevOpsClient;
use azdo_core::Config;
use azdo_mcp::{McpServer, ToolHandler, ToolRegistry};
use azdo_storage::{resolve_token, KeychainStore};
use tracing::info;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::resolve().context("Failed to load configuration")?;
    let devops = config.validate()?;

    let store = KeychainStore::new();
    let token = resolve_token(&store, |name| std::env::var(name).ok())?;
    info!(
        organization = %devops.organization,
        project = %devops.project,
        base_url = devops.base_url(),
        token_source = %token.source,
        "Connecting to Azure DevOps"
    );

    let client = AzureDevOpsClient::from_config(devops, token.value)?;
    let registry = Arc::new(ToolRegistry::builtin());
    let handler =
        ToolHandler::new(Arc::new(client), registry).with_output_config(config.output.clone());

    let mut server = McpServer::new(handler);
    server.run().await?;
    Ok(())
}
