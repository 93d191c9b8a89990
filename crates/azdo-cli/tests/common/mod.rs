//! Shared setup for end-to-end tests.
//!
//! Tests drive a real [`ToolHandler`] backed by [`AzureDevOpsClient`] pointed
//! at an `httpmock` server, so every tool runs through argument parsing, the
//! REST client, response mapping and rendering.

#![allow(dead_code)]

use std::sync::Arc;

use azdo_azure::AzureDevOpsClient;
use azdo_core::OutputConfig;
use azdo_mcp::{ToolCallResult, ToolHandler, ToolRegistry};
use httpmock::MockServer;
use serde_json::Value;

pub const ORG: &str = "contoso";
pub const PROJECT: &str = "Fabrikam";
pub const PAT: &str = "test-pat";

/// `Basic base64(":test-pat")`
pub const AUTH_HEADER: &str = "Basic OnRlc3QtcGF0";

/// Path prefix of project-scoped endpoints on the mock server.
pub fn project_path(endpoint: &str) -> String {
    format!("/{}/{}/_apis{}", ORG, PROJECT, endpoint)
}

/// Path prefix of organization-scoped endpoints on the mock server.
pub fn org_path(endpoint: &str) -> String {
    format!("/{}/_apis{}", ORG, endpoint)
}

pub fn client(server: &MockServer) -> AzureDevOpsClient {
    AzureDevOpsClient::with_base_url(server.base_url(), ORG, PROJECT, PAT)
}

pub fn handler(server: &MockServer) -> ToolHandler {
    ToolHandler::new(Arc::new(client(server)), Arc::new(ToolRegistry::builtin()))
}

pub fn handler_with_output(server: &MockServer, output: OutputConfig) -> ToolHandler {
    handler(server).with_output_config(output)
}

/// Call a tool and return its result.
pub async fn call(handler: &ToolHandler, tool: &str, arguments: Value) -> ToolCallResult {
    handler.execute(tool, Some(arguments)).await
}

/// Timeline record JSON as the build API returns it.
pub fn timeline_record(id: &str, kind: &str, name: &str, result: &str, log_id: Option<u64>) -> Value {
    let mut record = serde_json::json!({
        "id": id,
        "parentId": null,
        "type": kind,
        "name": name,
        "state": "completed",
        "result": result,
        "errorCount": if result == "failed" { 1 } else { 0 },
        "warningCount": 0,
        "issues": null
    });
    if let Some(log_id) = log_id {
        record["log"] = serde_json::json!({ "id": log_id, "type": "Container" });
    }
    record
}
