//! Tool handlers for the MCP server.
//!
//! Each tool parses its JSON arguments, calls the provider and renders the
//! result. Failures are folded into a [`ToolCallResult`] in one place
//! ([`finish`]) so every tool reports errors the same way:
//!
//! - a missing resource becomes ordinary output (`Build 999999 not found.`)
//! - bad arguments, unknown tools and provider failures set `isError`

mod build;
mod changeset;
mod git;
mod pull_request;

use std::sync::Arc;

use azdo_core::{Error, OutputConfig, Provider};
use azdo_output::{markdown, render, OutputFormat};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::tools::ToolRegistry;

/// Executes registered tools against a provider.
pub struct ToolHandler {
    provider: Arc<dyn Provider>,
    registry: Arc<ToolRegistry>,
    output: OutputConfig,
}

impl ToolHandler {
    pub fn new(provider: Arc<dyn Provider>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            provider,
            registry,
            output: OutputConfig::default(),
        }
    }

    /// Use custom output limits.
    pub fn with_output_config(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Definitions for `tools/list`.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    /// Execute a tool by name with arguments.
    pub async fn execute(&self, name: &str, arguments: Option<Value>) -> ToolCallResult {
        if !self.registry.contains(name) {
            warn!(tool = name, "Unknown tool");
            return ToolCallResult::error(format!("Unknown tool: {}", name));
        }

        info!(
            tool = name,
            provider = self.provider.provider_name(),
            "Calling tool"
        );

        let outcome = match name {
            "get_changeset_tool" => self.get_changeset(arguments).await,
            "get_changeset_changes_tool" => self.get_changeset_changes(arguments).await,
            "get_changeset_list_tool" => self.get_changeset_list(arguments).await,
            "get_file_diff_tool" => self.get_file_diff(arguments).await,
            "get_build_tool" => self.get_build(arguments).await,
            "get_builds_tool" => self.get_builds(arguments).await,
            "get_build_logs_tool" => self.get_build_logs(arguments).await,
            "get_build_log_full_content_tool" => self.get_build_log_full_content(arguments).await,
            "get_failed_tasks_with_logs_tool" => self.get_failed_tasks_with_logs(arguments).await,
            "get_build_pipelines_tool" => self.get_build_pipelines(arguments).await,
            "get_projects_tool" => self.get_projects(arguments).await,
            "get_git_repositories_tool" => self.get_git_repositories(arguments).await,
            "get_git_repository_tool" => self.get_git_repository(arguments).await,
            "get_git_commits_tool" => self.get_git_commits(arguments).await,
            "get_git_commit_details_tool" => self.get_git_commit_details(arguments).await,
            "get_pull_requests_tool" => self.get_pull_requests(arguments).await,
            "get_pull_request_details_tool" => self.get_pull_request_details(arguments).await,
            "create_pull_request_tool" => self.create_pull_request(arguments).await,
            "approve_pull_request_tool" => self.approve_pull_request(arguments).await,
            "reject_pull_request_tool" => self.reject_pull_request(arguments).await,
            "request_pull_request_changes_tool" => {
                self.request_pull_request_changes(arguments).await
            }
            "get_pull_request_policies_tool" => self.get_pull_request_policies(arguments).await,
            _ => {
                warn!(tool = name, "Registered tool has no handler");
                return ToolCallResult::error(format!("Tool {} is not implemented", name));
            }
        };

        finish(name, outcome)
    }

    async fn get_projects(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: FormatParams = parse_params(arguments)?;
        let format = params.format()?;

        let projects = self.provider.get_projects().await?;
        Ok(render(
            projects.as_slice(),
            format,
            markdown::projects_to_markdown,
        )?)
    }
}

// =============================================================================
// Error normalization
// =============================================================================

/// Why a tool did not produce its normal output.
#[derive(Debug)]
pub(crate) enum ToolError {
    /// Arguments missing, mistyped or inconsistent.
    InvalidArguments(String),
    /// The requested resource does not exist. Reported as plain output.
    NotFound(String),
    /// Any provider or rendering failure.
    Failed(Error),
}

impl From<Error> for ToolError {
    fn from(error: Error) -> Self {
        match error {
            Error::NotFound(message) => ToolError::NotFound(format!("Not found: {}", message)),
            other => ToolError::Failed(other),
        }
    }
}

pub(crate) type ToolOutcome = std::result::Result<String, ToolError>;

/// Attach a readable subject to a provider `NotFound`.
pub(crate) trait NotFoundExt<T> {
    fn not_found<F: FnOnce() -> String>(self, subject: F) -> std::result::Result<T, ToolError>;
}

impl<T> NotFoundExt<T> for azdo_core::Result<T> {
    fn not_found<F: FnOnce() -> String>(self, subject: F) -> std::result::Result<T, ToolError> {
        self.map_err(|e| match e {
            Error::NotFound(_) => ToolError::NotFound(format!("{} not found.", subject())),
            other => ToolError::Failed(other),
        })
    }
}

fn finish(tool: &str, outcome: ToolOutcome) -> ToolCallResult {
    match outcome {
        Ok(text) => ToolCallResult::text(text),
        Err(ToolError::NotFound(message)) => {
            info!(tool, "{}", message);
            ToolCallResult::text(message)
        }
        Err(ToolError::InvalidArguments(message)) => {
            warn!(tool, "Invalid arguments: {}", message);
            ToolCallResult::error(format!("Invalid arguments for {}: {}", tool, message))
        }
        Err(ToolError::Failed(error)) => {
            warn!(tool, "Tool failed: {}", error);
            ToolCallResult::error(format!("{} failed: {}", tool, error))
        }
    }
}

/// Deserialize tool arguments. Missing arguments are treated as `{}`.
pub(crate) fn parse_params<T: DeserializeOwned>(
    arguments: Option<Value>,
) -> std::result::Result<T, ToolError> {
    let value = match arguments {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(value) => value,
    };
    serde_json::from_value(value).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Reject blank strings in required text parameters.
pub(crate) fn require_text<'a>(name: &str, value: &'a str) -> std::result::Result<&'a str, ToolError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ToolError::InvalidArguments(format!(
            "'{}' must not be empty",
            name
        )));
    }
    Ok(trimmed)
}

/// Parameters of tools that only take an output format.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FormatParams {
    pub format: Option<String>,
}

impl FormatParams {
    pub fn format(&self) -> std::result::Result<OutputFormat, ToolError> {
        parse_format(self.format.as_deref())
    }
}

pub(crate) fn parse_format(value: Option<&str>) -> std::result::Result<OutputFormat, ToolError> {
    OutputFormat::parse(value).map_err(|e| match e {
        Error::InvalidData(message) => ToolError::InvalidArguments(message),
        other => ToolError::Failed(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockDevOps;
    use azdo_core::Project;
    use serde_json::json;

    fn handler(mock: MockDevOps) -> ToolHandler {
        ToolHandler::new(Arc::new(mock), Arc::new(ToolRegistry::builtin()))
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let handler = handler(MockDevOps::new());
        let result = handler.execute("get_issues", None).await;

        assert!(result.is_error());
        assert!(result.text_content().contains("Unknown tool: get_issues"));
    }

    #[tokio::test]
    async fn test_registered_tool_without_handler() {
        let mut registry = ToolRegistry::builtin();
        registry.register(crate::tools::ToolSpec::new(
            "custom_tool",
            crate::tools::ToolCategory::Project,
            "Not wired",
            json!({"type": "object"}),
        ));
        let mut mock = MockDevOps::new();
        mock.expect_provider_name().return_const("mock");
        let handler = ToolHandler::new(Arc::new(mock), Arc::new(registry));

        let result = handler.execute("custom_tool", None).await;
        assert!(result.is_error());
        assert!(result.text_content().contains("not implemented"));
    }

    #[tokio::test]
    async fn test_get_projects() {
        let mut mock = MockDevOps::new();
        mock.expect_provider_name().return_const("mock");
        mock.expect_get_projects().times(1).returning(|| {
            Ok(vec![Project {
                id: "p1".to_string(),
                name: "Fabrikam".to_string(),
                description: Some("Main project".to_string()),
                state: Some("wellFormed".to_string()),
                visibility: Some("private".to_string()),
            }])
        });

        let result = handler(mock).execute("get_projects_tool", None).await;
        assert!(!result.is_error());
        assert!(result.text_content().contains("Fabrikam"));
    }

    #[tokio::test]
    async fn test_invalid_format_is_argument_error() {
        let mut mock = MockDevOps::new();
        mock.expect_provider_name().return_const("mock");
        mock.expect_get_projects().times(0);

        let result = handler(mock)
            .execute("get_projects_tool", Some(json!({"format": "xml"})))
            .await;
        assert!(result.is_error());
        assert!(result.text_content().contains("Invalid arguments"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_error_result() {
        let mut mock = MockDevOps::new();
        mock.expect_provider_name().return_const("mock");
        mock.expect_get_projects()
            .returning(|| Err(Error::Auth("PAT expired".to_string())));

        let result = handler(mock).execute("get_projects_tool", None).await;
        assert!(result.is_error());
        assert!(result.text_content().contains("PAT expired"));
    }

    #[test]
    fn test_parse_params_defaults_to_empty_object() {
        let params: FormatParams = parse_params(None).unwrap();
        assert!(params.format.is_none());

        let params: FormatParams = parse_params(Some(Value::Null)).unwrap();
        assert!(params.format.is_none());

        let err = parse_params::<FormatParams>(Some(json!({"format": 3}))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_not_found_ext() {
        let result: azdo_core::Result<()> = Err(Error::NotFound("TF14045".to_string()));
        match result.not_found(|| "Changeset 999999".to_string()) {
            Err(ToolError::NotFound(message)) => {
                assert_eq!(message, "Changeset 999999 not found.")
            }
            other => panic!("expected not found, got {:?}", other),
        }

        let result: azdo_core::Result<()> = Err(Error::Http("timeout".to_string()));
        assert!(matches!(
            result.not_found(|| "x".to_string()),
            Err(ToolError::Failed(Error::Http(_)))
        ));
    }

    #[test]
    fn test_finish_normalization() {
        let not_found = finish("t", Err(ToolError::NotFound("Build 1 not found.".to_string())));
        assert!(!not_found.is_error());
        assert_eq!(not_found.is_error, None);
        assert_eq!(not_found.text_content(), "Build 1 not found.");

        let invalid = finish("t", Err(ToolError::InvalidArguments("missing field `build_id`".to_string())));
        assert!(invalid.is_error());
        assert!(invalid.text_content().contains("build_id"));
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("title", "  Fix  ").unwrap(), "Fix");
        assert!(matches!(
            require_text("title", "   "),
            Err(ToolError::InvalidArguments(_))
        ));
    }
}
