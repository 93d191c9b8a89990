//! Tool registry and discovery.
//!
//! The registry is built once at startup with [`ToolRegistry::builtin`] and
//! shared read-only (`Arc<ToolRegistry>`) by the server and handlers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::protocol::ToolDefinition;

/// Group a tool belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolCategory {
    Changeset,
    Build,
    Pipeline,
    Diagnostic,
    Git,
    PullRequest,
    Project,
}

impl ToolCategory {
    pub const ALL: [ToolCategory; 7] = [
        ToolCategory::Changeset,
        ToolCategory::Build,
        ToolCategory::Pipeline,
        ToolCategory::Diagnostic,
        ToolCategory::Git,
        ToolCategory::PullRequest,
        ToolCategory::Project,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ToolCategory::Changeset => "changeset",
            ToolCategory::Build => "build",
            ToolCategory::Pipeline => "pipeline",
            ToolCategory::Diagnostic => "diagnostic",
            ToolCategory::Git => "git",
            ToolCategory::PullRequest => "pull-request",
            ToolCategory::Project => "project",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolCategory::Changeset => "TFVC changesets, their file changes and file diffs",
            ToolCategory::Build => "Builds and build logs",
            ToolCategory::Pipeline => "Build pipeline definitions",
            ToolCategory::Diagnostic => "Failure analysis across build timelines and logs",
            ToolCategory::Git => "Git repositories and commits",
            ToolCategory::PullRequest => "Pull requests, reviews and branch policies",
            ToolCategory::Project => "Projects in the organization",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A registered tool: name, description, category and JSON input schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub category: ToolCategory,
    pub input_schema: Value,
}

impl ToolSpec {
    pub fn new(
        name: impl Into<String>,
        category: ToolCategory,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category,
            input_schema,
        }
    }

    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

/// Summary returned by [`ToolRegistry::get_available_tools`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableTools {
    pub total_tools: usize,
    pub tool_categories: BTreeMap<String, CategorySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub description: String,
    pub tool_count: usize,
    pub tools: Vec<String>,
}

/// Tools of one category, returned by [`ToolRegistry::get_tools_by_category`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTools {
    pub category: String,
    pub description: String,
    pub tool_count: usize,
    pub tools: BTreeMap<String, ToolSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub description: String,
}

/// Name-keyed set of tools, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every Azure DevOps tool.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for spec in builtin_tools() {
            registry.register(spec);
        }
        registry
    }

    /// Register a tool. A tool with the same name is replaced in place.
    pub fn register(&mut self, spec: ToolSpec) {
        match self.tools.iter_mut().find(|t| t.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.tools.push(spec),
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter()
    }

    /// `tools/list` payload, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(ToolSpec::to_definition).collect()
    }

    /// Total tool count and the tools of each non-empty category.
    pub fn get_available_tools(&self) -> AvailableTools {
        let mut tool_categories = BTreeMap::new();
        for category in ToolCategory::ALL {
            let tools: Vec<String> = self
                .in_category(category)
                .map(|t| t.name.clone())
                .collect();
            if tools.is_empty() {
                continue;
            }
            tool_categories.insert(
                category.label().to_string(),
                CategorySummary {
                    description: category.description().to_string(),
                    tool_count: tools.len(),
                    tools,
                },
            );
        }

        AvailableTools {
            total_tools: self.tools.len(),
            tool_categories,
        }
    }

    /// Tools of the category with the given label.
    ///
    /// Unknown labels yield an empty result rather than an error.
    pub fn get_tools_by_category(&self, category: &str) -> CategoryTools {
        let Some(known) = ToolCategory::from_label(category) else {
            let labels: Vec<&str> = ToolCategory::ALL.iter().map(|c| c.label()).collect();
            return CategoryTools {
                category: category.to_string(),
                description: format!(
                    "Unknown category '{}'. Available categories: {}",
                    category,
                    labels.join(", ")
                ),
                tool_count: 0,
                tools: BTreeMap::new(),
            };
        };

        let tools: BTreeMap<String, ToolSummary> = self
            .in_category(known)
            .map(|t| {
                (
                    t.name.clone(),
                    ToolSummary {
                        description: t.description.clone(),
                    },
                )
            })
            .collect();

        CategoryTools {
            category: known.label().to_string(),
            description: known.description().to_string(),
            tool_count: tools.len(),
            tools,
        }
    }

    fn in_category(&self, category: ToolCategory) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter().filter(move |t| t.category == category)
    }
}

// =============================================================================
// Built-in tool definitions
// =============================================================================

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn id_property(description: &str) -> Value {
    json!({ "type": "integer", "minimum": 1, "description": description })
}

fn string_property(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn top_property(default: Option<u32>) -> Value {
    let description = match default {
        Some(d) => format!("Maximum number of results (default: {})", d),
        None => "Maximum number of results".to_string(),
    };
    json!({ "type": "integer", "minimum": 1, "description": description })
}

fn format_property() -> Value {
    json!({
        "type": "string",
        "enum": ["markdown", "json"],
        "description": "Output format (default: markdown)"
    })
}

fn changeset_tools() -> Vec<ToolSpec> {
    use ToolCategory::Changeset;
    vec![
        ToolSpec::new(
            "get_changeset_tool",
            Changeset,
            "Get a TFVC changeset by ID: author, date and comment",
            object_schema(
                json!({
                    "changeset_id": id_property("Changeset ID"),
                    "format": format_property(),
                }),
                &["changeset_id"],
            ),
        ),
        ToolSpec::new(
            "get_changeset_changes_tool",
            Changeset,
            "List the files changed in a TFVC changeset with their change types",
            object_schema(
                json!({
                    "changeset_id": id_property("Changeset ID"),
                    "format": format_property(),
                }),
                &["changeset_id"],
            ),
        ),
        ToolSpec::new(
            "get_changeset_list_tool",
            Changeset,
            "Search TFVC changesets by author and changeset ID range",
            object_schema(
                json!({
                    "author": string_property("Author display name or unique name"),
                    "from_changeset_id": id_property("Lowest changeset ID to include"),
                    "to_changeset_id": id_property("Highest changeset ID to include"),
                    "top": top_property(None),
                    "format": format_property(),
                }),
                &[],
            ),
        ),
        ToolSpec::new(
            "get_file_diff_tool",
            Changeset,
            "Unified diff of one file between the previous changeset and the given changeset",
            object_schema(
                json!({
                    "file_path": string_property("Server path of the file, e.g. $/Project/src/app.cs"),
                    "changeset_id": id_property("Changeset ID"),
                }),
                &["file_path", "changeset_id"],
            ),
        ),
    ]
}

fn build_tools() -> Vec<ToolSpec> {
    use ToolCategory::Build;
    vec![
        ToolSpec::new(
            "get_build_tool",
            Build,
            "Get a build by ID: status, result, branch and timing",
            object_schema(
                json!({
                    "build_id": id_property("Build ID"),
                    "format": format_property(),
                }),
                &["build_id"],
            ),
        ),
        ToolSpec::new(
            "get_builds_tool",
            Build,
            "List recent builds, optionally for one pipeline definition or status",
            object_schema(
                json!({
                    "definition_id": id_property("Build definition (pipeline) ID"),
                    "top": top_property(Some(50)),
                    "status_filter": {
                        "type": "string",
                        "enum": ["all", "inProgress", "completed", "cancelling", "postponed", "notStarted"],
                        "description": "Only builds with this status"
                    },
                    "format": format_property(),
                }),
                &[],
            ),
        ),
        ToolSpec::new(
            "get_build_logs_tool",
            Build,
            "List the logs of a build with line counts and a preview of each log",
            object_schema(
                json!({ "build_id": id_property("Build ID") }),
                &["build_id"],
            ),
        ),
        ToolSpec::new(
            "get_build_log_full_content_tool",
            Build,
            "Get the full text of one build log",
            object_schema(
                json!({
                    "build_id": id_property("Build ID"),
                    "log_id": id_property("Log ID from get_build_logs_tool"),
                }),
                &["build_id", "log_id"],
            ),
        ),
    ]
}

fn pipeline_and_diagnostic_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new(
            "get_build_pipelines_tool",
            ToolCategory::Pipeline,
            "List the build pipeline definitions of the project",
            object_schema(json!({ "format": format_property() }), &[]),
        ),
        ToolSpec::new(
            "get_failed_tasks_with_logs_tool",
            ToolCategory::Diagnostic,
            "Find the failed tasks of a build and show their issues and the tail of their logs",
            object_schema(
                json!({
                    "build_id": id_property("Build ID"),
                    "tail_lines": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Trailing log lines per failed task (default from config)"
                    },
                }),
                &["build_id"],
            ),
        ),
    ]
}

fn project_tools() -> Vec<ToolSpec> {
    vec![ToolSpec::new(
        "get_projects_tool",
        ToolCategory::Project,
        "List the projects of the Azure DevOps organization",
        object_schema(json!({ "format": format_property() }), &[]),
    )]
}

fn git_tools() -> Vec<ToolSpec> {
    use ToolCategory::Git;
    let repository = || string_property("Repository ID or name");
    vec![
        ToolSpec::new(
            "get_git_repositories_tool",
            Git,
            "List the git repositories of the project",
            object_schema(json!({ "format": format_property() }), &[]),
        ),
        ToolSpec::new(
            "get_git_repository_tool",
            Git,
            "Get a git repository: default branch, size and URLs",
            object_schema(
                json!({
                    "repository_id": repository(),
                    "format": format_property(),
                }),
                &["repository_id"],
            ),
        ),
        ToolSpec::new(
            "get_git_commits_tool",
            Git,
            "List recent commits of a repository, optionally on one branch",
            object_schema(
                json!({
                    "repository_id": repository(),
                    "branch": string_property("Branch name (default: repository default branch)"),
                    "top": top_property(None),
                    "format": format_property(),
                }),
                &["repository_id"],
            ),
        ),
        ToolSpec::new(
            "get_git_commit_details_tool",
            Git,
            "Get a commit with its author, message and changed files",
            object_schema(
                json!({
                    "repository_id": repository(),
                    "commit_id": string_property("Commit SHA"),
                    "format": format_property(),
                }),
                &["repository_id", "commit_id"],
            ),
        ),
    ]
}

fn pull_request_tools() -> Vec<ToolSpec> {
    use ToolCategory::PullRequest;
    let repository = || string_property("Repository ID or name");
    let pull_request = || id_property("Pull request ID");
    let vote_schema = || {
        object_schema(
            json!({
                "repository_id": repository(),
                "pull_request_id": pull_request(),
                "reviewer_id": string_property("Identity ID of the reviewer casting the vote"),
            }),
            &["repository_id", "pull_request_id", "reviewer_id"],
        )
    };

    vec![
        ToolSpec::new(
            "get_pull_requests_tool",
            PullRequest,
            "List pull requests of a repository (active by default)",
            object_schema(
                json!({
                    "repository_id": repository(),
                    "status": {
                        "type": "string",
                        "enum": ["active", "abandoned", "completed", "all"],
                        "description": "Pull request status (default: active)"
                    },
                    "target_branch": string_property("Only pull requests into this branch"),
                    "creator": string_property("Creator identity ID"),
                    "top": top_property(None),
                    "format": format_property(),
                }),
                &["repository_id"],
            ),
        ),
        ToolSpec::new(
            "get_pull_request_details_tool",
            PullRequest,
            "Get a pull request with its reviewers and their votes",
            object_schema(
                json!({
                    "repository_id": repository(),
                    "pull_request_id": pull_request(),
                    "format": format_property(),
                }),
                &["repository_id", "pull_request_id"],
            ),
        ),
        ToolSpec::new(
            "create_pull_request_tool",
            PullRequest,
            "Create a pull request",
            object_schema(
                json!({
                    "repository_id": repository(),
                    "title": string_property("Title"),
                    "source_branch": string_property("Branch with the changes"),
                    "target_branch": string_property("Branch to merge into"),
                    "description": string_property("Description (markdown)"),
                    "reviewers": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Reviewer identity IDs"
                    },
                    "is_draft": { "type": "boolean", "description": "Create as draft (default: false)" },
                }),
                &["repository_id", "title", "source_branch", "target_branch"],
            ),
        ),
        ToolSpec::new(
            "approve_pull_request_tool",
            PullRequest,
            "Approve a pull request (vote 10)",
            vote_schema(),
        ),
        ToolSpec::new(
            "reject_pull_request_tool",
            PullRequest,
            "Reject a pull request (vote -10)",
            vote_schema(),
        ),
        ToolSpec::new(
            "request_pull_request_changes_tool",
            PullRequest,
            "Request changes on a pull request, i.e. wait for author (vote -5)",
            vote_schema(),
        ),
        ToolSpec::new(
            "get_pull_request_policies_tool",
            PullRequest,
            "Get the branch policy evaluations of a pull request",
            object_schema(
                json!({
                    "repository_id": repository(),
                    "pull_request_id": pull_request(),
                    "format": format_property(),
                }),
                &["repository_id", "pull_request_id"],
            ),
        ),
    ]
}

fn builtin_tools() -> Vec<ToolSpec> {
    let mut tools = changeset_tools();
    tools.extend(build_tools());
    tools.extend(pipeline_and_diagnostic_tools());
    tools.extend(project_tools());
    tools.extend(git_tools());
    tools.extend(pull_request_tools());
    tools
}
