//! Unified domain types returned by providers.
//!
//! These are pass-through views of Azure DevOps resources, trimmed to the
//! fields the tools render. They are fetched per call and never cached.

use serde::{Deserialize, Serialize};

// =============================================================================
// Identity
// =============================================================================

/// A user or service identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: Option<String>,
    pub display_name: String,
    pub unique_name: Option<String>,
}

impl Identity {
    /// `Display Name <unique@name>` when a unique name is known.
    pub fn label(&self) -> String {
        match &self.unique_name {
            Some(unique) if !unique.is_empty() && unique != &self.display_name => {
                format!("{} <{}>", self.display_name, unique)
            }
            _ => self.display_name.clone(),
        }
    }
}

// =============================================================================
// Projects
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub state: Option<String>,
    pub visibility: Option<String>,
}

// =============================================================================
// Changesets (TFVC)
// =============================================================================

/// A TFVC changeset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changeset {
    pub id: u64,
    pub author: Identity,
    pub checked_in_by: Option<Identity>,
    pub created_date: Option<String>,
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<ChangesetChange>,
}

/// A single file change inside a changeset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangesetChange {
    pub path: String,
    pub change_type: String,
    pub version: Option<u64>,
}

/// Search criteria for listing changesets.
#[derive(Debug, Clone, Default)]
pub struct ChangesetFilter {
    pub author: Option<String>,
    pub from_id: Option<u64>,
    pub to_id: Option<u64>,
    pub top: Option<u32>,
}

// =============================================================================
// Builds
// =============================================================================

/// Reference to a build definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionRef {
    pub id: u64,
    pub name: String,
}

/// One execution of a pipeline definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: u64,
    pub build_number: String,
    pub definition: Option<DefinitionRef>,
    pub status: String,
    pub result: Option<String>,
    pub queue_time: Option<String>,
    pub start_time: Option<String>,
    pub finish_time: Option<String>,
    pub source_branch: Option<String>,
    pub source_version: Option<String>,
    pub requested_for: Option<Identity>,
    pub reason: Option<String>,
    pub url: Option<String>,
}

/// Filter for listing builds.
#[derive(Debug, Clone, Default)]
pub struct BuildFilter {
    pub definition_id: Option<u64>,
    pub top: Option<u32>,
    pub status: Option<String>,
}

/// Metadata about one build log. Content is fetched separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLog {
    pub id: u64,
    #[serde(rename = "type")]
    pub log_type: String,
    #[serde(rename = "contentLineCount")]
    pub line_count: u64,
    pub created_on: Option<String>,
    pub last_changed_on: Option<String>,
}

/// An issue (error/warning) attached to a timeline record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineIssue {
    #[serde(rename = "type")]
    pub issue_type: String,
    pub message: String,
}

/// One node of a build timeline (stage, job, task...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRecord {
    pub id: String,
    pub parent_id: Option<String>,
    pub record_type: String,
    pub name: String,
    pub state: Option<String>,
    pub result: Option<String>,
    pub start_time: Option<String>,
    pub finish_time: Option<String>,
    pub log_id: Option<u64>,
    #[serde(default)]
    pub issues: Vec<TimelineIssue>,
    pub error_count: u32,
    pub warning_count: u32,
}

impl TimelineRecord {
    /// A task record whose result is `failed`.
    pub fn is_failed_task(&self) -> bool {
        self.record_type.eq_ignore_ascii_case("task")
            && self
                .result
                .as_deref()
                .is_some_and(|r| r.eq_ignore_ascii_case("failed"))
    }
}

// =============================================================================
// Pipelines
// =============================================================================

/// A build definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: u64,
    pub name: String,
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub pipeline_type: Option<String>,
    pub queue_status: Option<String>,
    pub revision: Option<u64>,
}

// =============================================================================
// Git
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepository {
    pub id: String,
    pub name: String,
    pub default_branch: Option<String>,
    pub size: Option<u64>,
    pub remote_url: Option<String>,
    pub web_url: Option<String>,
    pub project: Option<String>,
}

/// Author or committer signature on a commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitSignature {
    pub name: String,
    pub email: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitChange {
    pub path: String,
    pub change_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommit {
    pub commit_id: String,
    pub author: Option<GitSignature>,
    pub committer: Option<GitSignature>,
    pub comment: String,
    pub adds: Option<u32>,
    pub edits: Option<u32>,
    pub deletes: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<GitChange>,
    pub url: Option<String>,
}

/// Filter for listing commits.
#[derive(Debug, Clone, Default)]
pub struct CommitFilter {
    pub branch: Option<String>,
    pub top: Option<u32>,
}

// =============================================================================
// Pull requests
// =============================================================================

/// A reviewer on a pull request, with their current vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviewer {
    pub id: String,
    pub display_name: String,
    pub unique_name: Option<String>,
    pub vote: i32,
    pub is_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub is_draft: bool,
    pub created_by: Option<Identity>,
    pub creation_date: Option<String>,
    pub source_ref: String,
    pub target_ref: String,
    pub merge_status: Option<String>,
    pub repository: Option<String>,
    pub project_id: Option<String>,
    #[serde(default)]
    pub reviewers: Vec<Reviewer>,
}

/// Filter for listing pull requests.
#[derive(Debug, Clone, Default)]
pub struct PullRequestFilter {
    pub status: Option<String>,
    pub target_branch: Option<String>,
    pub creator_id: Option<String>,
    pub top: Option<u32>,
}

/// Input for creating a pull request.
#[derive(Debug, Clone, Default)]
pub struct CreatePullRequestInput {
    pub title: String,
    pub description: Option<String>,
    pub source_branch: String,
    pub target_branch: String,
    pub reviewer_ids: Vec<String>,
    pub is_draft: bool,
}

/// Reviewer vote values accepted by Azure DevOps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewVote {
    Approve,
    ApproveWithSuggestions,
    NoVote,
    WaitForAuthor,
    Reject,
}

impl ReviewVote {
    /// Numeric value sent to the API.
    pub fn value(self) -> i32 {
        match self {
            ReviewVote::Approve => 10,
            ReviewVote::ApproveWithSuggestions => 5,
            ReviewVote::NoVote => 0,
            ReviewVote::WaitForAuthor => -5,
            ReviewVote::Reject => -10,
        }
    }

    /// Interpret a vote value reported by the API.
    pub fn from_value(value: i32) -> Self {
        match value {
            v if v >= 10 => ReviewVote::Approve,
            v if v > 0 => ReviewVote::ApproveWithSuggestions,
            0 => ReviewVote::NoVote,
            v if v > -10 => ReviewVote::WaitForAuthor,
            _ => ReviewVote::Reject,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReviewVote::Approve => "approved",
            ReviewVote::ApproveWithSuggestions => "approved with suggestions",
            ReviewVote::NoVote => "no vote",
            ReviewVote::WaitForAuthor => "waiting for author",
            ReviewVote::Reject => "rejected",
        }
    }
}

/// Evaluation of a branch policy against a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyEvaluation {
    pub evaluation_id: String,
    pub policy_type: String,
    pub is_blocking: bool,
    pub is_enabled: bool,
    pub status: String,
}

/// Ensure a branch name is a full `refs/heads/...` ref.
pub fn normalize_branch_ref(branch: &str) -> String {
    if branch.starts_with("refs/") {
        branch.to_string()
    } else {
        format!("refs/heads/{}", branch)
    }
}

/// Strip `refs/heads/` for display.
pub fn short_branch_name(git_ref: &str) -> &str {
    git_ref.strip_prefix("refs/heads/").unwrap_or(git_ref)
}
