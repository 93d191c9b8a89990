//! Azure DevOps REST response and request types.
//!
//! These mirror the raw JSON of the REST API (api-version 7.1). They are
//! deserialized and then mapped to unified types in `client.rs`.

use serde::{Deserialize, Serialize};

/// Standard collection envelope: `{ "count": n, "value": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct AzureList<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

// =============================================================================
// Identities
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureIdentityRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub unique_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
}

/// Minimal project reference embedded in other resources.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureProjectRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// =============================================================================
// TFVC
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureChangeset {
    pub changeset_id: u64,
    #[serde(default)]
    pub author: Option<AzureIdentityRef>,
    #[serde(default)]
    pub checked_in_by: Option<AzureIdentityRef>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureTfvcChange {
    pub item: AzureTfvcItem,
    pub change_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureTfvcItem {
    pub path: String,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub is_folder: bool,
}

// =============================================================================
// Builds
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AzureDefinitionRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AzureLinks {
    #[serde(default)]
    pub web: Option<AzureLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureLink {
    pub href: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureBuild {
    pub id: u64,
    #[serde(default)]
    pub build_number: Option<String>,
    #[serde(default)]
    pub definition: Option<AzureDefinitionRef>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub queue_time: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub finish_time: Option<String>,
    #[serde(default)]
    pub source_branch: Option<String>,
    #[serde(default)]
    pub source_version: Option<String>,
    #[serde(default)]
    pub requested_for: Option<AzureIdentityRef>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, rename = "_links")]
    pub links: Option<AzureLinks>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureBuildLog {
    pub id: u64,
    #[serde(default, rename = "type")]
    pub log_type: Option<String>,
    #[serde(default)]
    pub line_count: Option<u64>,
    #[serde(default)]
    pub created_on: Option<String>,
    #[serde(default)]
    pub last_changed_on: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureTimeline {
    #[serde(default)]
    pub records: Vec<AzureTimelineRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureLogRef {
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureIssue {
    #[serde(default, rename = "type")]
    pub issue_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureTimelineRecord {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default, rename = "type")]
    pub record_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub finish_time: Option<String>,
    #[serde(default)]
    pub log: Option<AzureLogRef>,
    // The API sends `"issues": null` for records without issues
    #[serde(default)]
    pub issues: Option<Vec<AzureIssue>>,
    #[serde(default)]
    pub error_count: Option<u32>,
    #[serde(default)]
    pub warning_count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureBuildDefinition {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, rename = "type")]
    pub definition_type: Option<String>,
    #[serde(default)]
    pub queue_status: Option<String>,
    #[serde(default)]
    pub revision: Option<u64>,
}

// =============================================================================
// Git
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureRepository {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub project: Option<AzureProjectRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureGitUserDate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AzureChangeCounts {
    #[serde(default)]
    pub add: Option<u32>,
    #[serde(default)]
    pub edit: Option<u32>,
    #[serde(default)]
    pub delete: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureGitCommit {
    pub commit_id: String,
    #[serde(default)]
    pub author: Option<AzureGitUserDate>,
    #[serde(default)]
    pub committer: Option<AzureGitUserDate>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub change_counts: Option<AzureChangeCounts>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub remote_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureGitItem {
    pub path: String,
    #[serde(default)]
    pub git_object_type: Option<String>,
    #[serde(default)]
    pub is_folder: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureGitChange {
    pub item: AzureGitItem,
    pub change_type: String,
}

/// Response of `commits/{id}/changes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureGitCommitChanges {
    #[serde(default)]
    pub change_counts: Option<AzureChangeCounts>,
    #[serde(default)]
    pub changes: Vec<AzureGitChange>,
}

// =============================================================================
// Pull requests
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureReviewer {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub unique_name: Option<String>,
    #[serde(default)]
    pub vote: i32,
    #[serde(default)]
    pub is_required: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureRepositoryRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub project: Option<AzureProjectRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzurePullRequest {
    pub pull_request_id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub created_by: Option<AzureIdentityRef>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub source_ref_name: Option<String>,
    #[serde(default)]
    pub target_ref_name: Option<String>,
    #[serde(default)]
    pub merge_status: Option<String>,
    #[serde(default)]
    pub repository: Option<AzureRepositoryRef>,
    #[serde(default)]
    pub reviewers: Vec<AzureReviewer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewerRefRequest {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePullRequestRequest {
    pub source_ref_name: String,
    pub target_ref_name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<ReviewerRefRequest>,
    pub is_draft: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteRequest {
    pub vote: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzurePolicyTypeRef {
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzurePolicyConfiguration {
    #[serde(default)]
    pub is_blocking: bool,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default, rename = "type")]
    pub policy_type: Option<AzurePolicyTypeRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzurePolicyEvaluation {
    pub evaluation_id: String,
    #[serde(default)]
    pub configuration: Option<AzurePolicyConfiguration>,
    #[serde(default)]
    pub status: Option<String>,
}
