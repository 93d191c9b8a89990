//! Azure DevOps REST client implementation.

use std::time::Duration;

use async_trait::async_trait;
use azdo_core::{
    normalize_branch_ref, short_branch_name, AzureDevOpsConfig, Build, BuildFilter, BuildLog,
    BuildProvider, Changeset, ChangesetChange, ChangesetFilter, ChangesetProvider, CommitFilter,
    CreatePullRequestInput, DefinitionRef, Error, GitChange, GitCommit, GitProvider,
    GitRepository, GitSignature, Identity, Pipeline, PolicyEvaluation, Project, Provider,
    PullRequest, PullRequestFilter, PullRequestProvider, Result, ReviewVote, Reviewer,
    TimelineIssue, TimelineRecord,
};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::types::{
    AzureBuild, AzureBuildDefinition, AzureBuildLog, AzureChangeCounts, AzureChangeset,
    AzureGitChange, AzureGitCommit, AzureGitCommitChanges, AzureGitUserDate, AzureIdentityRef,
    AzureList, AzurePolicyEvaluation, AzureProject, AzurePullRequest, AzureRepository,
    AzureReviewer, AzureTfvcChange, AzureTfvcItem, AzureTimeline, AzureTimelineRecord,
    CreatePullRequestRequest, ReviewerRefRequest, VoteRequest,
};
use crate::DEFAULT_AZURE_DEVOPS_URL;

const USER_AGENT: &str = concat!("azdo-tools/", env!("CARGO_PKG_VERSION"));

type Query<'a> = [(&'a str, String)];

/// Azure DevOps API client scoped to one organization and project.
pub struct AzureDevOpsClient {
    base_url: String,
    organization: String,
    project: String,
    api_version: String,
    token: String,
    client: reqwest::Client,
}

impl AzureDevOpsClient {
    /// Create a client for Azure DevOps Services.
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self::with_base_url(DEFAULT_AZURE_DEVOPS_URL, organization, project, token)
    }

    /// Create a client with a custom base URL (Azure DevOps Server, tests).
    pub fn with_base_url(
        base_url: impl Into<String>,
        organization: impl Into<String>,
        project: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            organization: organization.into(),
            project: project.into(),
            api_version: azdo_core::config::DEFAULT_API_VERSION.to_string(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from configuration, applying the HTTP timeout.
    pub fn from_config(config: &AzureDevOpsConfig, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {}", e)))?;

        let mut azure = Self::with_base_url(
            config.base_url(),
            config.organization.clone(),
            config.project.clone(),
            token,
        )
        .with_api_version(config.api_version());
        azure.client = client;
        Ok(azure)
    }

    /// Override the REST API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Build request with auth and api-version.
    ///
    /// PATs go in HTTP Basic auth with an empty user name.
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth("", Some(&self.token))
            .query(&[("api-version", self.api_version.as_str())])
    }

    /// Project-scoped API URL: `{base}/{org}/{project}/_apis{endpoint}`.
    fn project_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}/_apis{}",
            self.base_url, self.organization, self.project, endpoint
        )
    }

    /// Organization-scoped API URL: `{base}/{org}/_apis{endpoint}`.
    fn org_url(&self, endpoint: &str) -> String {
        format!("{}/{}/_apis{}", self.base_url, self.organization, endpoint)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;
        check_status(response).await
    }

    /// Make an authenticated GET request with typed deserialization.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str, query: &Query<'_>) -> Result<T> {
        debug!(url = url, "Azure DevOps GET request");

        let response = self
            .send(self.request(reqwest::Method::GET, url).query(query))
            .await?;
        parse_json(response).await
    }

    /// Make an authenticated GET request returning the raw body.
    async fn get_text(&self, url: &str, query: &Query<'_>) -> Result<String> {
        debug!(url = url, "Azure DevOps GET (text) request");

        let response = self
            .send(
                self.request(reqwest::Method::GET, url)
                    .header(reqwest::header::ACCEPT, "text/plain")
                    .query(query),
            )
            .await?;
        response
            .text()
            .await
            .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))
    }

    /// Make an authenticated POST request.
    async fn post<T: serde::de::DeserializeOwned, B: serde::Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        debug!(url = url, "Azure DevOps POST request");

        let response = self
            .send(self.request(reqwest::Method::POST, url).json(body))
            .await?;
        parse_json(response).await
    }

    /// Make an authenticated PUT request.
    async fn put<T: serde::de::DeserializeOwned, B: serde::Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        debug!(url = url, "Azure DevOps PUT request");

        let response = self
            .send(self.request(reqwest::Method::PUT, url).json(body))
            .await?;
        parse_json(response).await
    }

    /// `.../_apis/git/repositories/{repository}/{segments}`.
    ///
    /// Each part is percent-encoded as one path segment, so ids containing
    /// `/`, `?` or `#` cannot address another resource.
    fn repository_url(&self, repository: &str, segments: &[&str]) -> Result<String> {
        let base = self.project_url("/git/repositories");
        let mut url = reqwest::Url::parse(&base)
            .map_err(|e| Error::InvalidData(format!("Invalid URL {}: {}", base, e)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::InvalidData(format!("URL {} cannot carry a path", base)))?;
            for segment in std::iter::once(&repository).chain(segments) {
                if matches!(segment.trim(), "" | "." | "..") {
                    return Err(Error::InvalidData(format!(
                        "Invalid path segment '{}'",
                        segment
                    )));
                }
                path.push(segment);
            }
        }
        Ok(url.to_string())
    }
}

/// Map non-success statuses to errors.
///
/// Azure DevOps answers a rejected PAT with `203` and an HTML sign-in page,
/// so 203 counts as a failure even though it is a 2xx.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() && status != StatusCode::NON_AUTHORITATIVE_INFORMATION {
        return Ok(response);
    }

    let status_code = status.as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    warn!(
        status = status_code,
        message = message.as_str(),
        "Azure DevOps API error response"
    );
    Err(Error::from_status(status_code, message))
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))
}

/// Extract `message` from an Azure DevOps error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn push_opt<T: ToString>(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        query.push((key, value.to_string()));
    }
}

// =============================================================================
// Mapping functions: Azure DevOps types -> Unified types
// =============================================================================

fn map_identity(identity: Option<&AzureIdentityRef>) -> Option<Identity> {
    identity.map(|i| Identity {
        id: i.id.clone(),
        display_name: i
            .display_name
            .clone()
            .or_else(|| i.unique_name.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        unique_name: i.unique_name.clone(),
    })
}

fn map_identity_required(identity: Option<&AzureIdentityRef>) -> Identity {
    map_identity(identity).unwrap_or_else(|| Identity {
        display_name: "Unknown".to_string(),
        ..Default::default()
    })
}

fn map_project(project: &AzureProject) -> Project {
    Project {
        id: project.id.clone(),
        name: project.name.clone(),
        description: project.description.clone(),
        state: project.state.clone(),
        visibility: project.visibility.clone(),
    }
}

fn map_changeset(changeset: &AzureChangeset) -> Changeset {
    Changeset {
        id: changeset.changeset_id,
        author: map_identity_required(changeset.author.as_ref()),
        checked_in_by: map_identity(changeset.checked_in_by.as_ref()),
        created_date: changeset.created_date.clone(),
        comment: changeset.comment.clone(),
        changes: vec![],
    }
}

fn map_changeset_change(change: &AzureTfvcChange) -> ChangesetChange {
    ChangesetChange {
        path: change.item.path.clone(),
        change_type: change.change_type.clone(),
        version: change.item.version,
    }
}

fn map_build(build: &AzureBuild) -> Build {
    Build {
        id: build.id,
        build_number: build
            .build_number
            .clone()
            .unwrap_or_else(|| build.id.to_string()),
        definition: build.definition.as_ref().map(|d| DefinitionRef {
            id: d.id,
            name: d.name.clone(),
        }),
        status: build
            .status
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        result: build.result.clone(),
        queue_time: build.queue_time.clone(),
        start_time: build.start_time.clone(),
        finish_time: build.finish_time.clone(),
        source_branch: build.source_branch.clone(),
        source_version: build.source_version.clone(),
        requested_for: map_identity(build.requested_for.as_ref()),
        reason: build.reason.clone(),
        url: build
            .links
            .as_ref()
            .and_then(|l| l.web.as_ref())
            .map(|w| w.href.clone()),
    }
}

fn map_build_log(log: &AzureBuildLog) -> BuildLog {
    BuildLog {
        id: log.id,
        log_type: log.log_type.clone().unwrap_or_else(|| "Container".to_string()),
        line_count: log.line_count.unwrap_or(0),
        created_on: log.created_on.clone(),
        last_changed_on: log.last_changed_on.clone(),
    }
}

fn map_timeline_record(record: &AzureTimelineRecord) -> TimelineRecord {
    TimelineRecord {
        id: record.id.clone(),
        parent_id: record.parent_id.clone(),
        record_type: record
            .record_type
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        name: record.name.clone().unwrap_or_default(),
        state: record.state.clone(),
        result: record.result.clone(),
        start_time: record.start_time.clone(),
        finish_time: record.finish_time.clone(),
        log_id: record.log.as_ref().map(|l| l.id),
        issues: record
            .issues
            .iter()
            .flatten()
            .map(|i| TimelineIssue {
                issue_type: i.issue_type.clone().unwrap_or_else(|| "error".to_string()),
                message: i.message.clone().unwrap_or_default(),
            })
            .collect(),
        error_count: record.error_count.unwrap_or(0),
        warning_count: record.warning_count.unwrap_or(0),
    }
}

fn map_pipeline(definition: &AzureBuildDefinition) -> Pipeline {
    Pipeline {
        id: definition.id,
        name: definition.name.clone(),
        path: definition.path.clone(),
        pipeline_type: definition.definition_type.clone(),
        queue_status: definition.queue_status.clone(),
        revision: definition.revision,
    }
}

fn map_repository(repository: &AzureRepository) -> GitRepository {
    GitRepository {
        id: repository.id.clone(),
        name: repository.name.clone(),
        default_branch: repository.default_branch.clone(),
        size: repository.size,
        remote_url: repository.remote_url.clone(),
        web_url: repository.web_url.clone(),
        project: repository.project.as_ref().and_then(|p| p.name.clone()),
    }
}

fn map_signature(signature: Option<&AzureGitUserDate>) -> Option<GitSignature> {
    signature.map(|s| GitSignature {
        name: s.name.clone().unwrap_or_else(|| "Unknown".to_string()),
        email: s.email.clone(),
        date: s.date.clone(),
    })
}

fn map_commit(commit: &AzureGitCommit) -> GitCommit {
    let counts = commit.change_counts.clone().unwrap_or_default();
    GitCommit {
        commit_id: commit.commit_id.clone(),
        author: map_signature(commit.author.as_ref()),
        committer: map_signature(commit.committer.as_ref()),
        comment: commit.comment.clone().unwrap_or_default(),
        adds: counts.add,
        edits: counts.edit,
        deletes: counts.delete,
        changes: vec![],
        url: commit.remote_url.clone().or_else(|| commit.url.clone()),
    }
}

/// Folders show up in commit changes alongside files; only files are kept.
fn map_git_changes(changes: &[AzureGitChange]) -> Vec<GitChange> {
    changes
        .iter()
        .filter(|c| !c.item.is_folder && c.item.git_object_type.as_deref() != Some("tree"))
        .map(|c| GitChange {
            path: c.item.path.clone(),
            change_type: c.change_type.clone(),
        })
        .collect()
}

fn map_reviewer(reviewer: &AzureReviewer) -> Reviewer {
    Reviewer {
        id: reviewer.id.clone(),
        display_name: reviewer
            .display_name
            .clone()
            .or_else(|| reviewer.unique_name.clone())
            .unwrap_or_else(|| reviewer.id.clone()),
        unique_name: reviewer.unique_name.clone(),
        vote: reviewer.vote,
        is_required: reviewer.is_required,
    }
}

fn map_pull_request(pr: &AzurePullRequest) -> PullRequest {
    PullRequest {
        id: pr.pull_request_id,
        title: pr.title.clone().unwrap_or_default(),
        description: pr.description.clone(),
        status: pr.status.clone().unwrap_or_else(|| "unknown".to_string()),
        is_draft: pr.is_draft,
        created_by: map_identity(pr.created_by.as_ref()),
        creation_date: pr.creation_date.clone(),
        source_ref: pr.source_ref_name.clone().unwrap_or_default(),
        target_ref: pr.target_ref_name.clone().unwrap_or_default(),
        merge_status: pr.merge_status.clone(),
        repository: pr.repository.as_ref().and_then(|r| r.name.clone()),
        project_id: pr
            .repository
            .as_ref()
            .and_then(|r| r.project.as_ref())
            .and_then(|p| p.id.clone()),
        reviewers: pr.reviewers.iter().map(map_reviewer).collect(),
    }
}

fn map_policy_evaluation(evaluation: &AzurePolicyEvaluation) -> PolicyEvaluation {
    let configuration = evaluation.configuration.as_ref();
    PolicyEvaluation {
        evaluation_id: evaluation.evaluation_id.clone(),
        policy_type: configuration
            .and_then(|c| c.policy_type.as_ref())
            .and_then(|t| t.display_name.clone())
            .unwrap_or_else(|| "Unknown policy".to_string()),
        is_blocking: configuration.is_some_and(|c| c.is_blocking),
        is_enabled: configuration.is_some_and(|c| c.is_enabled),
        status: evaluation
            .status
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

/// Artifact id linking policy evaluations to a pull request.
fn policy_artifact_id(project_id: &str, pull_request_id: u64) -> String {
    format!(
        "vstfs:///CodeReview/CodeReviewId/{}/{}",
        project_id, pull_request_id
    )
}

// =============================================================================
// Trait implementations
// =============================================================================

#[async_trait]
impl ChangesetProvider for AzureDevOpsClient {
    async fn get_changeset(&self, id: u64) -> Result<Changeset> {
        let url = self.project_url(&format!("/tfvc/changesets/{}", id));
        let changeset: AzureChangeset = self.get(&url, &[]).await?;
        Ok(map_changeset(&changeset))
    }

    async fn get_changeset_changes(&self, id: u64) -> Result<Vec<ChangesetChange>> {
        let url = self.project_url(&format!("/tfvc/changesets/{}/changes", id));
        let changes: AzureList<AzureTfvcChange> = self.get(&url, &[]).await?;
        Ok(changes.value.iter().map(map_changeset_change).collect())
    }

    async fn get_changesets(&self, filter: ChangesetFilter) -> Result<Vec<Changeset>> {
        let url = self.project_url("/tfvc/changesets");
        let mut query = vec![];
        push_opt(&mut query, "searchCriteria.author", filter.author);
        push_opt(&mut query, "searchCriteria.fromId", filter.from_id);
        push_opt(&mut query, "searchCriteria.toId", filter.to_id);
        push_opt(&mut query, "$top", filter.top);

        let changesets: AzureList<AzureChangeset> = self.get(&url, &query).await?;
        Ok(changesets.value.iter().map(map_changeset).collect())
    }

    async fn get_item_content(&self, path: &str, changeset_id: u64) -> Result<String> {
        let url = self.project_url("/tfvc/items");
        let query = [
            ("path", path.to_string()),
            ("versionDescriptor.version", changeset_id.to_string()),
            ("versionDescriptor.versionType", "changeset".to_string()),
            ("includeContent", "true".to_string()),
        ];

        let item: AzureTfvcItem = self.get(&url, &query).await?;
        if item.is_folder {
            return Err(Error::InvalidData(format!("{} is a folder", item.path)));
        }
        Ok(item.content.unwrap_or_default())
    }
}

#[async_trait]
impl BuildProvider for AzureDevOpsClient {
    async fn get_build(&self, id: u64) -> Result<Build> {
        let url = self.project_url(&format!("/build/builds/{}", id));
        let build: AzureBuild = self.get(&url, &[]).await?;
        Ok(map_build(&build))
    }

    async fn get_builds(&self, filter: BuildFilter) -> Result<Vec<Build>> {
        let url = self.project_url("/build/builds");
        let mut query = vec![];
        push_opt(&mut query, "definitions", filter.definition_id);
        push_opt(&mut query, "$top", filter.top);
        push_opt(&mut query, "statusFilter", filter.status);

        let builds: AzureList<AzureBuild> = self.get(&url, &query).await?;
        Ok(builds.value.iter().map(map_build).collect())
    }

    async fn get_build_logs(&self, build_id: u64) -> Result<Vec<BuildLog>> {
        let url = self.project_url(&format!("/build/builds/{}/logs", build_id));
        let logs: AzureList<AzureBuildLog> = self.get(&url, &[]).await?;
        Ok(logs.value.iter().map(map_build_log).collect())
    }

    async fn get_build_log_content(&self, build_id: u64, log_id: u64) -> Result<String> {
        let url = self.project_url(&format!("/build/builds/{}/logs/{}", build_id, log_id));
        self.get_text(&url, &[]).await
    }

    async fn get_build_log_lines(
        &self,
        build_id: u64,
        log_id: u64,
        start_line: u64,
        end_line: u64,
    ) -> Result<String> {
        let url = self.project_url(&format!("/build/builds/{}/logs/{}", build_id, log_id));
        let query = [
            ("startLine", start_line.to_string()),
            ("endLine", end_line.to_string()),
        ];
        self.get_text(&url, &query).await
    }

    async fn get_build_timeline(&self, build_id: u64) -> Result<Vec<TimelineRecord>> {
        let url = self.project_url(&format!("/build/builds/{}/timeline", build_id));
        debug!(url = url.as_str(), "Azure DevOps GET (timeline) request");

        // Builds that have not started yet answer with 204 and no body.
        let response = self.send(self.request(reqwest::Method::GET, &url)).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let timeline: AzureTimeline = serde_json::from_str(&body)
            .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))?;
        Ok(timeline.records.iter().map(map_timeline_record).collect())
    }

    async fn get_pipelines(&self) -> Result<Vec<Pipeline>> {
        let url = self.project_url("/build/definitions");
        let definitions: AzureList<AzureBuildDefinition> = self.get(&url, &[]).await?;
        Ok(definitions.value.iter().map(map_pipeline).collect())
    }
}

#[async_trait]
impl GitProvider for AzureDevOpsClient {
    async fn get_repositories(&self) -> Result<Vec<GitRepository>> {
        let url = self.project_url("/git/repositories");
        let repositories: AzureList<AzureRepository> = self.get(&url, &[]).await?;
        Ok(repositories.value.iter().map(map_repository).collect())
    }

    async fn get_repository(&self, repository: &str) -> Result<GitRepository> {
        let url = self.repository_url(repository, &[])?;
        let repo: AzureRepository = self.get(&url, &[]).await?;
        Ok(map_repository(&repo))
    }

    async fn get_commits(&self, repository: &str, filter: CommitFilter) -> Result<Vec<GitCommit>> {
        let url = self.repository_url(repository, &["commits"])?;
        let mut query = vec![];
        if let Some(branch) = &filter.branch {
            query.push((
                "searchCriteria.itemVersion.version",
                short_branch_name(branch).to_string(),
            ));
            query.push((
                "searchCriteria.itemVersion.versionType",
                "branch".to_string(),
            ));
        }
        push_opt(&mut query, "searchCriteria.$top", filter.top);

        let commits: AzureList<AzureGitCommit> = self.get(&url, &query).await?;
        Ok(commits.value.iter().map(map_commit).collect())
    }

    async fn get_commit(&self, repository: &str, commit_id: &str) -> Result<GitCommit> {
        let commit_url = self.repository_url(repository, &["commits", commit_id])?;
        let changes_url = self.repository_url(repository, &["commits", commit_id, "changes"])?;

        let (commit, changes) = tokio::try_join!(
            self.get::<AzureGitCommit>(&commit_url, &[]),
            self.get::<AzureGitCommitChanges>(&changes_url, &[]),
        )?;

        let mut mapped = map_commit(&commit);
        if let Some(AzureChangeCounts { add, edit, delete }) = changes.change_counts {
            mapped.adds = add.or(mapped.adds);
            mapped.edits = edit.or(mapped.edits);
            mapped.deletes = delete.or(mapped.deletes);
        }
        mapped.changes = map_git_changes(&changes.changes);
        Ok(mapped)
    }
}

#[async_trait]
impl PullRequestProvider for AzureDevOpsClient {
    async fn get_pull_requests(
        &self,
        repository: &str,
        filter: PullRequestFilter,
    ) -> Result<Vec<PullRequest>> {
        let url = self.repository_url(repository, &["pullrequests"])?;
        let mut query = vec![(
            "searchCriteria.status",
            filter.status.unwrap_or_else(|| "active".to_string()),
        )];
        push_opt(
            &mut query,
            "searchCriteria.targetRefName",
            filter.target_branch.as_deref().map(normalize_branch_ref),
        );
        push_opt(&mut query, "searchCriteria.creatorId", filter.creator_id);
        push_opt(&mut query, "$top", filter.top);

        let prs: AzureList<AzurePullRequest> = self.get(&url, &query).await?;
        Ok(prs.value.iter().map(map_pull_request).collect())
    }

    async fn get_pull_request(&self, repository: &str, id: u64) -> Result<PullRequest> {
        let url = self.repository_url(repository, &["pullrequests", id.to_string().as_str()])?;
        let pr: AzurePullRequest = self.get(&url, &[]).await?;
        Ok(map_pull_request(&pr))
    }

    async fn create_pull_request(
        &self,
        repository: &str,
        input: CreatePullRequestInput,
    ) -> Result<PullRequest> {
        let url = self.repository_url(repository, &["pullrequests"])?;
        let request = CreatePullRequestRequest {
            source_ref_name: normalize_branch_ref(&input.source_branch),
            target_ref_name: normalize_branch_ref(&input.target_branch),
            title: input.title,
            description: input.description,
            reviewers: input
                .reviewer_ids
                .into_iter()
                .map(|id| ReviewerRefRequest { id })
                .collect(),
            is_draft: input.is_draft,
        };

        let pr: AzurePullRequest = self.post(&url, &request).await?;
        Ok(map_pull_request(&pr))
    }

    async fn vote_pull_request(
        &self,
        repository: &str,
        id: u64,
        reviewer_id: &str,
        vote: ReviewVote,
    ) -> Result<Reviewer> {
        let url = self.repository_url(
            repository,
            &["pullrequests", id.to_string().as_str(), "reviewers", reviewer_id],
        )?;
        let request = VoteRequest { vote: vote.value() };

        let reviewer: AzureReviewer = self.put(&url, &request).await?;
        Ok(map_reviewer(&reviewer))
    }

    async fn get_pull_request_policies(
        &self,
        repository: &str,
        id: u64,
    ) -> Result<Vec<PolicyEvaluation>> {
        let pr = self.get_pull_request(repository, id).await?;
        let project_id = pr.project_id.ok_or_else(|| {
            Error::InvalidData(format!("Pull request {} has no project reference", id))
        })?;

        let url = self.project_url("/policy/evaluations");
        let query = [("artifactId", policy_artifact_id(&project_id, id))];
        let evaluations: AzureList<AzurePolicyEvaluation> = self.get(&url, &query).await?;
        Ok(evaluations.value.iter().map(map_policy_evaluation).collect())
    }
}

#[async_trait]
impl Provider for AzureDevOpsClient {
    fn provider_name(&self) -> &'static str {
        "azure-devops"
    }

    async fn get_projects(&self) -> Result<Vec<Project>> {
        let url = self.org_url("/projects");
        let projects: AzureList<AzureProject> = self.get(&url, &[]).await?;
        Ok(projects.value.iter().map(map_project).collect())
    }
}
