//! Provider traits for DevOps backends.
//!
//! Each trait covers one resource family. `Provider` ties them together
//! and is what the tool layer holds as `Arc<dyn Provider>`.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Build, BuildFilter, BuildLog, Changeset, ChangesetChange, ChangesetFilter, CommitFilter,
    CreatePullRequestInput, GitCommit, GitRepository, Pipeline, PolicyEvaluation, Project,
    PullRequest, PullRequestFilter, Reviewer, ReviewVote, TimelineRecord,
};

/// TFVC changeset access.
#[async_trait]
pub trait ChangesetProvider: Send + Sync {
    /// Get a single changeset by ID.
    async fn get_changeset(&self, id: u64) -> Result<Changeset>;

    /// Get the file changes of a changeset.
    async fn get_changeset_changes(&self, id: u64) -> Result<Vec<ChangesetChange>>;

    /// List changesets matching the filter.
    async fn get_changesets(&self, filter: ChangesetFilter) -> Result<Vec<Changeset>>;

    /// Get the content of a file as of a changeset.
    ///
    /// Returns `Error::NotFound` when the item does not exist at that version.
    async fn get_item_content(&self, path: &str, changeset_id: u64) -> Result<String>;
}

/// Builds, logs, timelines and build definitions.
#[async_trait]
pub trait BuildProvider: Send + Sync {
    async fn get_build(&self, id: u64) -> Result<Build>;

    async fn get_builds(&self, filter: BuildFilter) -> Result<Vec<Build>>;

    /// Log metadata for a build (no content).
    async fn get_build_logs(&self, build_id: u64) -> Result<Vec<BuildLog>>;

    /// Full text of one build log.
    async fn get_build_log_content(&self, build_id: u64, log_id: u64) -> Result<String>;

    /// Lines `start_line..=end_line` (1-based) of one build log.
    async fn get_build_log_lines(
        &self,
        build_id: u64,
        log_id: u64,
        start_line: u64,
        end_line: u64,
    ) -> Result<String>;

    /// Timeline records (stages, jobs, tasks) of a build.
    async fn get_build_timeline(&self, build_id: u64) -> Result<Vec<TimelineRecord>>;

    /// Build definitions of the project.
    async fn get_pipelines(&self) -> Result<Vec<Pipeline>>;
}

/// Git repositories and commits.
#[async_trait]
pub trait GitProvider: Send + Sync {
    async fn get_repositories(&self) -> Result<Vec<GitRepository>>;

    /// Get a repository by ID or name.
    async fn get_repository(&self, repository: &str) -> Result<GitRepository>;

    async fn get_commits(&self, repository: &str, filter: CommitFilter) -> Result<Vec<GitCommit>>;

    /// Get one commit including its changed files.
    async fn get_commit(&self, repository: &str, commit_id: &str) -> Result<GitCommit>;
}

/// Pull request queries and mutations.
#[async_trait]
pub trait PullRequestProvider: Send + Sync {
    async fn get_pull_requests(
        &self,
        repository: &str,
        filter: PullRequestFilter,
    ) -> Result<Vec<PullRequest>>;

    async fn get_pull_request(&self, repository: &str, id: u64) -> Result<PullRequest>;

    async fn create_pull_request(
        &self,
        repository: &str,
        input: CreatePullRequestInput,
    ) -> Result<PullRequest>;

    /// Cast a reviewer vote. Returns the updated reviewer entry.
    async fn vote_pull_request(
        &self,
        repository: &str,
        id: u64,
        reviewer_id: &str,
        vote: ReviewVote,
    ) -> Result<Reviewer>;

    /// Branch policy evaluations for a pull request.
    async fn get_pull_request_policies(
        &self,
        repository: &str,
        id: u64,
    ) -> Result<Vec<PolicyEvaluation>>;
}

/// A complete DevOps backend.
#[async_trait]
pub trait Provider:
    ChangesetProvider + BuildProvider + GitProvider + PullRequestProvider
{
    /// Provider name used in logs (e.g. "azure-devops").
    fn provider_name(&self) -> &'static str;

    /// Projects visible in the organization.
    async fn get_projects(&self) -> Result<Vec<Project>>;
}
