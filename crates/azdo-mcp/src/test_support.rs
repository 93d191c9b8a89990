//! Mock provider shared by handler and server tests.

use async_trait::async_trait;
use azdo_core::{
    Build, BuildFilter, BuildLog, BuildProvider, Changeset, ChangesetChange, ChangesetFilter,
    ChangesetProvider, CommitFilter, CreatePullRequestInput, GitCommit, GitProvider,
    GitRepository, Pipeline, PolicyEvaluation, Project, Provider, PullRequest, PullRequestFilter,
    PullRequestProvider, Result, ReviewVote, Reviewer, TimelineRecord,
};
use mockall::mock;

mock! {
    pub DevOps {}

    #[async_trait]
    impl ChangesetProvider for DevOps {
        async fn get_changeset(&self, id: u64) -> Result<Changeset>;
        async fn get_changeset_changes(&self, id: u64) -> Result<Vec<ChangesetChange>>;
        async fn get_changesets(&self, filter: ChangesetFilter) -> Result<Vec<Changeset>>;
        async fn get_item_content(&self, path: &str, changeset_id: u64) -> Result<String>;
    }

    #[async_trait]
    impl BuildProvider for DevOps {
        async fn get_build(&self, id: u64) -> Result<Build>;
        async fn get_builds(&self, filter: BuildFilter) -> Result<Vec<Build>>;
        async fn get_build_logs(&self, build_id: u64) -> Result<Vec<BuildLog>>;
        async fn get_build_log_content(&self, build_id: u64, log_id: u64) -> Result<String>;
        async fn get_build_log_lines(
            &self,
            build_id: u64,
            log_id: u64,
            start_line: u64,
            end_line: u64,
        ) -> Result<String>;
        async fn get_build_timeline(&self, build_id: u64) -> Result<Vec<TimelineRecord>>;
        async fn get_pipelines(&self) -> Result<Vec<Pipeline>>;
    }

    #[async_trait]
    impl GitProvider for DevOps {
        async fn get_repositories(&self) -> Result<Vec<GitRepository>>;
        async fn get_repository(&self, repository: &str) -> Result<GitRepository>;
        async fn get_commits(&self, repository: &str, filter: CommitFilter) -> Result<Vec<GitCommit>>;
        async fn get_commit(&self, repository: &str, commit_id: &str) -> Result<GitCommit>;
    }

    #[async_trait]
    impl PullRequestProvider for DevOps {
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
        async fn vote_pull_request(
            &self,
            repository: &str,
            id: u64,
            reviewer_id: &str,
            vote: ReviewVote,
        ) -> Result<Reviewer>;
        async fn get_pull_request_policies(
            &self,
            repository: &str,
            id: u64,
        ) -> Result<Vec<PolicyEvaluation>>;
    }

    #[async_trait]
    impl Provider for DevOps {
        fn provider_name(&self) -> &'static str;
        async fn get_projects(&self) -> Result<Vec<Project>>;
    }
}
