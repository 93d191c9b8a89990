//! Pull request tools, including the mutating ones.
//!
//! Mutations are sent once. Nothing guards against a repeated call creating
//! a second pull request or re-casting a vote.

use azdo_core::{
    normalize_branch_ref, short_branch_name, CreatePullRequestInput, PullRequestFilter, ReviewVote,
};
use azdo_output::{markdown, render};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{
    parse_format, parse_params, require_text, NotFoundExt, ToolError, ToolHandler, ToolOutcome,
};

const PULL_REQUEST_STATUSES: [&str; 4] = ["active", "abandoned", "completed", "all"];

#[derive(Debug, Deserialize)]
struct PullRequestsParams {
    repository_id: String,
    status: Option<String>,
    target_branch: Option<String>,
    creator: Option<String>,
    top: Option<u32>,
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullRequestParams {
    repository_id: String,
    pull_request_id: u64,
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatePullRequestParams {
    repository_id: String,
    title: String,
    source_branch: String,
    target_branch: String,
    description: Option<String>,
    #[serde(default)]
    reviewers: Vec<String>,
    #[serde(default)]
    is_draft: bool,
}

#[derive(Debug, Deserialize)]
struct VoteParams {
    repository_id: String,
    pull_request_id: u64,
    reviewer_id: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ToolHandler {
    pub(super) async fn get_pull_requests(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: PullRequestsParams = parse_params(arguments)?;
        let format = parse_format(params.format.as_deref())?;
        let repository = require_text("repository_id", &params.repository_id)?;

        let status = non_blank(params.status).map(|s| s.to_ascii_lowercase());
        if let Some(status) = &status {
            if !PULL_REQUEST_STATUSES.contains(&status.as_str()) {
                return Err(ToolError::InvalidArguments(format!(
                    "Unknown status '{}'. Expected one of: {}",
                    status,
                    PULL_REQUEST_STATUSES.join(", ")
                )));
            }
        }

        let filter = PullRequestFilter {
            status,
            target_branch: non_blank(params.target_branch),
            creator_id: non_blank(params.creator),
            top: params.top,
        };

        let prs = self
            .provider
            .get_pull_requests(repository, filter)
            .await
            .not_found(|| format!("Repository {}", repository))?;

        Ok(render(prs.as_slice(), format, markdown::pull_requests_to_markdown)?)
    }

    pub(super) async fn get_pull_request_details(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: PullRequestParams = parse_params(arguments)?;
        let format = parse_format(params.format.as_deref())?;
        let repository = require_text("repository_id", &params.repository_id)?;
        let id = params.pull_request_id;

        let pr = self
            .provider
            .get_pull_request(repository, id)
            .await
            .not_found(|| format!("Pull request {}", id))?;

        Ok(render(&pr, format, markdown::pull_request_to_markdown)?)
    }

    pub(super) async fn get_pull_request_policies(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: PullRequestParams = parse_params(arguments)?;
        let format = parse_format(params.format.as_deref())?;
        let repository = require_text("repository_id", &params.repository_id)?;
        let id = params.pull_request_id;

        let policies = self
            .provider
            .get_pull_request_policies(repository, id)
            .await
            .not_found(|| format!("Pull request {}", id))?;

        Ok(render(policies.as_slice(), format, |policies| {
            markdown::policies_to_markdown(id, policies)
        })?)
    }

    pub(super) async fn create_pull_request(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: CreatePullRequestParams = parse_params(arguments)?;
        let repository = require_text("repository_id", &params.repository_id)?;
        let title = require_text("title", &params.title)?;
        let source = normalize_branch_ref(require_text("source_branch", &params.source_branch)?);
        let target = normalize_branch_ref(require_text("target_branch", &params.target_branch)?);

        if source == target {
            return Err(ToolError::InvalidArguments(format!(
                "source_branch and target_branch are both {}",
                short_branch_name(&source)
            )));
        }

        let input = CreatePullRequestInput {
            title: title.to_string(),
            description: non_blank(params.description),
            source_branch: source,
            target_branch: target,
            reviewer_ids: params
                .reviewers
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
            is_draft: params.is_draft,
        };

        let pr = self
            .provider
            .create_pull_request(repository, input)
            .await
            .not_found(|| format!("Repository {}", repository))?;

        info!(repository, pull_request = pr.id, "Pull request created");

        Ok(format!(
            "✅ Created pull request !{} in {}\n\n{}",
            pr.id,
            repository,
            markdown::pull_request_to_markdown(&pr)
        ))
    }

    pub(super) async fn approve_pull_request(&self, arguments: Option<Value>) -> ToolOutcome {
        self.vote(arguments, ReviewVote::Approve).await
    }

    pub(super) async fn reject_pull_request(&self, arguments: Option<Value>) -> ToolOutcome {
        self.vote(arguments, ReviewVote::Reject).await
    }

    pub(super) async fn request_pull_request_changes(&self, arguments: Option<Value>) -> ToolOutcome {
        self.vote(arguments, ReviewVote::WaitForAuthor).await
    }

    async fn vote(&self, arguments: Option<Value>, vote: ReviewVote) -> ToolOutcome {
        let params: VoteParams = parse_params(arguments)?;
        let repository = require_text("repository_id", &params.repository_id)?;
        let reviewer_id = require_text("reviewer_id", &params.reviewer_id)?;
        let id = params.pull_request_id;

        let reviewer = self
            .provider
            .vote_pull_request(repository, id, reviewer_id, vote)
            .await
            .not_found(|| format!("Pull request {}", id))?;

        info!(
            repository,
            pull_request = id,
            vote = vote.value(),
            "Vote recorded"
        );

        Ok(format!(
            "✅ Pull request !{} {} by {} (vote {})",
            id,
            ReviewVote::from_value(reviewer.vote).label(),
            reviewer.display_name,
            reviewer.vote
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use azdo_core::{Error, Identity, PolicyEvaluation, PullRequest, ReviewVote, Reviewer};
    use serde_json::json;

    use crate::handlers::ToolHandler;
    use crate::test_support::MockDevOps;
    use crate::tools::ToolRegistry;

    fn handler(mut mock: MockDevOps) -> ToolHandler {
        mock.expect_provider_name().return_const("mock");
        ToolHandler::new(Arc::new(mock), Arc::new(ToolRegistry::builtin()))
    }

    fn pull_request(id: u64) -> PullRequest {
        PullRequest {
            id,
            title: "Add retry to uploader".to_string(),
            description: Some("Retries transient failures".to_string()),
            status: "active".to_string(),
            is_draft: false,
            created_by: Some(Identity {
                id: Some("u1".to_string()),
                display_name: "Jane Doe".to_string(),
                unique_name: None,
            }),
            creation_date: None,
            source_ref: "refs/heads/feature/retry".to_string(),
            target_ref: "refs/heads/main".to_string(),
            merge_status: Some("succeeded".to_string()),
            repository: Some("web".to_string()),
            project_id: Some("p1".to_string()),
            reviewers: vec![],
        }
    }

    fn reviewer(vote: i32) -> Reviewer {
        Reviewer {
            id: "r1".to_string(),
            display_name: "Sam Reviewer".to_string(),
            unique_name: None,
            vote,
            is_required: true,
        }
    }

    #[tokio::test]
    async fn test_get_pull_requests_filter() {
        let mut mock = MockDevOps::new();
        mock.expect_get_pull_requests()
            .withf(|repo, filter| {
                repo == "web"
                    && filter.status.as_deref() == Some("completed")
                    && filter.target_branch.as_deref() == Some("main")
                    && filter.creator_id.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(vec![pull_request(1)]));

        let result = handler(mock)
            .execute(
                "get_pull_requests_tool",
                Some(json!({"repository_id": "web", "status": "Completed", "target_branch": "main"})),
            )
            .await;

        assert!(!result.is_error());
        assert!(result.text_content().contains("Add retry to uploader"));
    }

    #[tokio::test]
    async fn test_get_pull_requests_rejects_unknown_status() {
        let mut mock = MockDevOps::new();
        mock.expect_get_pull_requests().times(0);

        let result = handler(mock)
            .execute(
                "get_pull_requests_tool",
                Some(json!({"repository_id": "web", "status": "merged"})),
            )
            .await;
        assert!(result.is_error());
    }

    #[tokio::test]
    async fn test_get_pull_request_details_not_found() {
        let mut mock = MockDevOps::new();
        mock.expect_get_pull_request()
            .returning(|_, _| Err(Error::NotFound("TF401180".to_string())));

        let result = handler(mock)
            .execute(
                "get_pull_request_details_tool",
                Some(json!({"repository_id": "web", "pull_request_id": 404})),
            )
            .await;

        assert_eq!(result.is_error, None);
        assert_eq!(result.text_content(), "Pull request 404 not found.");
    }

    #[tokio::test]
    async fn test_create_pull_request_normalizes_branches() {
        let mut mock = MockDevOps::new();
        mock.expect_create_pull_request()
            .withf(|repo, input| {
                repo == "web"
                    && input.source_branch == "refs/heads/feature/retry"
                    && input.target_branch == "refs/heads/main"
                    && input.reviewer_ids == vec!["r1".to_string()]
                    && input.is_draft
                    && input.description.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(pull_request(12)));

        let result = handler(mock)
            .execute(
                "create_pull_request_tool",
                Some(json!({
                    "repository_id": "web",
                    "title": "Add retry to uploader",
                    "source_branch": "feature/retry",
                    "target_branch": "refs/heads/main",
                    "description": "  ",
                    "reviewers": ["r1", ""],
                    "is_draft": true
                })),
            )
            .await;

        assert!(!result.is_error());
        assert!(result.text_content().starts_with("✅ Created pull request !12"));
    }

    #[tokio::test]
    async fn test_create_pull_request_same_branches() {
        let mut mock = MockDevOps::new();
        mock.expect_create_pull_request().times(0);

        let result = handler(mock)
            .execute(
                "create_pull_request_tool",
                Some(json!({
                    "repository_id": "web",
                    "title": "Noop",
                    "source_branch": "main",
                    "target_branch": "refs/heads/main"
                })),
            )
            .await;

        assert!(result.is_error());
    }

    #[tokio::test]
    async fn test_create_pull_request_missing_title() {
        let mock = MockDevOps::new();
        let result = handler(mock)
            .execute(
                "create_pull_request_tool",
                Some(json!({
                    "repository_id": "web",
                    "source_branch": "a",
                    "target_branch": "b"
                })),
            )
            .await;

        assert!(result.is_error());
        assert!(result.text_content().contains("title"));
    }

    #[tokio::test]
    async fn test_vote_tools_send_expected_values() {
        let cases = [
            ("approve_pull_request_tool", ReviewVote::Approve, "approved"),
            ("reject_pull_request_tool", ReviewVote::Reject, "rejected"),
            (
                "request_pull_request_changes_tool",
                ReviewVote::WaitForAuthor,
                "waiting for author",
            ),
        ];

        for (tool, expected, label) in cases {
            let mut mock = MockDevOps::new();
            mock.expect_vote_pull_request()
                .withf(move |repo, id, reviewer_id, vote| {
                    repo == "web" && *id == 7 && reviewer_id == "r1" && *vote == expected
                })
                .times(1)
                .returning(|_, _, _, vote| Ok(reviewer(vote.value())));

            let result = handler(mock)
                .execute(
                    tool,
                    Some(json!({"repository_id": "web", "pull_request_id": 7, "reviewer_id": "r1"})),
                )
                .await;

            assert!(!result.is_error(), "{} failed", tool);
            let text = result.text_content();
            assert!(text.contains(label), "{}: {}", tool, text);
            assert!(text.contains(&expected.value().to_string()));
        }
    }

    #[tokio::test]
    async fn test_vote_auth_failure_is_error() {
        let mut mock = MockDevOps::new();
        mock.expect_vote_pull_request()
            .returning(|_, _, _, _| Err(Error::Auth("TF400813".to_string())));

        let result = handler(mock)
            .execute(
                "approve_pull_request_tool",
                Some(json!({"repository_id": "web", "pull_request_id": 7, "reviewer_id": "r1"})),
            )
            .await;

        assert!(result.is_error());
        assert!(result.text_content().contains("TF400813"));
    }

    #[tokio::test]
    async fn test_get_pull_request_policies() {
        let mut mock = MockDevOps::new();
        mock.expect_get_pull_request_policies()
            .withf(|repo, id| repo == "web" && *id == 7)
            .returning(|_, _| {
                Ok(vec![PolicyEvaluation {
                    evaluation_id: "e1".to_string(),
                    policy_type: "Minimum number of reviewers".to_string(),
                    is_blocking: true,
                    is_enabled: true,
                    status: "approved".to_string(),
                }])
            });

        let result = handler(mock)
            .execute(
                "get_pull_request_policies_tool",
                Some(json!({"repository_id": "web", "pull_request_id": 7})),
            )
            .await;

        assert!(result.text_content().contains("Minimum number of reviewers"));
    }
}
