//! Git repository and commit tools.

use azdo_core::CommitFilter;
use azdo_output::{markdown, render};
use serde::Deserialize;
use serde_json::Value;

use super::{
    parse_format, parse_params, require_text, FormatParams, NotFoundExt, ToolHandler, ToolOutcome,
};

#[derive(Debug, Deserialize)]
struct RepositoryParams {
    repository_id: String,
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitsParams {
    repository_id: String,
    branch: Option<String>,
    top: Option<u32>,
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitParams {
    repository_id: String,
    commit_id: String,
    format: Option<String>,
}

impl ToolHandler {
    pub(super) async fn get_git_repositories(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: FormatParams = parse_params(arguments)?;
        let format = params.format()?;

        let repositories = self.provider.get_repositories().await?;
        Ok(render(
            repositories.as_slice(),
            format,
            markdown::repositories_to_markdown,
        )?)
    }

    pub(super) async fn get_git_repository(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: RepositoryParams = parse_params(arguments)?;
        let format = parse_format(params.format.as_deref())?;
        let repository = require_text("repository_id", &params.repository_id)?;

        let found = self
            .provider
            .get_repository(repository)
            .await
            .not_found(|| format!("Repository {}", repository))?;

        Ok(render(&found, format, markdown::repository_to_markdown)?)
    }

    pub(super) async fn get_git_commits(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: CommitsParams = parse_params(arguments)?;
        let format = parse_format(params.format.as_deref())?;
        let repository = require_text("repository_id", &params.repository_id)?;

        let filter = CommitFilter {
            branch: params
                .branch
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty()),
            top: params.top,
        };

        let commits = self
            .provider
            .get_commits(repository, filter)
            .await
            .not_found(|| format!("Repository {}", repository))?;

        Ok(render(commits.as_slice(), format, markdown::commits_to_markdown)?)
    }

    pub(super) async fn get_git_commit_details(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: CommitParams = parse_params(arguments)?;
        let format = parse_format(params.format.as_deref())?;
        let repository = require_text("repository_id", &params.repository_id)?;
        let commit_id = require_text("commit_id", &params.commit_id)?;

        let commit = self
            .provider
            .get_commit(repository, commit_id)
            .await
            .not_found(|| format!("Commit {} in repository {}", commit_id, repository))?;

        Ok(render(&commit, format, markdown::commit_to_markdown)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use azdo_core::{Error, GitChange, GitCommit, GitRepository, GitSignature};
    use serde_json::json;

    use crate::handlers::ToolHandler;
    use crate::test_support::MockDevOps;
    use crate::tools::ToolRegistry;

    fn handler(mut mock: MockDevOps) -> ToolHandler {
        mock.expect_provider_name().return_const("mock");
        ToolHandler::new(Arc::new(mock), Arc::new(ToolRegistry::builtin()))
    }

    fn repository(name: &str) -> GitRepository {
        GitRepository {
            id: format!("{}-id", name),
            name: name.to_string(),
            default_branch: Some("refs/heads/main".to_string()),
            size: Some(1024),
            remote_url: Some(format!("https://dev.azure.com/contoso/Fabrikam/_git/{}", name)),
            web_url: None,
            project: Some("Fabrikam".to_string()),
        }
    }

    fn commit(sha: &str) -> GitCommit {
        GitCommit {
            commit_id: sha.to_string(),
            author: Some(GitSignature {
                name: "Jane Doe".to_string(),
                email: Some("jane@contoso.com".to_string()),
                date: Some("2024-03-01T10:00:00Z".to_string()),
            }),
            committer: None,
            comment: "Add retry to uploader\n\nLonger body".to_string(),
            adds: Some(1),
            edits: Some(2),
            deletes: Some(0),
            changes: vec![],
            url: None,
        }
    }

    #[tokio::test]
    async fn test_get_git_repositories() {
        let mut mock = MockDevOps::new();
        mock.expect_get_repositories()
            .times(1)
            .returning(|| Ok(vec![repository("web"), repository("api")]));

        let result = handler(mock).execute("get_git_repositories_tool", None).await;
        let text = result.text_content();
        assert!(text.contains("web"));
        assert!(text.contains("api"));
    }

    #[tokio::test]
    async fn test_get_git_repository_not_found() {
        let mut mock = MockDevOps::new();
        mock.expect_get_repository()
            .withf(|repo| repo == "ghost")
            .returning(|_| Err(Error::NotFound("TF401019".to_string())));

        let result = handler(mock)
            .execute(
                "get_git_repository_tool",
                Some(json!({"repository_id": "ghost"})),
            )
            .await;

        assert_eq!(result.is_error, None);
        assert_eq!(result.text_content(), "Repository ghost not found.");
    }

    #[tokio::test]
    async fn test_get_git_commits_passes_branch() {
        let mut mock = MockDevOps::new();
        mock.expect_get_commits()
            .withf(|repo, filter| {
                repo == "web" && filter.branch.as_deref() == Some("develop") && filter.top == Some(3)
            })
            .times(1)
            .returning(|_, _| Ok(vec![commit("0123456789abcdef")]));

        let result = handler(mock)
            .execute(
                "get_git_commits_tool",
                Some(json!({"repository_id": "web", "branch": "develop", "top": 3})),
            )
            .await;

        let text = result.text_content();
        assert!(text.contains("01234567"));
        assert!(text.contains("Add retry to uploader"));
    }

    #[tokio::test]
    async fn test_get_git_commit_details() {
        let mut mock = MockDevOps::new();
        mock.expect_get_commit()
            .withf(|repo, sha| repo == "web" && sha == "abc")
            .returning(|_, sha| {
                let mut commit = commit(sha);
                commit.changes = vec![GitChange {
                    path: "/src/upload.rs".to_string(),
                    change_type: "edit".to_string(),
                }];
                Ok(commit)
            });

        let result = handler(mock)
            .execute(
                "get_git_commit_details_tool",
                Some(json!({"repository_id": "web", "commit_id": "abc"})),
            )
            .await;

        let text = result.text_content();
        assert!(text.contains("# Commit abc"));
        assert!(text.contains("/src/upload.rs"));
    }

    #[tokio::test]
    async fn test_get_git_commit_requires_repository() {
        let mut mock = MockDevOps::new();
        mock.expect_get_commit().times(0);

        let result = handler(mock)
            .execute(
                "get_git_commit_details_tool",
                Some(json!({"commit_id": "abc"})),
            )
            .await;

        assert!(result.is_error());
        assert!(result.text_content().contains("repository_id"));
    }
}
