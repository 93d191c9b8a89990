//! TFVC changeset tools.

use azdo_core::{ChangesetFilter, Error};
use azdo_output::{markdown, render, truncate_diff, unified_diff};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{
    parse_format, parse_params, require_text, NotFoundExt, ToolError, ToolHandler, ToolOutcome,
};

#[derive(Debug, Deserialize)]
struct ChangesetParams {
    changeset_id: u64,
    format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChangesetListParams {
    author: Option<String>,
    from_changeset_id: Option<u64>,
    to_changeset_id: Option<u64>,
    top: Option<u32>,
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileDiffParams {
    file_path: String,
    changeset_id: u64,
}

impl ToolHandler {
    pub(super) async fn get_changeset(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: ChangesetParams = parse_params(arguments)?;
        let format = parse_format(params.format.as_deref())?;

        let changeset = self
            .provider
            .get_changeset(params.changeset_id)
            .await
            .not_found(|| format!("Changeset {}", params.changeset_id))?;

        Ok(render(&changeset, format, markdown::changeset_to_markdown)?)
    }

    pub(super) async fn get_changeset_changes(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: ChangesetParams = parse_params(arguments)?;
        let format = parse_format(params.format.as_deref())?;
        let id = params.changeset_id;

        let changes = self
            .provider
            .get_changeset_changes(id)
            .await
            .not_found(|| format!("Changeset {}", id))?;

        Ok(render(changes.as_slice(), format, |changes| {
            markdown::changeset_changes_to_markdown(id, changes)
        })?)
    }

    pub(super) async fn get_changeset_list(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: ChangesetListParams = parse_params(arguments)?;
        let format = parse_format(params.format.as_deref())?;

        if let (Some(from), Some(to)) = (params.from_changeset_id, params.to_changeset_id) {
            if from > to {
                return Err(ToolError::InvalidArguments(format!(
                    "from_changeset_id ({}) is greater than to_changeset_id ({})",
                    from, to
                )));
            }
        }

        let filter = ChangesetFilter {
            author: params
                .author
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
            from_id: params.from_changeset_id,
            to_id: params.to_changeset_id,
            top: params.top,
        };

        let changesets = self.provider.get_changesets(filter).await?;
        Ok(render(
            changesets.as_slice(),
            format,
            markdown::changesets_to_markdown,
        )?)
    }

    /// Diff a file between `changeset_id - 1` and `changeset_id`.
    ///
    /// Both versions are fetched concurrently. A file missing at the earlier
    /// version was added; missing at the later version it was deleted.
    pub(super) async fn get_file_diff(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: FileDiffParams = parse_params(arguments)?;
        let path = require_text("file_path", &params.file_path)?;
        let id = params.changeset_id;
        if id == 0 {
            return Err(ToolError::InvalidArguments(
                "changeset_id must be at least 1".to_string(),
            ));
        }

        let previous = async {
            if id == 1 {
                return Ok(None);
            }
            optional(self.provider.get_item_content(path, id - 1).await)
        };
        let current = async { optional(self.provider.get_item_content(path, id).await) };
        let (previous, current) = tokio::try_join!(previous, current)?;

        debug!(
            path,
            changeset = id,
            has_previous = previous.is_some(),
            has_current = current.is_some(),
            "Fetched file versions"
        );

        let (old, new, old_label, new_label, kind) = match (previous, current) {
            (None, None) if id == 1 => {
                return Err(ToolError::NotFound(format!(
                    "File {} not found at changeset 1.",
                    path
                )))
            }
            (None, None) => {
                return Err(ToolError::NotFound(format!(
                    "File {} not found at changeset {} or {}.",
                    path,
                    id,
                    id - 1
                )))
            }
            (None, Some(new)) => (
                String::new(),
                new,
                "/dev/null".to_string(),
                format!("{}@{}", path, id),
                "added",
            ),
            (Some(old), None) => (
                old,
                String::new(),
                format!("{}@{}", path, id - 1),
                "/dev/null".to_string(),
                "deleted",
            ),
            (Some(old), Some(new)) => (
                old,
                new,
                format!("{}@{}", path, id - 1),
                format!("{}@{}", path, id),
                "edited",
            ),
        };

        let diff = unified_diff(&old, &new, &old_label, &new_label);
        if diff.is_empty() {
            return Ok(format!(
                "No content changes in {} between changeset {} and {}.",
                path,
                id - 1,
                id
            ));
        }

        Ok(format!(
            "# Diff of {} in changeset {}\n\n**Change:** {} | **+{}** / **-{}** lines\n\n```diff\n{}\n```\n",
            path,
            id,
            kind,
            diff.additions,
            diff.deletions,
            truncate_diff(diff.unified.trim_end(), self.output.max_diff_chars)
        ))
    }
}

/// Treat a missing item as `None`, keep other errors.
fn optional(result: azdo_core::Result<String>) -> azdo_core::Result<Option<String>> {
    match result {
        Ok(content) => Ok(Some(content)),
        Err(Error::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
