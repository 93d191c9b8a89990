//! Build, pipeline and build-diagnostic tools.

use azdo_core::{BuildFilter, BuildLog, Error, TimelineRecord};
use azdo_output::{head_lines, markdown, render, tail_lines, to_json, LogTail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    parse_format, parse_params, FormatParams, NotFoundExt, ToolError, ToolHandler, ToolOutcome,
};

/// Builds returned by `get_builds_tool` when `top` is omitted.
const DEFAULT_BUILDS_TOP: u32 = 50;

#[derive(Debug, Deserialize)]
struct BuildParams {
    build_id: u64,
    format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BuildsParams {
    definition_id: Option<u64>,
    top: Option<u32>,
    status_filter: Option<String>,
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BuildIdParams {
    build_id: u64,
}

#[derive(Debug, Deserialize)]
struct BuildLogParams {
    build_id: u64,
    log_id: u64,
}

#[derive(Debug, Deserialize)]
struct FailedTasksParams {
    build_id: u64,
    tail_lines: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildLogsReport<'a> {
    build_id: u64,
    total_logs: usize,
    logs: Vec<LogPreview<'a>>,
}

#[derive(Serialize)]
struct LogPreview<'a> {
    #[serde(flatten)]
    log: &'a BuildLog,
    preview: Vec<String>,
}

impl ToolHandler {
    pub(super) async fn get_build(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: BuildParams = parse_params(arguments)?;
        let format = parse_format(params.format.as_deref())?;

        let build = self
            .provider
            .get_build(params.build_id)
            .await
            .not_found(|| format!("Build {}", params.build_id))?;

        Ok(render(&build, format, markdown::build_to_markdown)?)
    }

    pub(super) async fn get_builds(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: BuildsParams = parse_params(arguments)?;
        let format = parse_format(params.format.as_deref())?;

        let filter = BuildFilter {
            definition_id: params.definition_id,
            top: Some(params.top.unwrap_or(DEFAULT_BUILDS_TOP)),
            status: params
                .status_filter
                .filter(|s| !s.trim().is_empty() && !s.eq_ignore_ascii_case("all")),
        };

        let builds = self.provider.get_builds(filter).await?;
        Ok(render(builds.as_slice(), format, markdown::builds_to_markdown)?)
    }

    /// Log metadata plus the first lines of every log, as JSON.
    pub(super) async fn get_build_logs(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: BuildIdParams = parse_params(arguments)?;
        let build_id = params.build_id;

        let logs = self
            .provider
            .get_build_logs(build_id)
            .await
            .not_found(|| format!("Build {}", build_id))?;

        let mut previews = Vec::with_capacity(logs.len());
        for log in &logs {
            let preview = match self.log_preview(build_id, log.id).await {
                Ok(content) => head_lines(&content, self.output.log_preview_lines)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                Err(e) => {
                    warn!(build_id, log_id = log.id, "Failed to fetch log preview: {}", e);
                    Vec::new()
                }
            };
            previews.push(LogPreview { log, preview });
        }

        let report = BuildLogsReport {
            build_id,
            total_logs: logs.len(),
            logs: previews,
        };
        Ok(to_json(&report)?)
    }

    /// First `log_preview_lines` lines of a log, fetched as a line range.
    async fn log_preview(&self, build_id: u64, log_id: u64) -> azdo_core::Result<String> {
        let lines = self.output.log_preview_lines as u64;
        if lines == 0 {
            return Ok(String::new());
        }
        self.provider
            .get_build_log_lines(build_id, log_id, 1, lines)
            .await
    }

    pub(super) async fn get_build_log_full_content(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: BuildLogParams = parse_params(arguments)?;

        let content = self
            .provider
            .get_build_log_content(params.build_id, params.log_id)
            .await
            .not_found(|| format!("Log {} of build {}", params.log_id, params.build_id))?;

        if content.trim().is_empty() {
            return Ok(format!(
                "Log {} of build {} is empty.",
                params.log_id, params.build_id
            ));
        }
        Ok(content)
    }

    /// Report every failed task of a build with its issues and log tail.
    ///
    /// One timeline call, then one log call per failed task that has a log.
    pub(super) async fn get_failed_tasks_with_logs(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: FailedTasksParams = parse_params(arguments)?;
        let build_id = params.build_id;
        let tail = params
            .tail_lines
            .unwrap_or(self.output.failed_log_tail_lines);
        if tail == 0 {
            return Err(ToolError::InvalidArguments(
                "tail_lines must be at least 1".to_string(),
            ));
        }

        let timeline = self
            .provider
            .get_build_timeline(build_id)
            .await
            .not_found(|| format!("Build {}", build_id))?;

        let failed: Vec<&TimelineRecord> =
            timeline.iter().filter(|r| r.is_failed_task()).collect();
        debug!(
            build_id,
            records = timeline.len(),
            failed = failed.len(),
            "Scanned build timeline"
        );

        if failed.is_empty() {
            return Ok(format!("Build {} has no failed tasks.", build_id));
        }

        let mut output = format!("# Failed tasks in build {} ({})\n\n", build_id, failed.len());
        for record in failed {
            let log = self.failed_task_log(build_id, record, tail).await?;
            output.push_str(&markdown::failed_task_to_markdown(record, log.as_ref()));
            output.push('\n');
        }

        Ok(output.trim_end().to_string())
    }

    async fn failed_task_log(
        &self,
        build_id: u64,
        record: &TimelineRecord,
        tail: usize,
    ) -> Result<Option<LogTail>, ToolError> {
        let Some(log_id) = record.log_id else {
            return Ok(None);
        };

        match self.provider.get_build_log_content(build_id, log_id).await {
            Ok(content) => Ok(Some(tail_lines(&content, tail))),
            Err(Error::NotFound(_)) => {
                debug!(build_id, log_id, task = %record.name, "Task log is gone");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub(super) async fn get_build_pipelines(&self, arguments: Option<Value>) -> ToolOutcome {
        let params: FormatParams = parse_params(arguments)?;
        let format = params.format()?;

        let pipelines = self.provider.get_pipelines().await?;
        Ok(render(
            pipelines.as_slice(),
            format,
            markdown::pipelines_to_markdown,
        )?)
    }
}
