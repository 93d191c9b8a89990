//! Markdown rendering of Azure DevOps resources.
//!
//! Markdown is the default tool output: it reads well for an agent and
//! costs far fewer tokens than the equivalent JSON.

use azdo_core::{
    short_branch_name, Build, Changeset, ChangesetChange, GitCommit, GitRepository, Pipeline,
    PolicyEvaluation, Project, PullRequest, ReviewVote, Reviewer, TimelineRecord,
};

use crate::truncation::{truncate_string, LogTail};

/// Maximum length of a description or comment shown inline.
const MAX_TEXT_LEN: usize = 500;

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

/// First line of a comment, for list rows.
fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

// ============================================================================
// Changesets
// ============================================================================

pub fn changeset_to_markdown(changeset: &Changeset) -> String {
    let mut output = format!("# Changeset {}\n\n", changeset.id);

    output.push_str(&format!("**Author:** {}\n", changeset.author.label()));
    if let Some(checked_in_by) = &changeset.checked_in_by {
        if checked_in_by.display_name != changeset.author.display_name {
            output.push_str(&format!("**Checked in by:** {}\n", checked_in_by.label()));
        }
    }
    output.push_str(&format!(
        "**Date:** {}\n",
        or_dash(changeset.created_date.as_deref())
    ));

    if let Some(comment) = changeset.comment.as_deref().filter(|c| !c.is_empty()) {
        output.push_str(&format!(
            "\n## Comment\n\n{}\n",
            truncate_string(comment, MAX_TEXT_LEN)
        ));
    }

    if !changeset.changes.is_empty() {
        output.push('\n');
        output.push_str(&changes_table(&changeset.changes));
    }

    output
}

pub fn changesets_to_markdown(changesets: &[Changeset]) -> String {
    if changesets.is_empty() {
        return "No changesets found.".to_string();
    }

    let mut output = format!("# Changesets ({})\n\n", changesets.len());
    output.push_str("| ID | Author | Date | Comment |\n|----|--------|------|---------|\n");
    for changeset in changesets {
        output.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            changeset.id,
            changeset.author.display_name,
            or_dash(changeset.created_date.as_deref()),
            escape_cell(first_line(changeset.comment.as_deref().unwrap_or("")))
        ));
    }
    output
}

pub fn changeset_changes_to_markdown(changeset_id: u64, changes: &[ChangesetChange]) -> String {
    if changes.is_empty() {
        return format!("Changeset {} has no file changes.", changeset_id);
    }

    format!(
        "# Changes in changeset {} ({} files)\n\n{}",
        changeset_id,
        changes.len(),
        changes_table(changes)
    )
}

fn changes_table(changes: &[ChangesetChange]) -> String {
    let mut output = String::from("| Change | Path |\n|--------|------|\n");
    for change in changes {
        output.push_str(&format!("| {} | `{}` |\n", change.change_type, change.path));
    }
    output
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

// ============================================================================
// Builds
// ============================================================================

fn build_outcome(build: &Build) -> String {
    match &build.result {
        Some(result) => format!("{} ({})", build.status, result),
        None => build.status.clone(),
    }
}

pub fn build_to_markdown(build: &Build) -> String {
    let mut output = format!("# Build {} (#{})\n\n", build.build_number, build.id);

    if let Some(definition) = &build.definition {
        output.push_str(&format!(
            "**Pipeline:** {} (id {})\n",
            definition.name, definition.id
        ));
    }
    output.push_str(&format!("**Status:** {}\n", build_outcome(build)));
    if let Some(branch) = &build.source_branch {
        output.push_str(&format!("**Branch:** {}\n", short_branch_name(branch)));
    }
    if let Some(version) = &build.source_version {
        output.push_str(&format!("**Source version:** {}\n", version));
    }
    if let Some(requested_for) = &build.requested_for {
        output.push_str(&format!("**Requested for:** {}\n", requested_for.label()));
    }
    if let Some(reason) = &build.reason {
        output.push_str(&format!("**Reason:** {}\n", reason));
    }
    output.push_str(&format!(
        "**Queued:** {} | **Started:** {} | **Finished:** {}\n",
        or_dash(build.queue_time.as_deref()),
        or_dash(build.start_time.as_deref()),
        or_dash(build.finish_time.as_deref())
    ));
    if let Some(url) = &build.url {
        output.push_str(&format!("\n🔗 {}\n", url));
    }

    output
}

pub fn builds_to_markdown(builds: &[Build]) -> String {
    if builds.is_empty() {
        return "No builds found.".to_string();
    }

    let mut output = format!("# Builds ({})\n\n", builds.len());
    output.push_str(
        "| ID | Number | Pipeline | Status | Branch | Finished |\n|----|--------|----------|--------|--------|----------|\n",
    );
    for build in builds {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            build.id,
            build.build_number,
            build
                .definition
                .as_ref()
                .map(|d| d.name.as_str())
                .unwrap_or("-"),
            build_outcome(build),
            build
                .source_branch
                .as_deref()
                .map(short_branch_name)
                .unwrap_or("-"),
            or_dash(build.finish_time.as_deref())
        ));
    }
    output
}

/// One section of the failed-task diagnostic report.
pub fn failed_task_to_markdown(record: &TimelineRecord, log: Option<&LogTail>) -> String {
    let mut output = format!("## ❌ {}\n\n", record.name);

    output.push_str(&format!(
        "**Result:** {} | **Errors:** {} | **Warnings:** {}",
        or_dash(record.result.as_deref()),
        record.error_count,
        record.warning_count
    ));
    if let Some(log_id) = record.log_id {
        output.push_str(&format!(" | **Log:** {}", log_id));
    }
    output.push('\n');

    if !record.issues.is_empty() {
        output.push_str("\n**Issues:**\n");
        for issue in &record.issues {
            output.push_str(&format!("- [{}] {}\n", issue.issue_type, issue.message));
        }
    }

    match log {
        Some(tail) => {
            output.push('\n');
            if tail.omitted_lines > 0 {
                output.push_str(&format!(
                    "_Last lines of the log ({} earlier lines omitted):_\n\n",
                    tail.omitted_lines
                ));
            }
            output.push_str(&format!("```\n{}\n```\n", tail.text));
        }
        None => output.push_str("\n_No log available for this task._\n"),
    }

    output
}

// ============================================================================
// Pipelines and projects
// ============================================================================

pub fn pipelines_to_markdown(pipelines: &[Pipeline]) -> String {
    if pipelines.is_empty() {
        return "No build pipelines found.".to_string();
    }

    let mut output = format!("# Build pipelines ({})\n\n", pipelines.len());
    output.push_str("| ID | Name | Path | Queue status | Revision |\n|----|------|------|--------------|----------|\n");
    for pipeline in pipelines {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            pipeline.id,
            pipeline.name,
            or_dash(pipeline.path.as_deref()),
            or_dash(pipeline.queue_status.as_deref()),
            pipeline
                .revision
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
    }
    output
}

pub fn projects_to_markdown(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found.".to_string();
    }

    let mut output = format!("# Projects ({})\n\n", projects.len());
    for project in projects {
        output.push_str(&format!("## {}\n\n", project.name));
        output.push_str(&format!(
            "**ID:** {} | **State:** {} | **Visibility:** {}\n",
            project.id,
            or_dash(project.state.as_deref()),
            or_dash(project.visibility.as_deref())
        ));
        if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(&format!("\n{}\n", truncate_string(description, 200)));
        }
        output.push('\n');
    }
    output
}

// ============================================================================
// Git
// ============================================================================

pub fn repository_to_markdown(repository: &GitRepository) -> String {
    let mut output = format!("# Repository {}\n\n", repository.name);

    output.push_str(&format!("**ID:** {}\n", repository.id));
    if let Some(project) = &repository.project {
        output.push_str(&format!("**Project:** {}\n", project));
    }
    output.push_str(&format!(
        "**Default branch:** {}\n",
        repository
            .default_branch
            .as_deref()
            .map(short_branch_name)
            .unwrap_or("-")
    ));
    if let Some(size) = repository.size {
        output.push_str(&format!("**Size:** {} bytes\n", size));
    }
    if let Some(remote_url) = &repository.remote_url {
        output.push_str(&format!("**Clone URL:** {}\n", remote_url));
    }
    if let Some(web_url) = &repository.web_url {
        output.push_str(&format!("\n🔗 {}\n", web_url));
    }

    output
}

pub fn repositories_to_markdown(repositories: &[GitRepository]) -> String {
    if repositories.is_empty() {
        return "No git repositories found.".to_string();
    }

    let mut output = format!("# Git repositories ({})\n\n", repositories.len());
    output.push_str("| Name | ID | Default branch |\n|------|----|----------------|\n");
    for repository in repositories {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            repository.name,
            repository.id,
            repository
                .default_branch
                .as_deref()
                .map(short_branch_name)
                .unwrap_or("-")
        ));
    }
    output
}

fn short_sha(sha: &str) -> &str {
    sha.get(..8).unwrap_or(sha)
}

pub fn commits_to_markdown(commits: &[GitCommit]) -> String {
    if commits.is_empty() {
        return "No commits found.".to_string();
    }

    let mut output = format!("# Commits ({})\n\n", commits.len());
    output.push_str("| Commit | Author | Date | Message |\n|--------|--------|------|---------|\n");
    for commit in commits {
        let author = commit.author.as_ref();
        output.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            short_sha(&commit.commit_id),
            author.map(|a| a.name.as_str()).unwrap_or("-"),
            or_dash(author.and_then(|a| a.date.as_deref())),
            escape_cell(first_line(&commit.comment))
        ));
    }
    output
}

pub fn commit_to_markdown(commit: &GitCommit) -> String {
    let mut output = format!("# Commit {}\n\n", commit.commit_id);

    if let Some(author) = &commit.author {
        output.push_str(&format!(
            "**Author:** {}{} on {}\n",
            author.name,
            author
                .email
                .as_deref()
                .map(|e| format!(" <{}>", e))
                .unwrap_or_default(),
            or_dash(author.date.as_deref())
        ));
    }
    if let Some(committer) = &commit.committer {
        output.push_str(&format!(
            "**Committer:** {} on {}\n",
            committer.name,
            or_dash(committer.date.as_deref())
        ));
    }
    output.push_str(&format!(
        "**Changes:** {} added, {} edited, {} deleted\n",
        commit.adds.unwrap_or(0),
        commit.edits.unwrap_or(0),
        commit.deletes.unwrap_or(0)
    ));

    output.push_str(&format!(
        "\n## Message\n\n{}\n",
        truncate_string(&commit.comment, MAX_TEXT_LEN)
    ));

    if !commit.changes.is_empty() {
        output.push_str("\n## Files\n\n| Change | Path |\n|--------|------|\n");
        for change in &commit.changes {
            output.push_str(&format!("| {} | `{}` |\n", change.change_type, change.path));
        }
    }

    if let Some(url) = &commit.url {
        output.push_str(&format!("\n🔗 {}\n", url));
    }

    output
}

// ============================================================================
// Pull requests
// ============================================================================

fn reviewer_line(reviewer: &Reviewer) -> String {
    format!(
        "- {}{}: {}\n",
        reviewer.display_name,
        if reviewer.is_required { " (required)" } else { "" },
        ReviewVote::from_value(reviewer.vote).label()
    )
}

fn pull_request_state(pr: &PullRequest) -> String {
    if pr.is_draft {
        format!("{} (draft)", pr.status)
    } else {
        pr.status.clone()
    }
}

pub fn pull_requests_to_markdown(prs: &[PullRequest]) -> String {
    if prs.is_empty() {
        return "No pull requests found.".to_string();
    }

    let mut output = format!("# Pull requests ({})\n\n", prs.len());
    for pr in prs {
        output.push_str(&format!("## !{} - {}\n\n", pr.id, pr.title));
        output.push_str(&format!(
            "**Status:** {} | **Branches:** {} → {}",
            pull_request_state(pr),
            short_branch_name(&pr.source_ref),
            short_branch_name(&pr.target_ref)
        ));
        if let Some(created_by) = &pr.created_by {
            output.push_str(&format!(" | **Author:** {}", created_by.display_name));
        }
        output.push_str("\n\n");
    }
    output
}

pub fn pull_request_to_markdown(pr: &PullRequest) -> String {
    let mut output = format!("# Pull request !{} - {}\n\n", pr.id, pr.title);

    output.push_str(&format!("**Status:** {}\n", pull_request_state(pr)));
    if let Some(repository) = &pr.repository {
        output.push_str(&format!("**Repository:** {}\n", repository));
    }
    output.push_str(&format!(
        "**Branches:** {} → {}\n",
        short_branch_name(&pr.source_ref),
        short_branch_name(&pr.target_ref)
    ));
    if let Some(created_by) = &pr.created_by {
        output.push_str(&format!("**Author:** {}\n", created_by.label()));
    }
    if let Some(created) = &pr.creation_date {
        output.push_str(&format!("**Created:** {}\n", created));
    }
    if let Some(merge_status) = &pr.merge_status {
        output.push_str(&format!("**Merge status:** {}\n", merge_status));
    }

    if !pr.reviewers.is_empty() {
        output.push_str("\n## Reviewers\n\n");
        for reviewer in &pr.reviewers {
            output.push_str(&reviewer_line(reviewer));
        }
    }

    if let Some(description) = pr.description.as_deref().filter(|d| !d.is_empty()) {
        output.push_str(&format!(
            "\n## Description\n\n{}\n",
            truncate_string(description, MAX_TEXT_LEN)
        ));
    }

    output
}

pub fn policies_to_markdown(pull_request_id: u64, policies: &[PolicyEvaluation]) -> String {
    if policies.is_empty() {
        return format!("No policies apply to pull request {}.", pull_request_id);
    }

    let mut output = format!("# Policies for pull request !{}\n\n", pull_request_id);
    output.push_str("| Policy | Status | Blocking | Enabled |\n|--------|--------|----------|---------|\n");
    for policy in policies {
        output.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            policy.policy_type,
            policy.status,
            if policy.is_blocking { "yes" } else { "no" },
            if policy.is_enabled { "yes" } else { "no" }
        ));
    }
    output
}
