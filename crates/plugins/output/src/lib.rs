//! Output shaping for tool results.
//!
//! - **Markdown**: compact, readable rendering of Azure DevOps resources
//! - **Truncation**: size limits that keep the useful head/tail of long text
//! - **Diff**: unified diffs between two file versions
//!
//! # Example
//!
//! ```ignore
//! use azdo_output::{render, markdown, OutputFormat};
//!
//! let format = OutputFormat::parse(Some("json"))?;
//! let text = render(&builds, format, markdown::builds_to_markdown)?;
//! ```

pub mod diff;
pub mod markdown;
pub mod truncation;

use std::fmt;
use std::str::FromStr;

use azdo_core::{Error, Result};
use serde::Serialize;

pub use diff::{unified_diff, FileDiff};
pub use truncation::{head_lines, tail_lines, truncate_diff, truncate_string, LogTail};

/// Output format for list and detail tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown (default, token-efficient)
    #[default]
    Markdown,
    /// Pretty-printed JSON of the unified types
    Json,
}

impl OutputFormat {
    /// Parse an optional `format` argument; `None` means Markdown.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        value
            .map(str::parse::<OutputFormat>)
            .transpose()
            .map(Option::unwrap_or_default)
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::InvalidData(format!(
                "Unknown format '{}'. Expected 'markdown' or 'json'",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Serialize a value as pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render `value` either as JSON or with the given Markdown formatter.
pub fn render<T, F>(value: &T, format: OutputFormat, to_markdown: F) -> Result<String>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Markdown => Ok(to_markdown(value)),
        OutputFormat::Json => to_json(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azdo_core::Project;

    fn project() -> Project {
        Project {
            id: "p1".to_string(),
            name: "Fabrikam".to_string(),
            description: None,
            state: Some("wellFormed".to_string()),
            visibility: None,
        }
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse(None).unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::parse(Some("JSON")).unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse(Some("md")).unwrap(), OutputFormat::Markdown);
        assert!(matches!(
            OutputFormat::parse(Some("xml")),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_render_markdown() {
        let projects = vec![project()];
        let text = render(
            projects.as_slice(),
            OutputFormat::Markdown,
            markdown::projects_to_markdown,
        )
        .unwrap();
        assert!(text.starts_with("# Projects (1)"));
    }

    #[test]
    fn test_render_json_uses_camel_case() {
        let projects = vec![project()];
        let text = render(
            projects.as_slice(),
            OutputFormat::Json,
            markdown::projects_to_markdown,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["name"], "Fabrikam");
        assert_eq!(value[0]["state"], "wellFormed");
    }
}
