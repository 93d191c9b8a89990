//! `azdo-tools tools`: print tool discovery JSON.

use azdo_mcp::ToolRegistry;

pub fn run(category: Option<&str>) -> anyhow::Result<()> {
    println!("{}", render(&ToolRegistry::builtin(), category)?);
    Ok(())
}

fn render(registry: &ToolRegistry, category: Option<&str>) -> serde_json::Result<String> {
    match category {
        Some(category) => serde_json::to_string_pretty(&registry.get_tools_by_category(category)),
        None => serde_json::to_string_pretty(&registry.get_available_tools()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_render_all() {
        let text = render(&ToolRegistry::builtin(), None).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total_tools"], 22);
        assert_eq!(value["tool_categories"]["changeset"]["tool_count"], 4);
    }

    #[test]
    fn test_render_category() {
        let text = render(&ToolRegistry::builtin(), Some("git")).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["category"], "git");
        assert!(value["tools"]["get_git_commits_tool"]["description"].is_string());
    }
}
