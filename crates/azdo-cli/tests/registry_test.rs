//! Tool discovery over the builtin registry.

use std::collections::BTreeSet;

use azdo_mcp::{ToolCategory, ToolRegistry};

#[test]
fn test_categories_partition_the_tools() {
    let registry = ToolRegistry::builtin();
    let available = registry.get_available_tools();

    let mut seen = BTreeSet::new();
    let mut total = 0;
    for (label, summary) in &available.tool_categories {
        assert_eq!(summary.tool_count, summary.tools.len(), "{}", label);
        for tool in &summary.tools {
            assert!(seen.insert(tool.clone()), "{} listed twice", tool);
        }
        total += summary.tool_count;
    }

    assert_eq!(total, available.total_tools);
    assert_eq!(available.total_tools, registry.len());
}

#[test]
fn test_every_category_lookup_matches_summary() {
    let registry = ToolRegistry::builtin();
    let available = registry.get_available_tools();

    for category in ToolCategory::ALL {
        let label = category.label();
        let Some(summary) = available.tool_categories.get(label) else {
            continue;
        };
        let detail = registry.get_tools_by_category(&label.to_uppercase());
        assert_eq!(detail.category, label);
        assert_eq!(detail.tool_count, summary.tool_count);
        assert_eq!(
            detail.tools.keys().cloned().collect::<Vec<_>>(),
            {
                let mut tools = summary.tools.clone();
                tools.sort();
                tools
            }
        );
    }
}

#[test]
fn test_unknown_category_lists_alternatives() {
    let registry = ToolRegistry::builtin();
    let detail = registry.get_tools_by_category("work_items");
    assert_eq!(detail.tool_count, 0);
    assert!(detail.tools.is_empty());
    assert!(detail.description.contains("Unknown category 'work_items'"));
    assert!(detail.description.contains("changeset"));
}

#[test]
fn test_definitions_have_object_schemas() {
    let registry = ToolRegistry::builtin();
    for definition in registry.definitions() {
        assert!(definition.name.ends_with("_tool"), "{}", definition.name);
        assert_eq!(definition.input_schema["type"], "object", "{}", definition.name);
    }
}
