//! Unified diffs between two versions of a file.

use similar::{ChangeTag, TextDiff};

/// Lines of context around each hunk.
const CONTEXT_RADIUS: usize = 3;

/// A rendered diff with line counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub unified: String,
    pub additions: usize,
    pub deletions: usize,
}

impl FileDiff {
    pub fn is_empty(&self) -> bool {
        self.additions == 0 && self.deletions == 0
    }
}

/// Diff `old` against `new` line by line.
///
/// `old_label`/`new_label` become the `---`/`+++` header lines.
pub fn unified_diff(old: &str, new: &str, old_label: &str, new_label: &str) -> FileDiff {
    let text_diff = TextDiff::from_lines(old, new);

    let mut additions = 0;
    let mut deletions = 0;
    for change in text_diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => additions += 1,
            ChangeTag::Delete => deletions += 1,
            ChangeTag::Equal => {}
        }
    }

    let unified = if additions == 0 && deletions == 0 {
        String::new()
    } else {
        text_diff
            .unified_diff()
            .context_radius(CONTEXT_RADIUS)
            .header(old_label, new_label)
            .to_string()
    };

    FileDiff {
        unified,
        additions,
        deletions,
    }
}
