//! Truncation utilities for limiting output size.
//!
//! All cuts land on `char` boundaries so multi-byte log output never panics.

/// Largest byte index `<= max` that is a char boundary of `s`.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if max >= s.len() {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Truncate a string to `max_chars` bytes, preferring line then word boundaries.
/// The result is at most `max_chars` long including the `...` marker.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.len() <= max_chars {
        return s.to_string();
    }

    let content_limit = max_chars.saturating_sub(3);
    if content_limit == 0 {
        return "...".to_string();
    }

    let truncated = &s[..floor_char_boundary(s, content_limit)];

    if let Some(pos) = truncated.rfind('\n') {
        if pos > content_limit / 2 {
            return format!("{}...", &s[..pos]);
        }
    }

    if let Some(pos) = truncated.rfind(' ') {
        if pos > content_limit / 2 {
            return format!("{}...", &s[..pos]);
        }
    }

    format!("{}...", truncated)
}

/// Truncate a unified diff, keeping its head and tail.
pub fn truncate_diff(diff: &str, max_chars: usize) -> String {
    if diff.len() <= max_chars {
        return diff.to_string();
    }

    let lines: Vec<&str> = diff.lines().collect();
    if lines.len() <= 40 {
        return truncate_string(diff, max_chars);
    }

    // Keep as many whole lines from both ends as fit in the budget
    let budget = max_chars / 2;
    let head = take_within(lines.iter().copied(), budget);
    let tail = take_within(lines.iter().rev().copied(), budget);
    let hidden = lines.len().saturating_sub(head.len() + tail.len());
    if hidden == 0 {
        return truncate_string(diff, max_chars);
    }

    let tail: Vec<&str> = tail.into_iter().rev().collect();
    format!(
        "{}\n\n... [{} diff lines hidden] ...\n\n{}",
        head.join("\n"),
        hidden,
        tail.join("\n")
    )
}

fn take_within<'a>(lines: impl Iterator<Item = &'a str>, budget: usize) -> Vec<&'a str> {
    let mut used = 0;
    let mut kept = vec![];
    for line in lines {
        used += line.len() + 1;
        if used > budget {
            break;
        }
        kept.push(line);
    }
    kept
}

/// First `n` lines of a text.
pub fn head_lines(text: &str, n: usize) -> Vec<&str> {
    text.lines().take(n).collect()
}

/// The last `n` lines of a log, plus how many earlier lines were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTail {
    pub text: String,
    pub omitted_lines: usize,
}

/// Keep the last `n` lines of a text.
pub fn tail_lines(text: &str, n: usize) -> LogTail {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    LogTail {
        text: lines[start..].join("\n"),
        omitted_lines: start,
    }
}
