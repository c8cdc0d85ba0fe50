//! Observation scanner for issue discussion threads.
//!
//! A maintainer records a disposition by quoting it under a marker line:
//!
//! ```text
//! > **OBSERVATION:**
//! > Accepted, see clause 6
//! ```

use cmt_tracker::IssueComment;

fn is_marker_line(line: &str, marker: &str) -> bool {
    line.trim_start()
        .strip_prefix('>')
        .is_some_and(|rest| rest.trim() == marker)
}

fn strip_quote(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn quoted_after(lines: &[&str]) -> String {
    lines
        .iter()
        .map_while(|line| strip_quote(line))
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Observation recorded in one comment body, if any.
///
/// Markers are tried in order. For each, every marker line is considered
/// and the first one followed by non-empty quoted text wins.
#[must_use]
pub fn find_observation(body: &str, markers: &[String]) -> Option<String> {
    let lines: Vec<&str> = body.lines().collect();
    markers.iter().find_map(|marker| {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| is_marker_line(line, marker))
            .map(|(index, _)| quoted_after(&lines[index + 1..]))
            .find(|observation| !observation.is_empty())
    })
}

/// Observation of a whole thread: the newest comment carrying one wins.
/// With `fallback_to_last_comment`, the newest comment's trimmed body is
/// used when no comment carries a marker.
#[must_use]
pub fn select_observation(
    comments: &[IssueComment],
    markers: &[String],
    fallback_to_last_comment: bool,
) -> Option<String> {
    comments
        .iter()
        .rev()
        .find_map(|comment| find_observation(&comment.body, markers))
        .or_else(|| {
            fallback_to_last_comment
                .then(|| comments.last())
                .flatten()
                .map(|comment| comment.body.trim().to_string())
        })
}
