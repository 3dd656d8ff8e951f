//! Turns the current navigation state into panel lines.
//!
//! Layout: title, blank, then per block a header followed by its content
//! lines (or a single placeholder when there are no blocks), blank, footer.

use crate::blame::navigation::NavigationState;
use crate::models::{Block, DisplayEntry, EntryKind};

pub const HEADER_MARKER: &str = "──";
/// Present in every footer and nowhere else.
pub const FOOTER_HINT: &str = "[b] back";
pub const EMPTY_MESSAGE: &str = "No blame information available for this file";

const SUMMARY_LIMIT: usize = 60;
const ELLIPSIS: &str = "...";

pub fn assemble(state: &NavigationState) -> Vec<DisplayEntry> {
    let mut entries = vec![
        DisplayEntry::new(
            title(&state.source.file_name(), state.commit_ref.as_deref()),
            EntryKind::Title,
        ),
        DisplayEntry::blank(),
    ];

    if state.blocks.is_empty() {
        entries.push(DisplayEntry::new(EMPTY_MESSAGE, EntryKind::Empty));
    }

    for block in &state.blocks {
        entries.push(DisplayEntry::new(
            block_header(block),
            EntryKind::BlockHeader {
                hash: block.commit_hash.clone(),
                short_hash: block.short_hash.clone(),
                author: block.author.clone(),
                date: block.relative_date.clone(),
                summary: block.summary.clone(),
            },
        ));
        entries.extend(block.lines.iter().map(|line| {
            DisplayEntry::new(
                line.content.clone(),
                EntryKind::Content {
                    hash: line.commit_hash.clone(),
                    line: line.final_line,
                },
            )
        }));
    }

    entries.push(DisplayEntry::blank());
    entries.push(DisplayEntry::new(
        footer(state.blocks.len(), state.history.len()),
        EntryKind::Footer,
    ));
    entries
}

pub fn title(file_name: &str, commit_ref: Option<&str>) -> String {
    let at: String = match commit_ref {
        Some(rev) => rev.chars().take(7).collect(),
        None => "HEAD".to_string(),
    };
    format!("{} @ {}", file_name, at)
}

pub fn block_header(block: &Block) -> String {
    format!(
        "{marker} {} ({}, {}) \"{}\" {marker}",
        block.short_hash,
        block.author,
        block.relative_date,
        truncate_summary(&block.summary),
        marker = HEADER_MARKER,
    )
}

/// Cap at 60 characters, replacing the tail with an ellipsis when cut.
pub fn truncate_summary(summary: &str) -> String {
    if summary.chars().count() <= SUMMARY_LIMIT {
        return summary.to_string();
    }
    let kept: String = summary
        .chars()
        .take(SUMMARY_LIMIT - ELLIPSIS.len())
        .collect();
    format!("{}{}", kept, ELLIPSIS)
}

pub fn footer(block_count: usize, depth: usize) -> String {
    let mut text = format!(
        "{} block{} | {}  [y] copy hash  [q] close",
        block_count,
        if block_count == 1 { "" } else { "s" },
        FOOTER_HINT
    );
    if depth > 0 {
        text.push_str(&format!(" | depth {}", depth));
    }
    text
}

/// Panel text: one line per entry.
pub fn flatten(entries: &[DisplayEntry]) -> String {
    entries
        .iter()
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
