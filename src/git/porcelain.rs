//! Parser for `git blame --porcelain` output.
//!
//! The stream is a sequence of groups: a header line
//! `<hash> <orig-line> <final-line> [<count>]`, metadata lines (only the first
//! time a commit appears), and one tab-prefixed content line. Anything the
//! parser does not understand is skipped; it never fails.

use std::collections::HashMap;

use tracing::debug;

use crate::blame::time::relative_date;
use crate::models::{short_hash, LineRecord};

#[derive(Debug, Clone, Default)]
struct CommitMeta {
    author: String,
    author_time: i64,
    summary: String,
}

#[derive(Debug, Default)]
struct Cursor {
    hash: Option<String>,
    original_line: u32,
    final_line: u32,
}

/// Parse porcelain output into one record per content line, in final-line order.
pub fn parse(raw: &str, now: i64) -> Vec<LineRecord> {
    let mut commits: HashMap<String, CommitMeta> = HashMap::new();
    let mut cursor = Cursor::default();
    let mut records = Vec::new();

    for line in raw.split('\n') {
        if let Some(content) = line.strip_prefix('\t') {
            let Some(hash) = cursor.hash.clone() else {
                continue;
            };
            let meta = commits.get(&hash).cloned().unwrap_or_default();
            records.push(LineRecord {
                short_hash: short_hash(&hash),
                commit_hash: hash,
                author: meta.author,
                author_time: meta.author_time,
                relative_date: relative_date(meta.author_time, now),
                summary: meta.summary,
                original_line: cursor.original_line,
                final_line: cursor.final_line,
                content: content.to_string(),
            });
        } else if let Some(header) = parse_header(line) {
            // Malformed numbers fall back to the next line after the last one seen.
            cursor.original_line = header.original_line.unwrap_or(cursor.original_line.saturating_add(1));
            cursor.final_line = header.final_line.unwrap_or(cursor.final_line.saturating_add(1));
            commits.entry(header.hash.to_string()).or_default();
            cursor.hash = Some(header.hash.to_string());
        } else if let Some(hash) = cursor.hash.as_deref() {
            let Some(meta) = commits.get_mut(hash) else {
                continue;
            };
            if let Some(time) = line.strip_prefix("author-time ") {
                if let Ok(time) = time.trim().parse() {
                    meta.author_time = time;
                }
            } else if let Some(author) = line.strip_prefix("author ") {
                meta.author = author.to_string();
            } else if let Some(summary) = line.strip_prefix("summary ") {
                meta.summary = summary.to_string();
            }
        }
    }

    debug!("parsed {} blame lines from {} commits", records.len(), commits.len());
    records
}

struct Header<'a> {
    hash: &'a str,
    original_line: Option<u32>,
    final_line: Option<u32>,
}

fn parse_header(line: &str) -> Option<Header<'_>> {
    let mut parts = line.split(' ');
    let hash = parts.next()?;
    if hash.len() != 40 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let original_line = parts.next().and_then(|s| s.parse().ok());
    let final_line = parts.next().and_then(|s| s.parse().ok());
    Some(Header {
        hash,
        original_line,
        final_line,
    })
}
