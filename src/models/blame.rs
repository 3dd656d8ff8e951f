//! Blame data transfer objects.
//!
//! Per-line attribution parsed from `git blame --porcelain`, and the blocks of
//! consecutive lines that share an originating commit.

use serde::Serialize;

/// All-zero hash git uses for lines that are not committed yet.
pub const UNCOMMITTED_HASH: &str = "0000000000000000000000000000000000000000";

/// Attribution of one line of the blamed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    /// Full 40-character commit hash
    pub commit_hash: String,
    /// First 7 characters of the hash
    pub short_hash: String,
    pub author: String,
    /// Unix timestamp of the authoring
    pub author_time: i64,
    /// Human relative form of `author_time`
    pub relative_date: String,
    /// First line of the commit message
    pub summary: String,
    /// Line number (1-indexed) in the commit that introduced the line
    pub original_line: u32,
    /// Line number (1-indexed) in the file as viewed
    pub final_line: u32,
    pub content: String,
}

impl LineRecord {
    pub fn is_uncommitted(&self) -> bool {
        self.commit_hash == UNCOMMITTED_HASH
    }
}

/// Maximal run of consecutive lines last touched by the same commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub commit_hash: String,
    pub short_hash: String,
    pub author: String,
    /// Relative date of the first line in the block
    pub relative_date: String,
    pub summary: String,
    pub lines: Vec<LineRecord>,
    pub start_line: u32,
    pub end_line: u32,
}

pub fn short_hash(hash: &str) -> String {
    hash.chars().take(7).collect()
}

/// True for a lowercase 40-digit hex object id.
pub fn is_full_hash(value: &str) -> bool {
    value.len() == 40 && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
