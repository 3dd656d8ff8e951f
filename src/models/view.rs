//! Blame panel DTOs.
//!
//! - `DisplayEntry`: one rendered line of the panel, tagged with its kind
//! - `HighlightSpan`: styled byte range over the flattened panel text
//! - `PanelSnapshot`: everything a client needs to draw the panel

use serde::Serialize;

/// One line of the blame panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEntry {
    pub text: String,
    #[serde(flatten)]
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EntryKind {
    Title,
    Blank,
    /// Placeholder shown when there is nothing to blame
    Empty,
    BlockHeader {
        hash: String,
        short_hash: String,
        author: String,
        date: String,
        summary: String,
    },
    Content {
        hash: String,
        line: u32,
    },
    Footer,
}

impl DisplayEntry {
    pub fn new(text: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn blank() -> Self {
        Self::new("", EntryKind::Blank)
    }

    /// Commit that owns this entry, for headers and content lines.
    pub fn commit_hash(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::BlockHeader { hash, .. } | EntryKind::Content { hash, .. } => Some(hash),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightStyle {
    pub color: Rgb,
    pub bold: bool,
    pub underline: bool,
    pub italic: bool,
}

/// Styled byte range `[start, end)` over the flattened panel text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub style: HighlightStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyBindingInfo {
    pub key: &'static str,
    pub action: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeInfo {
    pub name: &'static str,
    pub read_only: bool,
    pub bindings: Vec<KeyBindingInfo>,
}

/// Full state of the blame panel as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSnapshot {
    pub open: bool,
    pub active_file: Option<String>,
    /// `None` while viewing the working tree
    pub commit_ref: Option<String>,
    pub depth: usize,
    pub entries: Vec<DisplayEntry>,
    pub content: String,
    pub highlights: Vec<HighlightSpan>,
    pub mode: Option<ModeInfo>,
    pub status: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CopyResponse {
    pub hash: String,
    /// False when the clipboard helper failed and the hash went to the status line
    pub copied: bool,
}
