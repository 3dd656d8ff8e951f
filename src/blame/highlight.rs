//! Style spans for the blame panel, as byte ranges into the flattened text.
//!
//! Each line is walked with a running byte offset (line length plus one for
//! the newline). Title, block headers and the footer get a whole-line span;
//! headers additionally get hash, author and summary sub-spans.

use std::ops::Range;

use crate::blame::view::{truncate_summary, FOOTER_HINT, HEADER_MARKER};
use crate::models::{DisplayEntry, EntryKind, HighlightSpan, HighlightStyle, Rgb};

/// Overlay namespace the panel host clears and repaints as a unit.
pub const LAYER: &str = "git-blame";

const TITLE: HighlightStyle = style(Rgb(255, 255, 255), true, true, false);
const HEADER: HighlightStyle = style(Rgb(140, 150, 170), true, false, false);
const HASH: HighlightStyle = style(Rgb(229, 192, 123), true, false, false);
const AUTHOR: HighlightStyle = style(Rgb(97, 175, 239), true, false, false);
const SUMMARY: HighlightStyle = style(Rgb(152, 195, 121), false, false, true);
const FOOTER: HighlightStyle = style(Rgb(128, 128, 128), false, false, true);

const fn style(color: Rgb, bold: bool, underline: bool, italic: bool) -> HighlightStyle {
    HighlightStyle {
        color,
        bold,
        underline,
        italic,
    }
}

enum LineClass<'a> {
    Title,
    Header(Option<&'a EntryKind>),
    Footer,
    Plain,
}

/// Spans for already-rendered text, classifying lines by their content alone.
pub fn derive_highlights(text: &str) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();
    let mut offset = 0;

    for (index, line) in text.split('\n').enumerate() {
        let class = if index == 0 && line.contains(" @ ") {
            LineClass::Title
        } else if line.starts_with(HEADER_MARKER) {
            LineClass::Header(None)
        } else if line.contains(FOOTER_HINT) {
            LineClass::Footer
        } else {
            LineClass::Plain
        };
        line_spans(line, offset, class, &mut spans);
        offset += line.len() + 1;
    }

    spans
}

/// Spans for assembled entries, classifying lines by entry kind so content
/// that happens to look like a header is left alone.
pub fn derive_for_entries(entries: &[DisplayEntry]) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();
    let mut offset = 0;

    for entry in entries {
        let class = match &entry.kind {
            EntryKind::Title => LineClass::Title,
            kind @ EntryKind::BlockHeader { .. } => LineClass::Header(Some(kind)),
            EntryKind::Footer => LineClass::Footer,
            _ => LineClass::Plain,
        };
        line_spans(&entry.text, offset, class, &mut spans);
        offset += entry.text.len() + 1;
    }

    spans
}

fn line_spans(line: &str, offset: usize, class: LineClass<'_>, spans: &mut Vec<HighlightSpan>) {
    let whole = |style| HighlightSpan {
        start: offset,
        end: offset + line.len(),
        style,
    };

    match class {
        LineClass::Title => spans.push(whole(TITLE)),
        LineClass::Footer => spans.push(whole(FOOTER)),
        LineClass::Plain => {}
        LineClass::Header(kind) => {
            spans.push(whole(HEADER));
            let parts = kind
                .and_then(|kind| header_parts_from_fields(line, kind))
                .unwrap_or_else(|| header_parts_by_search(line));
            for (range, style) in [
                (parts.hash, HASH),
                (parts.author, AUTHOR),
                (parts.summary, SUMMARY),
            ] {
                if let Some(range) = range {
                    spans.push(HighlightSpan {
                        start: offset + range.start,
                        end: offset + range.end,
                        style,
                    });
                }
            }
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct HeaderParts {
    hash: Option<Range<usize>>,
    author: Option<Range<usize>>,
    /// Includes the surrounding quotes
    summary: Option<Range<usize>>,
}

/// Locate sub-spans from the header's own fields, knowing the header layout.
/// `None` when the text does not line up with the fields.
fn header_parts_from_fields(line: &str, kind: &EntryKind) -> Option<HeaderParts> {
    let EntryKind::BlockHeader {
        short_hash,
        author,
        date,
        summary,
        ..
    } = kind
    else {
        return None;
    };

    let hash_start = HEADER_MARKER.len() + 1;
    let hash = hash_start..hash_start + short_hash.len();
    let author_start = hash.end + 2;
    let author_range = author_start..author_start + author.len();
    let summary_start = author_range.end + 2 + date.len() + 2;
    let summary_range = summary_start..summary_start + truncate_summary(summary).len() + 2;

    let matches = line.get(hash.clone()) == Some(short_hash.as_str())
        && line.get(author_range.clone()) == Some(author.as_str())
        && line.get(summary_range.clone()).is_some_and(|s| s.starts_with('"') && s.ends_with('"'));

    matches.then_some(HeaderParts {
        hash: Some(hash),
        author: Some(author_range),
        summary: Some(summary_range),
    })
}

fn header_parts_by_search(line: &str) -> HeaderParts {
    let mut parts = HeaderParts::default();

    if let Some(rest) = line.strip_prefix(HEADER_MARKER) {
        let trimmed = rest.trim_start();
        let start = line.len() - trimmed.len();
        if trimmed
            .get(..7)
            .is_some_and(|token| token.bytes().all(|b| b.is_ascii_hexdigit()))
        {
            parts.hash = Some(start..start + 7);
        }
    }

    if let Some(open) = line.find('(') {
        if let Some(comma) = line[open..].find(',') {
            parts.author = Some(open + 1..open + comma);
        }
    }

    if let Some(first) = line.find('"') {
        if let Some(second) = line[first + 1..].find('"') {
            parts.summary = Some(first..first + 1 + second + 1);
        }
    }

    parts
}
