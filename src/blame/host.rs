use std::path::PathBuf;

use crate::blame::keymap::Mode;
use crate::models::{DisplayEntry, HighlightSpan};

/// Everything the blame engine needs from the application hosting it.
pub trait BlameHost: Send + 'static {
    /// File the user is currently looking at, if any.
    fn active_file(&self) -> Option<PathBuf>;

    /// Show `entries` read-only in the blame panel, reusing the panel when it
    /// is already open and otherwise taking over the active view's slot.
    fn show_panel(&mut self, entries: Vec<DisplayEntry>);

    /// Drop the panel and restore whatever it replaced.
    fn close_panel(&mut self);

    /// Replace every span in `layer`.
    fn set_highlights(&mut self, layer: &str, spans: Vec<HighlightSpan>);

    fn clear_highlights(&mut self, layer: &str);

    /// Entry under the panel cursor.
    fn entry_at(&self, cursor: usize) -> Option<&DisplayEntry>;

    fn enter_mode(&mut self, mode: &'static Mode);

    /// Short user-visible message.
    fn status(&mut self, message: String);
}
