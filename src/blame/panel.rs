//! In-memory host backing the HTTP API.
//!
//! Holds the single blame panel (entries, highlight layers, key mode), the
//! view it replaced, and the most recent status messages. Clients read it
//! back through `GET /api/v1/blame/view`.

use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;

use tracing::info;

use crate::blame::host::BlameHost;
use crate::blame::keymap::Mode;
use crate::models::{DisplayEntry, HighlightSpan};

const STATUS_HISTORY: usize = 32;

#[derive(Debug)]
struct Panel {
    entries: Vec<DisplayEntry>,
    highlights: BTreeMap<String, Vec<HighlightSpan>>,
    mode: Option<&'static Mode>,
    /// Active file when the panel took over the slot
    replaced: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct PanelHost {
    active_file: Option<PathBuf>,
    panel: Option<Panel>,
    status: VecDeque<String>,
}

impl PanelHost {
    pub fn new(active_file: Option<PathBuf>) -> Self {
        Self {
            active_file,
            ..Self::default()
        }
    }

    /// Swap the active file, returning the one it replaces.
    pub fn set_active_file(&mut self, path: Option<PathBuf>) -> Option<PathBuf> {
        std::mem::replace(&mut self.active_file, path)
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_some()
    }

    pub fn entries(&self) -> &[DisplayEntry] {
        self.panel
            .as_ref()
            .map(|p| p.entries.as_slice())
            .unwrap_or_default()
    }

    pub fn highlights(&self, layer: &str) -> &[HighlightSpan] {
        self.panel
            .as_ref()
            .and_then(|p| p.highlights.get(layer))
            .map(|spans| spans.as_slice())
            .unwrap_or_default()
    }

    pub fn mode(&self) -> Option<&'static Mode> {
        self.panel.as_ref().and_then(|p| p.mode)
    }

    pub fn status_messages(&self) -> Vec<String> {
        self.status.iter().cloned().collect()
    }

    pub fn last_status(&self) -> Option<&str> {
        self.status.back().map(String::as_str)
    }
}

impl BlameHost for PanelHost {
    fn active_file(&self) -> Option<PathBuf> {
        self.active_file.clone()
    }

    fn show_panel(&mut self, entries: Vec<DisplayEntry>) {
        match &mut self.panel {
            Some(panel) => panel.entries = entries,
            None => {
                self.panel = Some(Panel {
                    entries,
                    highlights: BTreeMap::new(),
                    mode: None,
                    replaced: self.active_file.clone(),
                })
            }
        }
    }

    fn close_panel(&mut self) {
        if let Some(panel) = self.panel.take() {
            if panel.replaced.is_some() {
                self.active_file = panel.replaced;
            }
        }
    }

    fn set_highlights(&mut self, layer: &str, spans: Vec<HighlightSpan>) {
        if let Some(panel) = &mut self.panel {
            panel.highlights.insert(layer.to_string(), spans);
        }
    }

    fn clear_highlights(&mut self, layer: &str) {
        if let Some(panel) = &mut self.panel {
            panel.highlights.remove(layer);
        }
    }

    fn entry_at(&self, cursor: usize) -> Option<&DisplayEntry> {
        self.panel.as_ref()?.entries.get(cursor)
    }

    fn enter_mode(&mut self, mode: &'static Mode) {
        if let Some(panel) = &mut self.panel {
            panel.mode = Some(mode);
        }
    }

    fn status(&mut self, message: String) {
        info!("status: {}", message);
        if self.status.len() == STATUS_HISTORY {
            self.status.pop_front();
        }
        self.status.push_back(message);
    }
}
