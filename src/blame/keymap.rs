//! Read-only key mode active while the blame panel has focus.

use crate::models::{KeyBindingInfo, ModeInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlameAction {
    GoBack,
    CopyHash,
    Close,
}

impl BlameAction {
    pub fn name(self) -> &'static str {
        match self {
            BlameAction::GoBack => "blame-go-back",
            BlameAction::CopyHash => "blame-copy-hash",
            BlameAction::Close => "blame-close",
        }
    }
}

#[derive(Debug)]
pub struct Mode {
    pub name: &'static str,
    /// Unbound keys are swallowed instead of editing the panel
    pub read_only: bool,
    pub bindings: &'static [(&'static str, BlameAction)],
}

pub static BLAME_MODE: Mode = Mode {
    name: "git-blame",
    read_only: true,
    bindings: &[
        ("b", BlameAction::GoBack),
        ("y", BlameAction::CopyHash),
        ("q", BlameAction::Close),
        ("Escape", BlameAction::Close),
    ],
};

impl Mode {
    pub fn action_for(&self, key: &str) -> Option<BlameAction> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, action)| *action)
    }

    pub fn info(&self) -> ModeInfo {
        ModeInfo {
            name: self.name,
            read_only: self.read_only,
            bindings: self
                .bindings
                .iter()
                .map(|(key, action)| KeyBindingInfo {
                    key: *key,
                    action: action.name(),
                })
                .collect(),
        }
    }
}
