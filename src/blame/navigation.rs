//! Blame session: open, step back through history, copy hashes, close.
//!
//! The engine is the single owner of the session. `state` is `None` while
//! closed; it is built only after a successful fetch and dropped on close, so
//! a failed operation never leaves a half-initialised session behind.
//! Callers serialise operations; every method takes `&mut self`.

use tracing::{info, warn};

use crate::blame::clipboard::{self, ClipboardCommand};
use crate::blame::group::group;
use crate::blame::highlight::{derive_for_entries, LAYER};
use crate::blame::host::BlameHost;
use crate::blame::keymap::{BlameAction, BLAME_MODE};
use crate::blame::time::now_unix;
use crate::blame::view::{assemble, flatten};
use crate::error::BlameError;
use crate::git::{fetch_blame, BlameSource, GitRepository, ProcessRunner};
use crate::models::{short_hash, Block, CopyResponse, UNCOMMITTED_HASH};

/// History entry recorded for the working-tree view.
pub const HEAD_MARKER: &str = "HEAD";

#[derive(Debug, Clone)]
pub struct BlameConfig {
    /// History tool binary
    pub git: String,
    pub clipboard: ClipboardCommand,
}

impl Default for BlameConfig {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            clipboard: ClipboardCommand::detect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NavigationState {
    pub source: BlameSource,
    /// `None` for the working tree, otherwise e.g. `<hash>^`
    pub commit_ref: Option<String>,
    /// Refs viewed before the current one, oldest first
    pub history: Vec<String>,
    pub blocks: Vec<Block>,
    /// Flattened text of the last rendered panel
    pub rendered: String,
}

impl NavigationState {
    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

pub fn parent_ref(hash: &str) -> String {
    format!("{}^", hash)
}

pub struct BlameEngine<R, H> {
    runner: R,
    host: H,
    config: BlameConfig,
    state: Option<NavigationState>,
}

impl<R: ProcessRunner, H: BlameHost> BlameEngine<R, H> {
    pub fn new(runner: R, host: H, config: BlameConfig) -> Self {
        Self {
            runner,
            host,
            config,
            state: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&NavigationState> {
        self.state.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Blame the host's active file at the working tree.
    pub async fn open(&mut self) -> Result<(), BlameError> {
        let result = self.try_open().await;
        self.report(result)
    }

    async fn try_open(&mut self) -> Result<(), BlameError> {
        let file = self.host.active_file().ok_or(BlameError::NoActiveFile)?;
        let source = GitRepository::locate(&file)?;
        let lines = fetch_blame(&self.runner, &self.config.git, &source, None, now_unix()).await?;
        if lines.is_empty() {
            return Err(BlameError::Empty);
        }

        if self.state.take().is_some() {
            info!("replacing open blame session");
        }

        let mut state = NavigationState {
            source,
            commit_ref: None,
            history: Vec::new(),
            blocks: group(&lines),
            rendered: String::new(),
        };
        render(&mut self.host, &mut state);
        self.host.enter_mode(&BLAME_MODE);

        info!(
            "opened blame for {}: {} lines in {} blocks",
            state.source.relative.display(),
            lines.len(),
            state.blocks.len()
        );
        let message = format!("Blame: {} ({} lines)", state.source.file_name(), lines.len());
        self.state = Some(state);
        self.host.status(message);
        Ok(())
    }

    /// Re-blame at the parent of the commit owning the line under `cursor`.
    pub async fn go_back(&mut self, cursor: usize) -> Result<(), BlameError> {
        let result = self.try_go_back(cursor).await;
        self.report(result)
    }

    async fn try_go_back(&mut self, cursor: usize) -> Result<(), BlameError> {
        if self.state.is_none() {
            return Err(BlameError::NotOpen);
        }
        let hash = self.commit_at(cursor)?;
        let state = self.state.as_mut().ok_or(BlameError::NotOpen)?;

        let previous = state
            .commit_ref
            .clone()
            .unwrap_or_else(|| HEAD_MARKER.to_string());
        state.history.push(previous);

        let parent = parent_ref(&hash);
        let fetched = fetch_blame(
            &self.runner,
            &self.config.git,
            &state.source,
            Some(&parent),
            now_unix(),
        )
        .await;

        let lines = match fetched {
            Ok(lines) if !lines.is_empty() => lines,
            Ok(_) => {
                state.history.pop();
                return Err(BlameError::NoEarlierHistory(format!(
                    "{} has no parent version of this file",
                    short_hash(&hash)
                )));
            }
            Err(e) => {
                state.history.pop();
                return Err(e);
            }
        };

        state.blocks = group(&lines);
        state.commit_ref = Some(parent);
        render(&mut self.host, state);

        let depth = state.depth();
        info!("stepped back to {}^ (depth {})", hash, depth);
        self.host
            .status(format!("Blame at {}^ (depth {})", short_hash(&hash), depth));
        Ok(())
    }

    /// Tear down the panel and forget the session.
    pub fn close(&mut self) -> Result<(), BlameError> {
        if self.state.take().is_none() {
            return self.report(Err(BlameError::NotOpen));
        }
        self.host.clear_highlights(LAYER);
        self.host.close_panel();
        info!("closed blame view");
        Ok(())
    }

    /// Put the full hash of the commit under `cursor` on the clipboard,
    /// falling back to the status line when the clipboard is unavailable.
    pub async fn copy_hash(&mut self, cursor: usize) -> Result<CopyResponse, BlameError> {
        let resolved = if self.state.is_some() {
            self.commit_at(cursor)
        } else {
            Err(BlameError::NotOpen)
        };
        let hash = self.report(resolved)?;

        let copied = match clipboard::copy(&self.runner, &self.config.clipboard, &hash).await {
            Ok(()) => {
                self.host
                    .status(format!("Copied {} to clipboard", short_hash(&hash)));
                true
            }
            Err(e) => {
                warn!("clipboard unavailable: {}", e);
                self.host.status(format!("Commit: {}", hash));
                false
            }
        };

        Ok(CopyResponse { hash, copied })
    }

    pub async fn dispatch(&mut self, action: BlameAction, cursor: usize) -> Result<(), BlameError> {
        match action {
            BlameAction::GoBack => self.go_back(cursor).await,
            BlameAction::CopyHash => self.copy_hash(cursor).await.map(|_| ()),
            BlameAction::Close => self.close(),
        }
    }

    fn commit_at(&self, cursor: usize) -> Result<String, BlameError> {
        let hash = self
            .host
            .entry_at(cursor)
            .and_then(|entry| entry.commit_hash())
            .ok_or(BlameError::NoContext)?;
        if hash == UNCOMMITTED_HASH {
            return Err(BlameError::Uncommitted);
        }
        Ok(hash.to_string())
    }

    fn report<T>(&mut self, result: Result<T, BlameError>) -> Result<T, BlameError> {
        if let Err(e) = &result {
            self.host.status(e.to_string());
        }
        result
    }
}

fn render<H: BlameHost>(host: &mut H, state: &mut NavigationState) {
    let entries = assemble(state);
    state.rendered = flatten(&entries);
    let spans = derive_for_entries(&entries);
    host.show_panel(entries);
    host.set_highlights(LAYER, spans);
}
