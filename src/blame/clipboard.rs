//! Copying commit hashes through the platform clipboard helper.
//!
//! The hash goes to the helper's stdin; nothing is interpolated into a shell.

use thiserror::Error;
use tracing::debug;

use crate::git::{ProcessCommand, ProcessRunner};
use crate::models::is_full_hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardCommand {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("refusing to copy malformed hash: {0}")]
    InvalidHash(String),

    #[error("failed to run {0}: {1}")]
    Spawn(String, std::io::Error),

    #[error("{0} failed: {1}")]
    Failed(String, String),
}

impl ClipboardCommand {
    /// Helper for the current platform.
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::from_parts("pbcopy", &[])
        } else if cfg!(windows) {
            Self::from_parts("clip", &[])
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::from_parts("wl-copy", &[])
        } else {
            Self::from_parts("xclip", &["-selection", "clipboard"])
        }
    }

    /// Whitespace-separated command line, e.g. `xsel --clipboard --input`.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut words = spec.split_whitespace();
        let program = words.next()?;
        Some(Self {
            program: program.to_string(),
            args: words.map(str::to_string).collect(),
        })
    }

    fn from_parts(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

pub async fn copy<R: ProcessRunner>(
    runner: &R,
    clipboard: &ClipboardCommand,
    hash: &str,
) -> Result<(), ClipboardError> {
    if !is_full_hash(hash) {
        return Err(ClipboardError::InvalidHash(hash.to_string()));
    }

    let command = ProcessCommand::new(&clipboard.program)
        .args(clipboard.args.iter().cloned())
        .stdin(hash);
    debug!("copying {} with {}", hash, command.display());

    let output = runner
        .run(&command)
        .await
        .map_err(|e| ClipboardError::Spawn(clipboard.program.clone(), e))?;
    if !output.success() {
        return Err(ClipboardError::Failed(
            clipboard.program.clone(),
            output.stderr.trim().to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ScriptedRunner, ALICE};

    #[test]
    fn test_parse_command_line() {
        let cmd = ClipboardCommand::parse("  xsel --clipboard   --input ").unwrap();

        assert_eq!(cmd.program, "xsel");
        assert_eq!(cmd.args, vec!["--clipboard", "--input"]);
        assert!(ClipboardCommand::parse("   ").is_none());
    }

    #[tokio::test]
    async fn test_copy_pipes_hash_to_stdin() {
        let runner = ScriptedRunner::new();
        runner.push_stdout("");
        let clipboard = ClipboardCommand::parse("xclip -selection clipboard").unwrap();

        copy(&runner, &clipboard, ALICE).await.unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "xclip");
        assert_eq!(calls[0].stdin.as_deref(), Some(ALICE));
        assert!(calls[0].args.iter().all(|a| a != ALICE));
    }

    #[tokio::test]
    async fn test_copy_rejects_non_hash_before_running() {
        let runner = ScriptedRunner::new();
        let clipboard = ClipboardCommand::parse("pbcopy").unwrap();

        let err = copy(&runner, &clipboard, "abc; rm -rf /").await.unwrap_err();

        assert!(matches!(err, ClipboardError::InvalidHash(_)));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_copy_reports_helper_failure() {
        let runner = ScriptedRunner::new();
        runner.push_failure(1, "Error: Can't open display\n");
        let clipboard = ClipboardCommand::parse("xclip").unwrap();

        let err = copy(&runner, &clipboard, ALICE).await.unwrap_err();

        assert_eq!(err.to_string(), "xclip failed: Error: Can't open display");
    }
}
