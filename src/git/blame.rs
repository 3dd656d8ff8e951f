//! Running `git blame --porcelain` for one file at one revision.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::BlameError;
use crate::git::porcelain;
use crate::git::process::{ProcessCommand, ProcessRunner};
use crate::models::LineRecord;

/// File to blame, located inside its repository's work tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlameSource {
    /// Path as the user named it
    pub path: PathBuf,
    pub workdir: PathBuf,
    /// Path relative to `workdir`, as git expects it
    pub relative: PathBuf,
}

impl BlameSource {
    pub fn file_name(&self) -> String {
        self.relative
            .file_name()
            .or_else(|| self.path.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}

pub fn blame_command(git: &str, source: &BlameSource, rev: Option<&str>) -> ProcessCommand {
    let mut command = ProcessCommand::new(git)
        .args(["blame", "--porcelain"])
        .current_dir(&source.workdir);
    if let Some(rev) = rev {
        command = command.arg(rev);
    }
    command
        .arg("--")
        .arg(source.relative.to_string_lossy().to_string())
}

/// Blame `source` at `rev` (`None` is the working tree).
///
/// A tool that cannot be started or exits non-zero is an `Invocation` error,
/// never an empty result; an empty `Ok` means the tool reported no lines.
pub async fn fetch_blame<R: ProcessRunner>(
    runner: &R,
    git: &str,
    source: &BlameSource,
    rev: Option<&str>,
    now: i64,
) -> Result<Vec<LineRecord>, BlameError> {
    let command = blame_command(git, source, rev);
    let output = runner.run(&command).await.map_err(|e| {
        warn!("failed to run {}: {}", git, e);
        BlameError::Invocation(format!("failed to run {}: {}", git, e))
    })?;

    if !output.success() {
        let stderr = output.stderr.trim();
        warn!("{} exited with {:?}: {}", command.display(), output.code, stderr);
        let message = if stderr.is_empty() {
            format!("exit status {}", output.code.map_or("unknown".to_string(), |c| c.to_string()))
        } else {
            stderr.to_string()
        };
        return Err(BlameError::Invocation(message));
    }

    let lines = porcelain::parse(&output.stdout, now);
    debug!(
        "blamed {} at {}: {} lines",
        source.relative.display(),
        rev.unwrap_or("HEAD"),
        lines.len()
    );
    Ok(lines)
}
