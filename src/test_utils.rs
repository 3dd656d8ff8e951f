//! Shared fixtures for unit tests: throwaway repositories and a scripted
//! process runner.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use git2::{Repository, Signature};
use tempfile::TempDir;

use crate::git::{ProcessCommand, ProcessOutput, ProcessRunner};

pub const ALICE: &str = "abc123def4567890abc123def4567890abc123de";
pub const BOB: &str = "1111111111222222222233333333334444444444";
pub const NOW: i64 = 1_700_000_000;

pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Repository with one commit containing `file`.
    pub fn with_file(file: &str, contents: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let path = dir.path().join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Alice", "alice@example.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[]).unwrap();

        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.path().join(file)
    }
}

pub enum Scripted {
    Output(ProcessOutput),
    SpawnError(io::ErrorKind),
}

/// Replays canned results in order and records every command it was given.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<ProcessCommand>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_stdout(&self, stdout: impl Into<String>) -> &Self {
        self.push(Scripted::Output(ProcessOutput {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }))
    }

    pub fn push_failure(&self, code: i32, stderr: &str) -> &Self {
        self.push(Scripted::Output(ProcessOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }))
    }

    pub fn push(&self, response: Scripted) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<ProcessCommand> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for ScriptedRunner {
    async fn run(&self, command: &ProcessCommand) -> io::Result<ProcessOutput> {
        self.calls.lock().unwrap().push(command.clone());
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::SpawnError(kind)) => Err(io::Error::new(kind, "scripted spawn failure")),
            None => Ok(ProcessOutput {
                code: Some(128),
                stdout: String::new(),
                stderr: format!("unexpected command: {}", command.display()),
            }),
        }
    }
}

/// Porcelain for `hash` owning `lines` consecutive lines starting at `first`.
pub fn porcelain(hash: &str, author: &str, time: i64, summary: &str, first: u32, lines: &[&str]) -> String {
    let mut out = format!(
        "{hash} {first} {first} {}\nauthor {author}\nauthor-mail <{author}@example.com>\nauthor-time {time}\nauthor-tz +0000\nsummary {summary}\nfilename file.rs\n",
        lines.len()
    );
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            let n = first + i as u32;
            out.push_str(&format!("{hash} {n} {n}\n"));
        }
        out.push('\t');
        out.push_str(line);
        out.push('\n');
    }
    out
}
