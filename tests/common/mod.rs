#![allow(dead_code)]

use anyhow::{bail, Result};
use chrono::{NaiveDate, NaiveDateTime};
use git_histgen::config::GenerationConfig;
use git_histgen::repository::RepositoryDriver;
use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Init(PathBuf),
    Identity(Option<String>, Option<String>),
    StageAll,
    Commit {
        message: String,
        author: NaiveDateTime,
        committer: NaiveDateTime,
    },
    AddRemote(String),
    Push,
}

/// Fake driver that records every call and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub calls: Vec<DriverCall>,
    pub fail_commit_on: Option<NaiveDate>,
    pub fail_push: bool,
    pub fail_init: bool,
    pub workdir: Option<PathBuf>,
    /// README contents at the moment of each successful commit.
    pub readme_at_commit: Vec<String>,
}

impl RecordingDriver {
    pub fn commits(&self) -> Vec<(String, NaiveDateTime)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DriverCall::Commit {
                    message, author, ..
                } => Some((message.clone(), *author)),
                _ => None,
            })
            .collect()
    }
}

impl RepositoryDriver for RecordingDriver {
    fn init_repository(&mut self, path: &Path) -> Result<()> {
        if self.fail_init {
            bail!("cannot create repository");
        }
        std::fs::create_dir_all(path)?;
        self.workdir = Some(path.to_path_buf());
        self.calls.push(DriverCall::Init(path.to_path_buf()));
        Ok(())
    }

    fn configure_identity(&mut self, name: Option<&str>, email: Option<&str>) -> Result<()> {
        self.calls.push(DriverCall::Identity(
            name.map(str::to_string),
            email.map(str::to_string),
        ));
        Ok(())
    }

    fn stage_all(&mut self) -> Result<()> {
        self.calls.push(DriverCall::StageAll);
        Ok(())
    }

    fn commit(
        &mut self,
        message: &str,
        author_timestamp: NaiveDateTime,
        committer_timestamp: NaiveDateTime,
    ) -> Result<()> {
        if self.fail_commit_on == Some(author_timestamp.date()) {
            bail!("simulated commit failure");
        }
        if let Some(dir) = &self.workdir {
            self.readme_at_commit
                .push(std::fs::read_to_string(dir.join("README.md")).unwrap_or_default());
        }
        self.calls.push(DriverCall::Commit {
            message: message.to_string(),
            author: author_timestamp,
            committer: committer_timestamp,
        });
        Ok(())
    }

    fn add_remote(&mut self, url: &str) -> Result<()> {
        self.calls.push(DriverCall::AddRemote(url.to_string()));
        Ok(())
    }

    fn push(&mut self) -> Result<()> {
        if self.fail_push {
            bail!("network unreachable");
        }
        self.calls.push(DriverCall::Push);
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn config(start: NaiveDate, end: NaiveDate, frequency: u32, max_commits: u32) -> GenerationConfig {
    GenerationConfig {
        start_date: start,
        end_date: end,
        skip_weekends: false,
        frequency_percent: frequency,
        max_commits_per_day: max_commits,
        remote_url: None,
        user_name: None,
        user_email: None,
        seed: None,
    }
}

/// Write an executable wrapper that behaves like git but rejects every `commit`.
#[cfg(unix)]
pub fn git_rejecting_commits(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("git-no-commit");
    std::fs::write(
        &path,
        "#!/bin/sh\nif [ \"$1\" = \"commit\" ]; then\n  echo \"commit rejected\" >&2\n  exit 1\nfi\nexec git \"$@\"\n",
    )
    .unwrap();
    let mut permissions = std::fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).unwrap();
    path
}

/// Run git in `dir` and return trimmed stdout.
pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

pub fn init_bare_remote(dir: &Path) {
    StdCommand::new("git")
        .args(["init", "--bare"])
        .current_dir(dir)
        .output()
        .expect("Failed to init bare repo");
}
