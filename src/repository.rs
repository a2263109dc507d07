use crate::command_utils::{execute_command_in, failure_message};
use crate::error::HistoryError;
use crate::system_config::SystemConfig;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BRANCH: &str = "main";
pub const REMOTE_NAME: &str = "origin";

/// Operations the generator needs from a version-control backend.
pub trait RepositoryDriver {
    fn init_repository(&mut self, path: &Path) -> Result<()>;
    fn configure_identity(&mut self, name: Option<&str>, email: Option<&str>) -> Result<()>;
    fn stage_all(&mut self) -> Result<()>;
    fn commit(
        &mut self,
        message: &str,
        author_timestamp: NaiveDateTime,
        committer_timestamp: NaiveDateTime,
    ) -> Result<()>;
    fn add_remote(&mut self, url: &str) -> Result<()>;
    fn push(&mut self) -> Result<()>;
}

/// Drives the `git` command line inside a single working directory.
pub struct GitCli {
    git_path: String,
    workdir: Option<PathBuf>,
}

impl GitCli {
    pub fn new(system: &SystemConfig) -> Self {
        Self {
            git_path: system.git_path.clone(),
            workdir: None,
        }
    }

    fn git(&self, args: &[&str]) -> Result<()> {
        self.git_with_env(args, &[])
    }

    fn git_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> Result<()> {
        let dir = self.workdir.as_deref().ok_or_else(|| HistoryError::RepositoryInit {
            message: "repository has not been initialized".to_string(),
        })?;
        let output = execute_command_in(&self.git_path, args, Some(dir), envs)
            .with_context(|| format!("Failed to run {}", self.git_path))?;

        if !output.status.success() {
            return Err(HistoryError::GitCommandFailed {
                message: format!("git {}: {}", args.join(" "), failure_message(&output)),
            }
            .into());
        }

        Ok(())
    }
}

impl RepositoryDriver for GitCli {
    fn init_repository(&mut self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| HistoryError::RepositoryInit {
            message: format!("cannot create {}: {}", path.display(), e),
        })?;
        self.workdir = Some(path.to_path_buf());

        self.git(&["init", "-b", DEFAULT_BRANCH])
            .map_err(|e| HistoryError::RepositoryInit {
                message: e.to_string(),
            })?;

        Ok(())
    }

    fn configure_identity(&mut self, name: Option<&str>, email: Option<&str>) -> Result<()> {
        if let Some(name) = name {
            self.git(&["config", "user.name", name])?;
        }
        if let Some(email) = email {
            self.git(&["config", "user.email", email])?;
        }
        Ok(())
    }

    fn stage_all(&mut self) -> Result<()> {
        self.git(&["add", "."])
    }

    fn commit(
        &mut self,
        message: &str,
        author_timestamp: NaiveDateTime,
        committer_timestamp: NaiveDateTime,
    ) -> Result<()> {
        let author_date = git_date(author_timestamp);
        let committer_date = git_date(committer_timestamp);
        self.git_with_env(
            &["commit", "-m", message],
            &[
                ("GIT_AUTHOR_DATE", author_date.as_str()),
                ("GIT_COMMITTER_DATE", committer_date.as_str()),
            ],
        )
    }

    fn add_remote(&mut self, url: &str) -> Result<()> {
        self.git(&["remote", "add", REMOTE_NAME, url])
    }

    fn push(&mut self) -> Result<()> {
        self.git(&["branch", "-M", DEFAULT_BRANCH])?;
        self.git(&["push", "-u", REMOTE_NAME, DEFAULT_BRANCH])
    }
}

/// Local-time date string understood by GIT_AUTHOR_DATE / GIT_COMMITTER_DATE.
pub fn git_date(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
}
