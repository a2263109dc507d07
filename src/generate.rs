use crate::config::GenerationConfig;
use crate::error::HistoryError;
use crate::repository::RepositoryDriver;
use crate::schedule::{self, DaySchedule};
use crate::synth::{commit_times, CommitRecord, ContentSynthesizer};
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use rand::Rng;
use std::path::{Path, PathBuf};

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub workspace: PathBuf,
    pub days_scheduled: usize,
    pub active_days: usize,
    pub commits_made: u64,
    pub incomplete_days: Vec<NaiveDate>,
    pub pushed: bool,
}

/// Directory name for a run: the remote's repository name, or a timestamped default.
pub fn workspace_name(remote_url: Option<&str>, now: NaiveDateTime) -> String {
    if let Some(name) = remote_url.and_then(repository_name_from_url) {
        return name;
    }
    format!("repository-{}", now.format("%Y-%m-%d-%H-%M-%S"))
}

fn repository_name_from_url(url: &str) -> Option<String> {
    let last = url
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

pub fn run<D, R>(
    config: &GenerationConfig,
    driver: &mut D,
    workspace: &Path,
    rng: &mut R,
) -> Result<GenerationReport>
where
    D: RepositoryDriver + ?Sized,
    R: Rng,
{
    driver.init_repository(workspace)?;

    if config.user_name.is_some() || config.user_email.is_some() {
        driver
            .configure_identity(config.user_name.as_deref(), config.user_email.as_deref())
            .map_err(|e| HistoryError::RepositoryInit {
                message: format!("cannot configure identity: {}", e),
            })?;
    }

    let project_name = workspace
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    let synth = ContentSynthesizer::new(workspace);
    synth
        .create_skeleton(&project_name)
        .map_err(|e| HistoryError::RepositoryInit {
            message: format!("cannot create project skeleton: {}", e),
        })?;

    let plan = schedule::generate_schedule(config, rng);
    info!(
        "Generating commits from {} to {} ({} days, {} active, {} commits planned)",
        config.start_date,
        config.end_date,
        plan.len(),
        schedule::active_days(&plan),
        schedule::total_commits(&plan)
    );

    let mut report = GenerationReport {
        workspace: workspace.to_path_buf(),
        days_scheduled: plan.len(),
        active_days: schedule::active_days(&plan),
        ..GenerationReport::default()
    };

    for day in plan.iter().filter(|day| day.commit_count > 0) {
        if let Err(e) = realize_day(day, &synth, driver, rng, &mut report.commits_made) {
            warn!("{}", e);
            report.incomplete_days.push(day.date);
        }
    }

    info!(
        "Created {} commits ({} incomplete days)",
        report.commits_made,
        report.incomplete_days.len()
    );

    if let Some(url) = config.remote_url.as_deref() {
        report.pushed = push_to_remote(driver, url, report.commits_made)?;
    }

    Ok(report)
}

/// Make every commit scheduled for `day`, stopping at the first failure.
fn realize_day<D, R>(
    day: &DaySchedule,
    synth: &ContentSynthesizer,
    driver: &mut D,
    rng: &mut R,
    commits_made: &mut u64,
) -> Result<(), HistoryError>
where
    D: RepositoryDriver + ?Sized,
    R: Rng,
{
    let failed = |e: anyhow::Error| HistoryError::CommitFailed {
        date: day.date.to_string(),
        message: format!("{:#}", e),
    };

    for timestamp in commit_times(day.date, day.commit_count, rng) {
        let record = synth.synthesize(timestamp, rng).map_err(failed)?;
        let checkpoint = synth.checkpoint(&record).map_err(failed)?;

        if let Err(e) = commit_record(&record, synth, driver) {
            // Leave nothing behind for the next day's commit to pick up.
            if let Err(restore_err) = synth.restore(&checkpoint) {
                warn!(
                    "Could not roll back working tree for {}: {:#}",
                    day.date, restore_err
                );
            }
            return Err(failed(e));
        }
        *commits_made += 1;
    }

    Ok(())
}

fn commit_record<D>(record: &CommitRecord, synth: &ContentSynthesizer, driver: &mut D) -> Result<()>
where
    D: RepositoryDriver + ?Sized,
{
    synth.apply(record)?;
    driver.stage_all()?;
    driver.commit(&record.message, record.timestamp, record.timestamp)
}

fn push_to_remote<D>(driver: &mut D, url: &str, commits_made: u64) -> Result<bool>
where
    D: RepositoryDriver + ?Sized,
{
    let push_failed = |e: anyhow::Error| HistoryError::PushFailed {
        message: format!("{:#}", e),
    };

    driver.add_remote(url).map_err(push_failed)?;

    if commits_made == 0 {
        warn!("No commits were created; skipping push to {}", url);
        return Ok(false);
    }

    info!("Pushing to remote repository {}...", url);
    driver.push().map_err(push_failed)?;
    Ok(true)
}
