use crate::error::HistoryError;
use anyhow::Result;
use chrono::{Duration, NaiveDate};

/// Longest history the tool will synthesize (15 years).
pub const MAX_DAYS: i64 = 15 * 365;
pub const MAX_COMMITS_LIMIT: u32 = 20;

/// Unvalidated options as they come off the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub days_before: i64,
    pub days_after: i64,
    pub no_weekends: bool,
    pub frequency: i64,
    pub max_commits: i64,
    pub repository: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub seed: Option<u64>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            days_before: 365,
            days_after: 0,
            no_weekends: false,
            frequency: 80,
            max_commits: 10,
            repository: None,
            user_name: None,
            user_email: None,
            seed: None,
        }
    }
}

/// Validated settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub skip_weekends: bool,
    pub frequency_percent: u32,
    pub max_commits_per_day: u32,
    pub remote_url: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub seed: Option<u64>,
}

impl GenerationConfig {
    /// Resolve raw options against `today`. Fails before anything touches disk.
    pub fn resolve(options: &GenerationOptions, today: NaiveDate) -> Result<Self> {
        if options.days_before < 0 {
            return Err(HistoryError::invalid_config("days_before must not be negative").into());
        }
        if options.days_after < 0 {
            return Err(HistoryError::invalid_config("days_after must not be negative").into());
        }
        if options.days_before > MAX_DAYS {
            return Err(HistoryError::invalid_config(format!(
                "days_before must be at most {} (15 years), got {}",
                MAX_DAYS, options.days_before
            ))
            .into());
        }
        if options.days_after > MAX_DAYS {
            return Err(HistoryError::invalid_config(format!(
                "days_after must be at most {} (15 years), got {}",
                MAX_DAYS, options.days_after
            ))
            .into());
        }
        let span = options.days_before + options.days_after;
        if span > MAX_DAYS {
            return Err(HistoryError::invalid_config(format!(
                "date span must be at most {} days, got {}",
                MAX_DAYS, span
            ))
            .into());
        }
        if !(0..=100).contains(&options.frequency) {
            return Err(HistoryError::invalid_config(format!(
                "frequency must be between 0 and 100, got {}",
                options.frequency
            ))
            .into());
        }
        if !(1..=i64::from(MAX_COMMITS_LIMIT)).contains(&options.max_commits) {
            return Err(HistoryError::invalid_config(format!(
                "max_commits must be between 1 and {}, got {}",
                MAX_COMMITS_LIMIT, options.max_commits
            ))
            .into());
        }

        let start_date = today
            .checked_sub_signed(Duration::days(options.days_before))
            .ok_or_else(|| HistoryError::invalid_config("start date out of range"))?;
        let end_date = today
            .checked_add_signed(Duration::days(options.days_after))
            .ok_or_else(|| HistoryError::invalid_config("end date out of range"))?;

        Ok(GenerationConfig {
            start_date,
            end_date,
            skip_weekends: options.no_weekends,
            frequency_percent: options.frequency as u32,
            max_commits_per_day: options.max_commits as u32,
            remote_url: non_empty(options.repository.as_deref()),
            user_name: non_empty(options.user_name.as_deref()),
            user_email: non_empty(options.user_email.as_deref()),
            seed: options.seed,
        })
    }

    /// Number of calendar days in the window, both ends included.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
