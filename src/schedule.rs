//! Day-by-day commit plan for a generation window.

use crate::config::GenerationConfig;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;

/// Planned activity for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub commit_count: u32,
}

/// Build one entry per day from `start_date` to `end_date` inclusive, in
/// chronological order. Entry order is the order commits get made in.
pub fn generate_schedule<R: Rng>(config: &GenerationConfig, rng: &mut R) -> Vec<DaySchedule> {
    config
        .start_date
        .iter_days()
        .take_while(|date| *date <= config.end_date)
        .map(|date| DaySchedule {
            date,
            commit_count: commits_for_day(config, date, rng),
        })
        .collect()
}

fn commits_for_day<R: Rng>(config: &GenerationConfig, date: NaiveDate, rng: &mut R) -> u32 {
    if config.skip_weekends && is_weekend(date) {
        return 0;
    }

    let roll: u32 = rng.gen_range(0..100);
    if roll >= config.frequency_percent {
        return 0;
    }

    rng.gen_range(1..=config.max_commits_per_day)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn total_commits(schedule: &[DaySchedule]) -> u64 {
    schedule.iter().map(|day| u64::from(day.commit_count)).sum()
}

pub fn active_days(schedule: &[DaySchedule]) -> usize {
    schedule.iter().filter(|day| day.commit_count > 0).count()
}
