use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories under `src/` that make up the project skeleton.
pub const MODULES: [&str; 10] = [
    "api", "auth", "backend", "config", "core", "database", "docs", "frontend", "tests", "utils",
];

pub const README: &str = "README.md";

const WORKDAY_START_MINUTE: i64 = 9 * 60;
const WORKDAY_MINUTES: i64 = 9 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitCategory {
    Bugfix,
    Docs,
    Feature,
    Refactor,
    Performance,
    Test,
    DependencyUpdate,
    SecurityFix,
}

impl CommitCategory {
    pub const ALL: [CommitCategory; 8] = [
        CommitCategory::Bugfix,
        CommitCategory::Docs,
        CommitCategory::Feature,
        CommitCategory::Refactor,
        CommitCategory::Performance,
        CommitCategory::Test,
        CommitCategory::DependencyUpdate,
        CommitCategory::SecurityFix,
    ];

    /// Message templates; `{module}` is replaced with the touched module.
    pub fn templates(self) -> &'static [&'static str] {
        match self {
            CommitCategory::Bugfix => &[
                "Fix bug in {module}",
                "Improve error handling in {module}",
                "Fix edge case in {module} input handling",
            ],
            CommitCategory::Docs => &[
                "Update documentation for {module}",
                "Clarify {module} usage in docs",
            ],
            CommitCategory::Feature => &[
                "Add new feature to {module}",
                "Implement {module} functionality",
                "Extend {module} with configurable options",
            ],
            CommitCategory::Refactor => &[
                "Refactor {module} code",
                "Simplify {module} internals",
            ],
            CommitCategory::Performance => &[
                "Optimize {module} performance",
                "Reduce allocations in {module}",
            ],
            CommitCategory::Test => &["Add tests for {module}", "Cover {module} error paths in tests"],
            CommitCategory::DependencyUpdate => &[
                "Update dependencies for {module}",
                "Bump {module} dependency versions",
            ],
            CommitCategory::SecurityFix => &[
                "Fix security issue in {module}",
                "Harden {module} input validation",
            ],
        }
    }
}

impl fmt::Display for CommitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommitCategory::Bugfix => "bugfix",
            CommitCategory::Docs => "docs",
            CommitCategory::Feature => "feature",
            CommitCategory::Refactor => "refactor",
            CommitCategory::Performance => "performance",
            CommitCategory::Test => "test",
            CommitCategory::DependencyUpdate => "dependency-update",
            CommitCategory::SecurityFix => "security-fix",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentChange {
    Create { contents: String },
    Append { line: String },
}

/// Everything needed to realize one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub timestamp: NaiveDateTime,
    pub category: CommitCategory,
    pub message: String,
    /// Relative to the repository root.
    pub touched_file: PathBuf,
    pub change: ContentChange,
}

/// Spread `count` commits over the 09:00-18:00 window of `date`.
///
/// The window is cut into `count` equal slots and each commit lands on a
/// random minute inside its own slot, so times are strictly increasing.
pub fn commit_times<R: Rng>(date: NaiveDate, count: u32, rng: &mut R) -> Vec<NaiveDateTime> {
    let count = i64::from(count).min(WORKDAY_MINUTES);
    if count == 0 {
        return Vec::new();
    }
    let slot = WORKDAY_MINUTES / count;
    let midnight = date.and_time(NaiveTime::MIN);

    (0..count)
        .map(|i| {
            let minute = WORKDAY_START_MINUTE + i * slot + rng.gen_range(0..slot);
            midnight + Duration::minutes(minute)
        })
        .collect()
}

/// Working-tree contents saved before a commit, used to undo a failed one.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    files: Vec<(PathBuf, Option<Vec<u8>>)>,
}

pub struct ContentSynthesizer {
    root: PathBuf,
}

impl ContentSynthesizer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the module directories and a fresh README.
    pub fn create_skeleton(&self, project_name: &str) -> Result<()> {
        for module in MODULES {
            let dir = self.root.join("src").join(module);
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let readme = self.root.join(README);
        fs::write(
            &readme,
            format!("# Project History\n\nGenerated commit history for {}\n\n", project_name),
        )
        .with_context(|| format!("Failed to write {}", readme.display()))?;

        Ok(())
    }

    /// Plan one commit at `timestamp`. Reads the working tree but does not change it.
    pub fn synthesize<R: Rng>(
        &self,
        timestamp: NaiveDateTime,
        rng: &mut R,
    ) -> Result<CommitRecord> {
        let category = CommitCategory::ALL[rng.gen_range(0..CommitCategory::ALL.len())];
        let templates = category.templates();
        let template = templates[rng.gen_range(0..templates.len())];
        let module = MODULES[rng.gen_range(0..MODULES.len())];
        let message = template.replace("{module}", module);

        let module_dir = Path::new("src").join(module);
        let existing = self.existing_files(&module_dir)?;
        let new_file = module_dir.join(format!("file_{}.txt", timestamp.format("%Y%m%d_%H%M")));

        let create = existing.is_empty() || rng.gen_ratio(1, 3);
        let (touched_file, change) = if create && !self.root.join(&new_file).exists() {
            let contents = format!("{}\n\nDate: {}", message, timestamp.format("%Y-%m-%d %H:%M:%S"));
            (new_file, ContentChange::Create { contents })
        } else {
            let target = if existing.is_empty() {
                new_file
            } else {
                existing[rng.gen_range(0..existing.len())].clone()
            };
            (target, ContentChange::Append { line: history_line(&message, timestamp) })
        };

        Ok(CommitRecord {
            timestamp,
            category,
            message,
            touched_file,
            change,
        })
    }

    /// Write the planned change and log the commit in the README.
    pub fn apply(&self, record: &CommitRecord) -> Result<()> {
        let path = self.root.join(&record.touched_file);
        match &record.change {
            ContentChange::Create { contents } => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                fs::write(&path, contents)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            ContentChange::Append { line } => {
                append_line(&path, line)?;
            }
        }

        let readme_line = format!("{}\n", history_line(&record.message, record.timestamp));
        append_line(&self.root.join(README), &readme_line)?;

        Ok(())
    }

    /// Record the current state of every file `apply` would touch for `record`.
    pub fn checkpoint(&self, record: &CommitRecord) -> Result<Checkpoint> {
        let mut files = Vec::new();
        for relative in [record.touched_file.as_path(), Path::new(README)] {
            let path = self.root.join(relative);
            let contents = if path.exists() {
                Some(fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?)
            } else {
                None
            };
            files.push((path, contents));
        }
        Ok(Checkpoint { files })
    }

    /// Put the files saved in `checkpoint` back; files that did not exist are removed.
    pub fn restore(&self, checkpoint: &Checkpoint) -> Result<()> {
        for (path, contents) in &checkpoint.files {
            match contents {
                Some(contents) => fs::write(path, contents)
                    .with_context(|| format!("Failed to restore {}", path.display()))?,
                None if path.exists() => fs::remove_file(path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?,
                None => {}
            }
        }
        Ok(())
    }

    fn existing_files(&self, module_dir: &Path) -> Result<Vec<PathBuf>> {
        let dir = self.root.join(module_dir);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(module_dir.join(entry.file_name()));
            }
        }
        // Directory order is filesystem dependent; sort so seeded runs repeat.
        files.sort();

        Ok(files)
    }
}

fn history_line(message: &str, timestamp: NaiveDateTime) -> String {
    format!("- {} ({})", message, timestamp.format("%Y-%m-%d %H:%M"))
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    writeln!(file, "{}", line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 14).unwrap()
    }

    #[test]
    fn test_commit_times_increase_within_workday() {
        let mut rng = StdRng::seed_from_u64(7);
        for count in 1..=20 {
            let times = commit_times(day(), count, &mut rng);
            assert_eq!(times.len(), count as usize);
            for pair in times.windows(2) {
                assert!(pair[0] < pair[1]);
            }
            for time in &times {
                assert_eq!(time.date(), day());
                assert!(time.hour() >= 9 && time.hour() < 18, "{}", time);
            }
        }
    }

    #[test]
    fn test_commit_times_empty_for_zero() {
        assert!(commit_times(day(), 0, &mut StdRng::seed_from_u64(1)).is_empty());
    }

    #[test]
    fn test_every_category_has_module_templates() {
        for category in CommitCategory::ALL {
            assert!(!category.templates().is_empty());
            for template in category.templates() {
                assert!(template.contains("{module}"), "{}: {}", category, template);
            }
        }
    }

    #[test]
    fn test_first_commit_in_module_creates_file() {
        let dir = TempDir::new().unwrap();
        let synth = ContentSynthesizer::new(dir.path());
        synth.create_skeleton("demo").unwrap();

        let timestamp = day().and_hms_opt(10, 30, 0).unwrap();
        let record = synth.synthesize(timestamp, &mut StdRng::seed_from_u64(3)).unwrap();

        assert!(record.touched_file.starts_with("src"));
        assert!(record
            .touched_file
            .to_string_lossy()
            .ends_with("file_20240214_1030.txt"));
        match &record.change {
            ContentChange::Create { contents } => {
                assert!(contents.starts_with(&record.message));
                assert!(contents.ends_with("Date: 2024-02-14 10:30:00"));
            }
            other => panic!("expected a new file, got {:?}", other),
        }
    }

    #[test]
    fn test_apply_changes_readme_and_target() {
        let dir = TempDir::new().unwrap();
        let synth = ContentSynthesizer::new(dir.path());
        synth.create_skeleton("demo").unwrap();
        let readme_before = fs::read_to_string(dir.path().join(README)).unwrap();
        assert!(readme_before.contains("Generated commit history for demo"));

        let mut rng = StdRng::seed_from_u64(11);
        for time in commit_times(day(), 12, &mut rng) {
            let record = synth.synthesize(time, &mut rng).unwrap();
            let target = dir.path().join(&record.touched_file);
            let before = fs::read_to_string(&target).unwrap_or_default();

            synth.apply(&record).unwrap();

            let after = fs::read_to_string(&target).unwrap();
            assert_ne!(before, after);
            let readme = fs::read_to_string(dir.path().join(README)).unwrap();
            assert!(readme.contains(&history_line(&record.message, time)));
        }
    }

    #[test]
    fn test_restore_undoes_apply() {
        let dir = TempDir::new().unwrap();
        let synth = ContentSynthesizer::new(dir.path());
        synth.create_skeleton("demo").unwrap();
        let readme_before = fs::read_to_string(dir.path().join(README)).unwrap();

        let timestamp = day().and_hms_opt(14, 20, 0).unwrap();
        let record = synth.synthesize(timestamp, &mut StdRng::seed_from_u64(5)).unwrap();
        let checkpoint = synth.checkpoint(&record).unwrap();
        synth.apply(&record).unwrap();
        assert!(dir.path().join(&record.touched_file).exists());

        synth.restore(&checkpoint).unwrap();

        assert!(!dir.path().join(&record.touched_file).exists());
        assert_eq!(fs::read_to_string(dir.path().join(README)).unwrap(), readme_before);
    }

    #[test]
    fn test_restore_keeps_earlier_content_of_appended_file() {
        let dir = TempDir::new().unwrap();
        let synth = ContentSynthesizer::new(dir.path());
        synth.create_skeleton("demo").unwrap();
        let existing = Path::new("src").join("core").join("notes.txt");
        fs::write(dir.path().join(&existing), "first line\n").unwrap();

        let record = CommitRecord {
            timestamp: day().and_hms_opt(11, 0, 0).unwrap(),
            category: CommitCategory::Refactor,
            message: "Refactor core code".to_string(),
            touched_file: existing.clone(),
            change: ContentChange::Append {
                line: "- Refactor core code (2024-02-14 11:00)".to_string(),
            },
        };
        let checkpoint = synth.checkpoint(&record).unwrap();
        synth.apply(&record).unwrap();
        synth.restore(&checkpoint).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join(&existing)).unwrap(),
            "first line\n"
        );
    }

    #[test]
    fn test_synthesize_is_repeatable_for_same_seed() {
        let dir = TempDir::new().unwrap();
        let synth = ContentSynthesizer::new(dir.path());
        synth.create_skeleton("demo").unwrap();
        let timestamp = day().and_hms_opt(9, 5, 0).unwrap();

        let a = synth.synthesize(timestamp, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = synth.synthesize(timestamp, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
