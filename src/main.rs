use anyhow::Result;
use chrono::Local;
use git_histgen::cli::Cli;
use git_histgen::config::{GenerationConfig, GenerationOptions};
use git_histgen::error::HistoryError;
use git_histgen::generate::{self, workspace_name};
use git_histgen::repository::GitCli;
use git_histgen::system_config::SystemConfig;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse_normalized(std::env::args_os());
    let options = GenerationOptions::from(cli);

    let now = Local::now().naive_local();
    let config = GenerationConfig::resolve(&options, now.date())?;

    let base_dir = std::env::current_dir()?;
    let workspace = base_dir.join(workspace_name(config.remote_url.as_deref(), now));

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut driver = GitCli::new(&SystemConfig::from_env());

    info!("Creating repository in {}", workspace.display());
    let report = generate::run(&config, &mut driver, &workspace, &mut rng)?;

    println!(
        "Generated {} commits over {} days in {}",
        report.commits_made,
        report.active_days,
        report.workspace.display()
    );
    if !report.incomplete_days.is_empty() {
        println!("Incomplete days: {}", report.incomplete_days.len());
    }
    if report.pushed {
        println!("Pushed to {}", config.remote_url.as_deref().unwrap_or_default());
    }

    if !report.incomplete_days.is_empty() {
        return Err(HistoryError::IncompleteHistory {
            days: report.incomplete_days.len(),
        }
        .into());
    }

    Ok(())
}
