use crate::config::GenerationOptions;
use clap::Parser;
use std::ffi::OsString;

#[derive(Parser, Debug)]
#[command(name = "git-histgen")]
#[command(about = "Generate a backdated git commit history")]
#[command(version)]
pub struct Cli {
    /// Days before the current date to start from (max: 5475 [15 years])
    #[arg(long = "days_before", default_value_t = 365, allow_negative_numbers = true)]
    pub days_before: i64,

    /// Days after the current date to continue to
    #[arg(long = "days_after", default_value_t = 0, allow_negative_numbers = true)]
    pub days_after: i64,

    /// Do not commit on weekends
    #[arg(long = "no_weekends")]
    pub no_weekends: bool,

    /// Percent chance that a day gets commits (0-100)
    #[arg(long = "frequency", default_value_t = 80, allow_negative_numbers = true)]
    pub frequency: i64,

    /// Maximum commits per day (1-20)
    #[arg(long = "max_commits", default_value_t = 10, allow_negative_numbers = true)]
    pub max_commits: i64,

    /// Remote git repository URL to push to
    #[arg(short = 'r', long = "repository")]
    pub repository: Option<String>,

    /// git user.name config override
    #[arg(long = "user_name")]
    pub user_name: Option<String>,

    /// git user.email config override
    #[arg(long = "user_email")]
    pub user_email: Option<String>,

    /// Seed for a reproducible history
    #[arg(short = 's', long = "seed")]
    pub seed: Option<u64>,
}

impl From<Cli> for GenerationOptions {
    fn from(cli: Cli) -> Self {
        GenerationOptions {
            days_before: cli.days_before,
            days_after: cli.days_after,
            no_weekends: cli.no_weekends,
            frequency: cli.frequency,
            max_commits: cli.max_commits,
            repository: cli.repository,
            user_name: cli.user_name,
            user_email: cli.user_email,
            seed: cli.seed,
        }
    }
}

/// Two-letter short flags and the long flags they stand for.
const SHORT_FLAGS: [(&str, &str); 7] = [
    ("-db", "--days_before"),
    ("-da", "--days_after"),
    ("-nw", "--no_weekends"),
    ("-fr", "--frequency"),
    ("-mc", "--max_commits"),
    ("-un", "--user_name"),
    ("-ue", "--user_email"),
];

/// Rewrite two-letter short flags (`-db 30`, `-db=30`) to their long form,
/// since clap only supports single-character shorts.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            match arg.to_str().and_then(expand_short_flag) {
                Some(expanded) => OsString::from(expanded),
                None => arg,
            }
        })
        .collect()
}

fn expand_short_flag(arg: &str) -> Option<String> {
    let (flag, value) = match arg.split_once('=') {
        Some((flag, value)) => (flag, Some(value)),
        None => (arg, None),
    };
    let (_, long) = SHORT_FLAGS.iter().find(|(short, _)| *short == flag)?;
    Some(match value {
        Some(value) => format!("{}={}", long, value),
        None => long.to_string(),
    })
}

impl Cli {
    pub fn parse_normalized<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Cli::parse_from(normalize_args(args))
    }
}
