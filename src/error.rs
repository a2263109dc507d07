use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Repository initialization failed: {message}")]
    RepositoryInit { message: String },

    #[error("Commit failed on {date}: {message}")]
    CommitFailed { date: String, message: String },

    #[error("History incomplete: {days} scheduled day(s) could not be committed")]
    IncompleteHistory { days: usize },

    #[error("Push failed: {message}")]
    PushFailed { message: String },

    #[error("Git command failed: {message}")]
    GitCommandFailed { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HistoryError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        HistoryError::InvalidConfig {
            message: message.into(),
        }
    }
}
