#[derive(Debug, Clone)]
pub struct SystemConfig {
    pub git_path: String,
}

impl SystemConfig {
    pub fn from_env() -> Self {
        let git_path = std::env::var("HISTGEN_GIT_PATH").unwrap_or_else(|_| "git".to_string());

        Self { git_path }
    }
}
