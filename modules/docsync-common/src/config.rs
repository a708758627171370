use std::env;

use tracing::info;

/// Sync configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source repository, `owner/name`.
    pub repo: String,
    /// Subdirectory inside the repository holding the documents.
    pub dir: String,
    /// Optional bearer token for the GitHub API.
    pub github_token: Option<String>,
    /// Site-absolute route prefix rewritten links point at.
    pub route_prefix: String,
    /// Cap on concurrent entry pipelines.
    pub max_concurrent: usize,
    /// Skip content downloads for entries whose `sha` is unchanged.
    pub skip_unchanged: bool,
    /// Optional path the binary exports the synced collection to.
    pub output_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            repo: required_env("DOCS_REPO"),
            dir: env::var("DOCS_DIR").unwrap_or_else(|_| "docs".to_string()),
            github_token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            route_prefix: env::var("DOCS_ROUTE_PREFIX").unwrap_or_else(|_| "/docs".to_string()),
            max_concurrent: env::var("SYNC_MAX_CONCURRENT")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .expect("SYNC_MAX_CONCURRENT must be a number"),
            skip_unchanged: env::var("SYNC_SKIP_UNCHANGED")
                .map(|v| v != "0" && v != "false")
                .unwrap_or(true),
            output_path: env::var("SYNC_OUTPUT").ok(),
        }
    }

    /// Log the active configuration without leaking the token.
    pub fn log_redacted(&self) {
        info!(
            repo = self.repo.as_str(),
            dir = self.dir.as_str(),
            route_prefix = self.route_prefix.as_str(),
            max_concurrent = self.max_concurrent,
            skip_unchanged = self.skip_unchanged,
            authenticated = self.github_token.is_some(),
            "Sync configuration loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
