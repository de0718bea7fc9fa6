use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseIndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid release tag {tag:?}: {source}")]
    InvalidTag {
        tag: String,
        #[source]
        source: semver::Error,
    },

    #[error("Invalid timestamp in {field} ({value:?}): {reason}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid version requirement {requirement:?}: {reason}")]
    InvalidRequirement { requirement: String, reason: String },

    #[error("Unknown version: {0}")]
    UnknownVersion(String),

    #[error("Duplicate release for version {0}")]
    DuplicateVersion(String),

    #[error("Invalid GitHub URL: {0}")]
    InvalidUrl(String),

    #[error("GitHub API error: {status} - {message}")]
    GitHubApi { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Release cache not found at {0}. Run `elixir-releases sync` first")]
    MissingCache(String),

    #[error("A release catalog has already been installed for this process")]
    AlreadyInstalled,
}

pub type Result<T> = std::result::Result<T, ReleaseIndexError>;
