use serde::{Deserialize, Serialize};

/// A release as returned by `GET /repos/{owner}/{repo}/releases`.
///
/// Timestamps are kept as the raw strings from the feed; the normalizer
/// owns their parsing so that a bad value fails the whole build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRelease {
    pub tag_name: String,
    pub id: u64,
    pub url: String,
    pub html_url: String,
    pub tarball_url: String,
    pub zipball_url: String,
    pub created_at: String,
    pub published_at: String,
    pub assets: Vec<RawAsset>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    // Not consulted: pre-release status is derived from the tag.
    #[serde(default)]
    pub prerelease: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAsset {
    pub content_type: String,
    pub id: u64,
    pub url: String, // API URL
    pub browser_download_url: String,
    pub name: String,
    pub size: u64,
    pub state: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubError {
    pub message: String,
    pub documentation_url: Option<String>,
}
