//! On-disk copy of the release feed.
//!
//! `sync` writes the feed exactly as GitHub returned it; everything else
//! loads it from here and builds the index at startup.

use crate::error::{ReleaseIndexError, Result};
use crate::github::types::RawRelease;
use crate::index::ReleaseIndex;
use crate::normalizer::{build_index_with, NormalizeOptions};
use std::fs;
use std::path::Path;
use tracing::debug;

pub fn load_feed(path: &Path) -> Result<Vec<RawRelease>> {
    if !path.exists() {
        return Err(ReleaseIndexError::MissingCache(path.display().to_string()));
    }

    let json_content = fs::read_to_string(path)?;
    let releases: Vec<RawRelease> = serde_json::from_str(&json_content)?;
    debug!(path = %path.display(), count = releases.len(), "loaded cached release feed");

    Ok(releases)
}

pub fn save_feed(path: &Path, releases: &[RawRelease]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(releases)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), count = releases.len(), "wrote release feed cache");

    Ok(())
}

/// Load the cached feed and build an index from it
pub fn load_index(path: &Path, options: &NormalizeOptions) -> Result<ReleaseIndex> {
    let releases = load_feed(path)?;
    build_index_with(&releases, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::RawAsset;
    use tempfile::TempDir;

    fn release(tag: &str) -> RawRelease {
        RawRelease {
            tag_name: tag.to_string(),
            id: 42,
            url: "https://api.github.com/repos/elixir-lang/elixir/releases/42".to_string(),
            html_url: format!("https://github.com/elixir-lang/elixir/releases/tag/{}", tag),
            tarball_url: format!("https://api.github.com/repos/elixir-lang/elixir/tarball/{}", tag),
            zipball_url: format!("https://api.github.com/repos/elixir-lang/elixir/zipball/{}", tag),
            created_at: "2023-06-19T10:00:00Z".to_string(),
            published_at: "2023-06-19T10:30:00Z".to_string(),
            assets: vec![RawAsset {
                content_type: "text/plain".to_string(),
                id: 43,
                url: "https://api.github.com/repos/elixir-lang/elixir/releases/assets/43".to_string(),
                browser_download_url: format!(
                    "https://github.com/elixir-lang/elixir/releases/download/{}/Docs.zip.sha256sum",
                    tag
                ),
                name: "Docs.zip.sha256sum".to_string(),
                size: 81,
                state: "uploaded".to_string(),
                created_at: "2023-06-19T10:10:00Z".to_string(),
                updated_at: "2023-06-19T10:10:01Z".to_string(),
            }],
            name: Some(tag.to_string()),
            body: None,
            draft: false,
            prerelease: false,
        }
    }

    #[test]
    fn test_save_then_load_index() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("releases.json");

        save_feed(&path, &[release("v1.15.0"), release("v1.15.0-rc.2")]).unwrap();
        let index = load_index(&path, &NormalizeOptions::default()).unwrap();

        assert_eq!(index.len(), 2);
        assert!(index.is_release("1.15.0"));
        assert!(index.is_prerelease("1.15.0-rc.2"));
        assert_eq!(
            index.release_data("1.15.0").unwrap().assets[0].name,
            "Docs.zip.sha256sum"
        );
    }

    #[test]
    fn test_missing_cache() {
        let dir = TempDir::new().unwrap();
        let err = load_feed(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ReleaseIndexError::MissingCache(_)));
    }

    #[test]
    fn test_corrupt_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("releases.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_feed(&path), Err(ReleaseIndexError::Json(_))));
    }
}
