use crate::error::{ReleaseIndexError, Result};
use crate::normalizer::{DuplicatePolicy, NormalizeOptions, DEFAULT_FLOOR};
use semver::Version;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_REPOSITORY: &str = "https://github.com/elixir-lang/elixir";
const DEFAULT_CACHE: &str = "cache/releases.json";

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    source: SourceSection,
    #[serde(default)]
    index: IndexSection,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SourceSection {
    repository: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct IndexSection {
    floor: Option<String>,
    cache: Option<PathBuf>,
    #[serde(default)]
    duplicates: DuplicatePolicy,
}

/// Resolved contents of `catalog.toml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub owner: String,
    pub repo: String,
    pub floor: Version,
    pub cache_path: PathBuf,
    pub duplicates: DuplicatePolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            owner: "elixir-lang".to_string(),
            repo: "elixir".to_string(),
            floor: DEFAULT_FLOOR,
            cache_path: PathBuf::from(DEFAULT_CACHE),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl CatalogConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;

        let repository = file
            .source
            .repository
            .as_deref()
            .unwrap_or(DEFAULT_REPOSITORY);
        let (owner, repo) = parse_github_url(repository.trim_end_matches('/'))?;

        let floor = match file.index.floor {
            Some(floor) => Version::parse(&floor).map_err(|e| {
                ReleaseIndexError::Config(format!("invalid floor version {:?}: {}", floor, e))
            })?,
            None => DEFAULT_FLOOR,
        };

        Ok(Self {
            owner,
            repo,
            floor,
            cache_path: file
                .index
                .cache
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE)),
            duplicates: file.index.duplicates,
        })
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            floor: self.floor.clone(),
            duplicates: self.duplicates,
        }
    }
}

/// Parse catalog.toml; a missing file means the built-in defaults
pub fn load_config(path: &Path) -> Result<CatalogConfig> {
    if !path.exists() {
        return Ok(CatalogConfig::default());
    }

    let content = fs::read_to_string(path)?;
    CatalogConfig::from_toml_str(&content)
}

/// Parse GitHub URL to extract owner and repo
/// Expected format: https://github.com/{owner}/{repo}
pub fn parse_github_url(url: &str) -> Result<(String, String)> {
    if !url.starts_with("https://github.com/") {
        return Err(ReleaseIndexError::InvalidUrl(format!(
            "GitHub URL must start with https://github.com/: {}",
            url
        )));
    }

    let path = &url["https://github.com/".len()..];
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

    if parts.len() < 2 {
        return Err(ReleaseIndexError::InvalidUrl(format!(
            "GitHub URL must contain owner and repo: {}",
            url
        )));
    }

    Ok((parts[0].to_string(), parts[1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_url() {
        let (owner, repo) = parse_github_url("https://github.com/elixir-lang/elixir").unwrap();
        assert_eq!(owner, "elixir-lang");
        assert_eq!(repo, "elixir");

        let (owner, repo) = parse_github_url("https://github.com/elixir-lang/elixir/").unwrap();
        assert_eq!(owner, "elixir-lang");
        assert_eq!(repo, "elixir");
    }

    #[test]
    fn test_parse_invalid_url() {
        assert!(parse_github_url("https://gitlab.com/owner/repo").is_err());
        assert!(parse_github_url("https://github.com/owner").is_err());
        assert!(parse_github_url("https://github.com/owner/").is_err());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CatalogConfig::from_toml_str("").unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = CatalogConfig::from_toml_str(
            r#"
[source]
repository = "https://github.com/example/runtime/"

[index]
floor = "1.10.0"
cache = "/tmp/releases.json"
duplicates = "reject"
"#,
        )
        .unwrap();

        assert_eq!(config.owner, "example");
        assert_eq!(config.repo, "runtime");
        assert_eq!(config.floor, Version::new(1, 10, 0));
        assert_eq!(config.cache_path, PathBuf::from("/tmp/releases.json"));
        assert_eq!(config.duplicates, DuplicatePolicy::Reject);

        let options = config.normalize_options();
        assert_eq!(options.floor, Version::new(1, 10, 0));
        assert_eq!(options.duplicates, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_invalid_floor() {
        let err = CatalogConfig::from_toml_str("[index]\nfloor = \"one\"\n").unwrap_err();
        assert!(matches!(err, ReleaseIndexError::Config(_)));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = CatalogConfig::from_toml_str("[index]\nflor = \"1.0.0\"\n").unwrap_err();
        assert!(matches!(err, ReleaseIndexError::Toml(_)));
    }

    #[test]
    fn test_unknown_duplicate_policy() {
        assert!(CatalogConfig::from_toml_str("[index]\nduplicates = \"first-wins\"\n").is_err());
    }
}
