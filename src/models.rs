use crate::error::{ReleaseIndexError, Result};
use crate::github::types::{RawAsset, RawRelease};
use crate::timestamp::parse_utc;
use chrono::{DateTime, Utc};
use semver::Version;
use serde::Serialize;

/// Which side of the stable/pre-release split a version falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionKind {
    Release,
    Prerelease,
}

impl VersionKind {
    pub fn of(version: &Version) -> Self {
        if version.pre.is_empty() {
            VersionKind::Release
        } else {
            VersionKind::Prerelease
        }
    }
}

/// A downloadable file attached to a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub content_type: String,
    pub created_at: DateTime<Utc>,
    pub id: u64,
    pub download_url: String,
    pub name: String,
    pub size: u64,
    pub state: String,
    pub updated_at: DateTime<Utc>,
    pub source_url: String,
}

impl Asset {
    pub fn from_raw(raw: &RawAsset) -> Result<Self> {
        Ok(Self {
            content_type: raw.content_type.clone(),
            created_at: parse_utc("asset.created_at", &raw.created_at)?,
            id: raw.id,
            download_url: raw.browser_download_url.clone(),
            name: raw.name.clone(),
            size: raw.size,
            state: raw.state.clone(),
            updated_at: parse_utc("asset.updated_at", &raw.updated_at)?,
            source_url: raw.url.clone(),
        })
    }
}

/// Everything the catalog knows about one released version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseDetail {
    pub version: Version,
    pub is_prerelease: bool,
    pub created_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
    pub source_url: String,
    pub html_url: String,
    pub tarball_url: String,
    pub zipball_url: String,
    /// Feed order is kept. The feed normally attaches at least one asset,
    /// but an empty list is carried through rather than rejected.
    pub assets: Vec<Asset>,
}

impl ReleaseDetail {
    /// Assemble a detail record for an already-parsed version.
    /// `is_prerelease` always follows the version, never the feed's own flag.
    pub fn from_raw(raw: &RawRelease, version: Version) -> Result<Self> {
        let assets = raw
            .assets
            .iter()
            .map(Asset::from_raw)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            is_prerelease: VersionKind::of(&version) == VersionKind::Prerelease,
            version,
            created_at: parse_utc("created_at", &raw.created_at)?,
            published_at: parse_utc("published_at", &raw.published_at)?,
            source_url: raw.url.clone(),
            html_url: raw.html_url.clone(),
            tarball_url: raw.tarball_url.clone(),
            zipball_url: raw.zipball_url.clone(),
            assets,
        })
    }

    pub fn kind(&self) -> VersionKind {
        VersionKind::of(&self.version)
    }
}

/// Strip a single leading `v` from a release tag: "v1.13.0" -> "1.13.0"
pub fn normalize_tag(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// Normalize and parse a release tag as a semantic version
pub fn parse_tag(tag: &str) -> Result<Version> {
    Version::parse(normalize_tag(tag)).map_err(|source| ReleaseIndexError::InvalidTag {
        tag: tag.to_string(),
        source,
    })
}
