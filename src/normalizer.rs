//! Turns the raw release feed into a [`ReleaseIndex`].

use crate::error::{ReleaseIndexError, Result};
use crate::github::types::RawRelease;
use crate::index::ReleaseIndex;
use crate::models::{normalize_tag, parse_tag, ReleaseDetail, VersionKind};
use semver::Version;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Releases older than this are not part of the catalog
pub const DEFAULT_FLOOR: Version = Version::new(1, 0, 0);

/// What to do when two feed records normalize to the same version string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The later record in feed order replaces the earlier one
    #[default]
    LastWins,
    /// Fail the build
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub floor: Version,
    pub duplicates: DuplicatePolicy,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            floor: DEFAULT_FLOOR,
            duplicates: DuplicatePolicy::default(),
        }
    }
}

/// Build an index from feed records, keeping versions `>= floor`.
pub fn build_index<'a, I>(records: I, floor: Version) -> Result<ReleaseIndex>
where
    I: IntoIterator<Item = &'a RawRelease>,
{
    build_index_with(
        records,
        &NormalizeOptions {
            floor,
            ..NormalizeOptions::default()
        },
    )
}

/// Build an index from feed records.
///
/// A malformed tag or timestamp anywhere in the feed fails the whole build;
/// no partially-populated index is ever returned.
pub fn build_index_with<'a, I>(records: I, options: &NormalizeOptions) -> Result<ReleaseIndex>
where
    I: IntoIterator<Item = &'a RawRelease>,
{
    let mut by_version_string: HashMap<String, ReleaseDetail> = HashMap::new();
    let mut below_floor = 0usize;

    for raw in records {
        let version = parse_tag(&raw.tag_name)?;

        if version < options.floor {
            debug!(tag = %raw.tag_name, floor = %options.floor, "skipping release below floor");
            below_floor += 1;
            continue;
        }

        let key = normalize_tag(&raw.tag_name).to_string();
        let detail = ReleaseDetail::from_raw(raw, version)?;

        if by_version_string.contains_key(&key) {
            match options.duplicates {
                DuplicatePolicy::Reject => return Err(ReleaseIndexError::DuplicateVersion(key)),
                DuplicatePolicy::LastWins => {
                    warn!(tag = %raw.tag_name, version = %key, "duplicate release tag, keeping the later record");
                }
            }
        }

        by_version_string.insert(key, detail);
    }

    let index = ReleaseIndex::from_details(options.floor.clone(), by_version_string);
    debug!(
        total = index.len(),
        releases = index.list_versions(Some(VersionKind::Release)).len(),
        below_floor,
        latest = ?index.latest().map(|v| v.to_string()),
        "built release index"
    );

    Ok(index)
}
