//! The immutable release index and the read operations over it.

use crate::error::{ReleaseIndexError, Result};
use crate::models::{normalize_tag, ReleaseDetail, VersionKind};
use crate::requirement::Requirement;
use semver::Version;
use std::borrow::Cow;
use std::collections::HashMap;

/// A filtered view of the index, keyed by normalized version string
pub type ReleaseMap<'a> = HashMap<&'a str, &'a ReleaseDetail>;

/// Anything a query can interpret as a version: a parsed `Version`, or a
/// tag/version string normalized exactly like the feed's tags.
pub trait VersionArg {
    /// `None` when the argument does not name a valid version
    fn to_version(&self) -> Option<Cow<'_, Version>>;
}

impl VersionArg for Version {
    fn to_version(&self) -> Option<Cow<'_, Version>> {
        Some(Cow::Borrowed(self))
    }
}

impl VersionArg for str {
    fn to_version(&self) -> Option<Cow<'_, Version>> {
        Version::parse(normalize_tag(self)).ok().map(Cow::Owned)
    }
}

impl VersionArg for String {
    fn to_version(&self) -> Option<Cow<'_, Version>> {
        self.as_str().to_version()
    }
}

impl<T: VersionArg + ?Sized> VersionArg for &T {
    fn to_version(&self) -> Option<Cow<'_, Version>> {
        (**self).to_version()
    }
}

/// Every known release, built once by the normalizer and never mutated.
#[derive(Debug, Clone)]
pub struct ReleaseIndex {
    pub(crate) floor: Version,
    pub(crate) by_version_string: HashMap<String, ReleaseDetail>,
    pub(crate) all_versions: Vec<Version>,
    pub(crate) release_versions: Vec<Version>,
    pub(crate) prerelease_versions: Vec<Version>,
    pub(crate) latest_version: Option<Version>,
}

impl ReleaseIndex {
    /// Derive the sorted version lists from the detail map
    pub(crate) fn from_details(floor: Version, by_version_string: HashMap<String, ReleaseDetail>) -> Self {
        let mut all_versions: Vec<Version> = by_version_string
            .values()
            .map(|detail| detail.version.clone())
            .collect();
        all_versions.sort();

        let (prerelease_versions, release_versions): (Vec<Version>, Vec<Version>) = all_versions
            .iter()
            .cloned()
            .partition(|v| VersionKind::of(v) == VersionKind::Prerelease);

        let latest_version = release_versions.last().cloned();

        Self {
            floor,
            by_version_string,
            all_versions,
            release_versions,
            prerelease_versions,
            latest_version,
        }
    }

    /// The index with no releases in it
    pub fn empty(floor: Version) -> Self {
        Self::from_details(floor, HashMap::new())
    }

    /// Lowest version admitted into this index (inclusive)
    pub fn floor(&self) -> &Version {
        &self.floor
    }

    pub fn len(&self) -> usize {
        self.by_version_string.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_version_string.is_empty()
    }

    fn contains(versions: &[Version], v: impl VersionArg) -> bool {
        match v.to_version() {
            Some(version) => versions.binary_search(&*version).is_ok(),
            None => false,
        }
    }

    /// True if `v` is a known pre-release (e.g. `1.13.0-rc.0`)
    pub fn is_prerelease(&self, v: impl VersionArg) -> bool {
        Self::contains(&self.prerelease_versions, v)
    }

    /// True if `v` is a known stable release
    pub fn is_release(&self, v: impl VersionArg) -> bool {
        Self::contains(&self.release_versions, v)
    }

    pub fn is_known_version(&self, v: impl VersionArg) -> bool {
        Self::contains(&self.all_versions, v)
    }

    /// Highest stable release. Pre-releases are never considered, even
    /// when they sort above every stable version.
    pub fn latest(&self) -> Option<&Version> {
        self.latest_version.as_ref()
    }

    pub fn latest_prerelease(&self) -> Option<&Version> {
        self.prerelease_versions.last()
    }

    /// Detail record for a single version, if known
    pub fn release_data(&self, v: impl VersionArg) -> Option<&ReleaseDetail> {
        let version = v.to_version()?;
        self.by_version_string.get(&version.to_string())
    }

    /// Like [`release_data`](Self::release_data), but an unknown version is an error
    pub fn require_release_data(&self, v: &str) -> Result<&ReleaseDetail> {
        self.release_data(v)
            .ok_or_else(|| ReleaseIndexError::UnknownVersion(v.to_string()))
    }

    pub fn all_release_data(&self) -> &HashMap<String, ReleaseDetail> {
        &self.by_version_string
    }

    pub fn prereleases(&self) -> ReleaseMap<'_> {
        self.filter(|detail| detail.is_prerelease)
    }

    pub fn releases(&self) -> ReleaseMap<'_> {
        self.filter(|detail| !detail.is_prerelease)
    }

    /// Releases whose version satisfies `requirement`, e.g. `"~> 1.12"`.
    ///
    /// A malformed requirement is an error; an empty map is a valid answer.
    pub fn release_data_matching(&self, requirement: &str, allow_pre: bool) -> Result<ReleaseMap<'_>> {
        let requirement = Requirement::parse(requirement)?;
        Ok(self.release_data_matching_req(&requirement, allow_pre))
    }

    pub fn release_data_matching_req(&self, requirement: &Requirement, allow_pre: bool) -> ReleaseMap<'_> {
        self.filter(|detail| requirement.matches(&detail.version, allow_pre))
    }

    /// Known versions in ascending order, optionally only one kind
    pub fn list_versions(&self, kind: Option<VersionKind>) -> &[Version] {
        match kind {
            None => &self.all_versions,
            Some(VersionKind::Release) => &self.release_versions,
            Some(VersionKind::Prerelease) => &self.prerelease_versions,
        }
    }

    fn filter(&self, keep: impl Fn(&ReleaseDetail) -> bool) -> ReleaseMap<'_> {
        self.by_version_string
            .iter()
            .filter(|(_, detail)| keep(*detail))
            .map(|(key, detail)| (key.as_str(), detail))
            .collect()
    }
}
