use elixir_releases::cache;
use elixir_releases::github::RawRelease;
use elixir_releases::{
    build_index, NormalizeOptions, ReleaseIndex, ReleaseIndexError, VersionKind, DEFAULT_FLOOR,
};
use pretty_assertions::assert_eq;
use semver::Version;
use std::path::Path;

const FIXTURE: &str = "tests/fixtures/releases.json";

fn fixture_feed() -> Vec<RawRelease> {
    cache::load_feed(Path::new(FIXTURE)).expect("Failed to load fixture feed")
}

fn fixture_index() -> ReleaseIndex {
    cache::load_index(Path::new(FIXTURE), &NormalizeOptions::default())
        .expect("Failed to build fixture index")
}

fn strings(versions: &[Version]) -> Vec<String> {
    versions.iter().map(|v| v.to_string()).collect()
}

fn sorted_keys<V>(map: &std::collections::HashMap<&str, V>) -> Vec<String> {
    let mut keys: Vec<Version> = map.keys().map(|k| Version::parse(k).unwrap()).collect();
    keys.sort();
    strings(&keys)
}

fn assert_strictly_ascending(versions: &[Version]) {
    for pair in versions.windows(2) {
        assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
    }
}

#[test]
fn test_example_feed_versions() {
    let index = fixture_index();

    assert_eq!(
        strings(index.list_versions(Some(VersionKind::Release))),
        vec!["1.12.0", "1.12.1", "1.13.0"]
    );
    assert_eq!(
        strings(index.list_versions(Some(VersionKind::Prerelease))),
        vec!["1.13.0-rc.0"]
    );
    assert_eq!(
        strings(index.list_versions(None)),
        vec!["1.12.0", "1.12.1", "1.13.0-rc.0", "1.13.0"]
    );
    assert_eq!(index.latest(), Some(&Version::new(1, 13, 0)));
    assert!(index.is_prerelease("1.13.0-rc.0"));
    assert!(!index.is_release("1.13.0-rc.0"));
}

#[test]
fn test_partition_invariants() {
    let index = fixture_index();
    let all = index.list_versions(None);
    let releases = index.list_versions(Some(VersionKind::Release));
    let prereleases = index.list_versions(Some(VersionKind::Prerelease));

    assert_eq!(all.len(), releases.len() + prereleases.len());
    assert_eq!(all.len(), index.all_release_data().len());
    assert_strictly_ascending(all);
    assert_strictly_ascending(releases);
    assert_strictly_ascending(prereleases);

    for v in all {
        assert!(v >= &DEFAULT_FLOOR, "{} is below the floor", v);
        assert_eq!(
            index.is_known_version(v),
            index.is_release(v) || index.is_prerelease(v)
        );
        assert!(!(index.is_release(v) && index.is_prerelease(v)));
    }
}

#[test]
fn test_below_floor_never_surfaces() {
    let index = fixture_index();

    assert!(!index.is_known_version("v0.9.9"));
    assert!(!index.is_release("0.9.9"));
    assert!(index.release_data("0.9.9").is_none());
    assert!(!index.all_release_data().contains_key("0.9.9"));
    assert!(!index.releases().contains_key("0.9.9"));
    assert!(!index
        .release_data_matching(">= 0.0.0", true)
        .unwrap()
        .contains_key("0.9.9"));
}

#[test]
fn test_string_and_parsed_forms_agree() {
    let index = fixture_index();

    for raw in ["1.13.0-rc.0", "v1.13.0-rc.0", "1.13.0", "1.12.1", "1.14.0", "0.9.9"] {
        let parsed = Version::parse(raw.trim_start_matches('v')).unwrap();
        assert_eq!(index.is_prerelease(raw), index.is_prerelease(&parsed), "{}", raw);
        assert_eq!(index.is_release(raw), index.is_release(&parsed), "{}", raw);
        assert_eq!(index.is_known_version(raw), index.is_known_version(&parsed), "{}", raw);
    }
}

#[test]
fn test_matching_without_prereleases() {
    let index = fixture_index();

    let matching = index.release_data_matching("~> 1.12", false).unwrap();
    assert_eq!(sorted_keys(&matching), vec!["1.12.0", "1.12.1", "1.13.0"]);

    let matching = index.release_data_matching("~> 1.12", true).unwrap();
    assert_eq!(
        sorted_keys(&matching),
        vec!["1.12.0", "1.12.1", "1.13.0-rc.0", "1.13.0"]
    );

    let matching = index.release_data_matching("~> 1.12.0", false).unwrap();
    assert_eq!(sorted_keys(&matching), vec!["1.12.0", "1.12.1"]);
}

#[test]
fn test_matching_invalid_requirement_is_an_error() {
    let index = fixture_index();
    assert!(matches!(
        index.release_data_matching("~>", true),
        Err(ReleaseIndexError::InvalidRequirement { .. })
    ));
}

#[test]
fn test_release_maps() {
    let index = fixture_index();

    assert_eq!(sorted_keys(&index.releases()), vec!["1.12.0", "1.12.1", "1.13.0"]);
    assert_eq!(sorted_keys(&index.prereleases()), vec!["1.13.0-rc.0"]);

    let detail = &index.all_release_data()["1.13.0"];
    assert!(!detail.is_prerelease);
    assert_eq!(
        detail.html_url,
        "https://github.com/elixir-lang/elixir/releases/tag/v1.13.0"
    );
    assert_eq!(detail.published_at.to_rfc3339(), "2021-12-03T11:45:02+00:00");

    let asset_names: Vec<&str> = detail.assets.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(asset_names, vec!["Docs.zip", "Precompiled.zip"]);
    assert_eq!(
        detail.assets[1].download_url,
        "https://github.com/elixir-lang/elixir/releases/download/v1.13.0/Precompiled.zip"
    );
}

#[test]
fn test_latest_ignores_newer_prerelease() {
    let mut feed = fixture_feed();
    let mut rc = feed[1].clone();
    rc.tag_name = "v1.14.0-rc.0".to_string();
    feed.push(rc);

    let index = build_index(&feed, DEFAULT_FLOOR).unwrap();
    assert_eq!(index.latest(), Some(&Version::new(1, 13, 0)));
    assert!(index.is_prerelease("1.14.0-rc.0"));
}

#[test]
fn test_queries_are_idempotent() {
    let index = fixture_index();

    assert_eq!(index.list_versions(None), index.list_versions(None));
    assert_eq!(index.latest(), index.latest());
    assert_eq!(
        sorted_keys(&index.release_data_matching("~> 1.12", false).unwrap()),
        sorted_keys(&index.release_data_matching("~> 1.12", false).unwrap())
    );
    assert_eq!(index.releases(), index.releases());
}

#[test]
fn test_bad_timestamp_in_feed_fails_build() {
    let mut feed = fixture_feed();
    feed[0].assets[0].created_at = "2021-12-03 11:22:14".to_string();

    let err = build_index(&feed, DEFAULT_FLOOR).unwrap_err();
    assert!(matches!(
        err,
        ReleaseIndexError::InvalidTimestamp {
            field: "asset.created_at",
            ..
        }
    ));
}
