//! Process-wide handle on the current release index.
//!
//! An index is never modified once published. Refreshing means building a
//! new one from a fresh feed and swapping the pointer; readers holding an
//! older snapshot keep a consistent view until they drop it.

use crate::error::{ReleaseIndexError, Result};
use crate::github::types::RawRelease;
use crate::index::ReleaseIndex;
use crate::normalizer::{build_index_with, NormalizeOptions};
use arc_swap::ArcSwap;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

static GLOBAL: OnceCell<Catalog> = OnceCell::new();

pub struct Catalog {
    current: ArcSwap<ReleaseIndex>,
}

impl Catalog {
    pub fn new(index: ReleaseIndex) -> Self {
        Self {
            current: ArcSwap::from_pointee(index),
        }
    }

    /// The index as of now
    pub fn snapshot(&self) -> Arc<ReleaseIndex> {
        self.current.load_full()
    }

    /// Publish `index`, returning the one it replaced
    pub fn replace(&self, index: ReleaseIndex) -> Arc<ReleaseIndex> {
        self.current.swap(Arc::new(index))
    }

    /// Build a new index from `records` and publish it.
    ///
    /// If the build fails the current index stays published.
    pub fn rebuild<'a, I>(&self, records: I, options: &NormalizeOptions) -> Result<Arc<ReleaseIndex>>
    where
        I: IntoIterator<Item = &'a RawRelease>,
    {
        let index = Arc::new(build_index_with(records, options)?);
        info!(
            versions = index.len(),
            latest = ?index.latest().map(|v| v.to_string()),
            "publishing rebuilt release index"
        );
        self.current.store(index.clone());
        Ok(index)
    }
}

/// Install the process-wide catalog. May only succeed once.
pub fn install(index: ReleaseIndex) -> Result<&'static Catalog> {
    let mut installed = false;
    let catalog = GLOBAL.get_or_init(|| {
        installed = true;
        Catalog::new(index)
    });

    if installed {
        Ok(catalog)
    } else {
        Err(ReleaseIndexError::AlreadyInstalled)
    }
}

/// The process-wide catalog, if one has been installed
pub fn global() -> Option<&'static Catalog> {
    GLOBAL.get()
}
