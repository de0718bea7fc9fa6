pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod github;
pub mod index;
pub mod models;
pub mod normalizer;
pub mod requirement;
pub mod timestamp;

// Re-export commonly used types
pub use error::{ReleaseIndexError, Result};
pub use index::{ReleaseIndex, ReleaseMap, VersionArg};
pub use models::{Asset, ReleaseDetail, VersionKind};
pub use normalizer::{build_index, build_index_with, DuplicatePolicy, NormalizeOptions, DEFAULT_FLOOR};
pub use requirement::Requirement;
