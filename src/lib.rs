//! porter - map container images and OS packages onto a curated distro
//!
//! This crate provides the matching engine behind the `porter` CLI: a tag
//! matcher that picks the closest image tag, a package mapper that
//! translates apt/yum package names into APK package names, and an image
//! matcher that finds the curated equivalent of a source image.

pub mod core;
pub mod matcher;
pub mod ops;
pub mod util;

/// Test fixtures for porter unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use core::{
    AliasTable, CandidateIndex, ImageCatalog, Match, MatchKind, PackageName, SourceDistro, Tag,
    Variant,
};
pub use matcher::{
    map_packages, match_image, match_tag, MatchError, PreferredVariant, TagOptions,
};
pub use util::config::Config;
