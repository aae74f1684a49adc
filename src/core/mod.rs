//! Core data structures for porter.
//!
//! This module contains the values the matchers work on:
//! - Parsed image tags, image names and source package names
//! - Candidate indexes, alias tables and the image catalog
//! - Match results

pub mod alias;
pub mod image;
pub mod index;
pub mod matching;
pub mod package_name;
pub mod tag;

pub use alias::{AliasSource, AliasTable, SourceDistro};
pub use image::{normalize_image_name, ImageCatalog};
pub use index::CandidateIndex;
pub use matching::{Match, MatchKind};
pub use package_name::PackageName;
pub use tag::{Tag, TagVersion, Variant};
