//! High-level operations.
//!
//! This module contains the implementation of porter commands. Each
//! operation loads its inputs from disk, runs a matcher and returns a
//! serializable report; printing is left to the binary.

pub mod image_lookup;
pub mod inputs;
pub mod package_map;
pub mod search;
pub mod tag_lookup;

pub use image_lookup::{lookup_image, ImageLookupOptions, ImageLookupReport};
pub use inputs::{load_aliases, load_image_catalog, load_package_index, load_tag_index};
pub use package_map::{expand_names, map_package_names, PackageMapOptions, PackageMapReport};
pub use search::{search_index, SearchOptions, SearchReport};
pub use tag_lookup::{
    image_reference, lookup_tag, repository_reference, ImageRef, TagLookupOptions, TagLookupReport,
};
