//! Loading candidate indexes, alias datasets and image catalogs from disk.
//!
//! The matchers never touch the filesystem; everything they need is read
//! here first.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::alias::AliasTable;
use crate::core::image::ImageCatalog;
use crate::core::index::CandidateIndex;
use crate::util::GlobalContext;

/// Body of a registry `tags/list` response.
#[derive(Debug, Deserialize)]
struct TagList {
    #[serde(default)]
    tags: Vec<String>,
}

fn read(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}: {}", what, path.display()))
}

/// Parse tag list text: a registry `tags/list` JSON body or one tag per line.
pub fn parse_tag_index(contents: &str) -> Result<CandidateIndex> {
    if contents.trim_start().starts_with('{') {
        let list: TagList =
            serde_json::from_str(contents).context("invalid registry tag list JSON")?;
        return Ok(CandidateIndex::new(list.tags));
    }
    Ok(CandidateIndex::from_lines(contents))
}

/// Parse package index text: an `APKINDEX` or one package per line.
pub fn parse_package_index(contents: &str) -> CandidateIndex {
    if contents.lines().any(|line| line.starts_with("P:")) {
        CandidateIndex::from_apkindex(contents)
    } else {
        CandidateIndex::from_lines(contents)
    }
}

pub fn load_tag_index(path: &Path) -> Result<CandidateIndex> {
    let contents = read(path, "tag list")?;
    let index = parse_tag_index(&contents)
        .with_context(|| format!("failed to parse tag list: {}", path.display()))?;

    if index.is_empty() {
        tracing::warn!("No tags found in {}", path.display());
    } else {
        tracing::debug!("loaded {} tags from {}", index.len(), path.display());
    }
    Ok(index)
}

pub fn load_package_index(path: &Path) -> Result<CandidateIndex> {
    let index = parse_package_index(&read(path, "package index")?);

    if index.is_empty() {
        tracing::warn!("No packages found in {}", path.display());
    } else {
        tracing::debug!("loaded {} packages from {}", index.len(), path.display());
    }
    Ok(index)
}

/// Alias dataset: the explicit path, else `[packages] aliases`, else bundled.
pub fn load_aliases(ctx: &GlobalContext, explicit: Option<&Path>) -> Result<AliasTable> {
    let configured = explicit
        .map(Path::to_path_buf)
        .or_else(|| ctx.config().packages.aliases.clone());

    match configured {
        Some(path) => {
            let path = ctx.resolve_path(&path);
            let table = AliasTable::load(&path)?;
            tracing::debug!("loaded {} aliases from {}", table.len(), path.display());
            Ok(table)
        }
        None => AliasTable::bundled(),
    }
}

/// Image catalog: the explicit path, else `[images] catalog`, else bundled.
pub fn load_image_catalog(ctx: &GlobalContext, explicit: Option<&Path>) -> Result<ImageCatalog> {
    let configured = explicit
        .map(Path::to_path_buf)
        .or_else(|| ctx.config().images.catalog.clone());

    match configured {
        Some(path) => {
            let path = ctx.resolve_path(&path);
            let catalog = ImageCatalog::load(&path)?;
            tracing::debug!("loaded {} image aliases from {}", catalog.len(), path.display());
            Ok(catalog)
        }
        None => ImageCatalog::bundled(),
    }
}
