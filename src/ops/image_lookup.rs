//! Implementation of `porter image`.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::image::normalize_image_name;
use crate::core::matching::Match;
use crate::matcher::{ImageMatcher, ScoredImage};
use crate::ops::inputs::load_image_catalog;
use crate::ops::tag_lookup::repository_reference;
use crate::util::GlobalContext;

/// Options for mapping a source image.
#[derive(Debug, Clone)]
pub struct ImageLookupOptions {
    /// Source image reference (`docker.io/library/python:3.12`)
    pub reference: String,

    /// Image catalog replacing the configured one
    pub catalog_path: Option<PathBuf>,

    /// Minimum score override
    pub min_score: Option<f64>,

    /// Length of the candidate list
    pub limit: Option<usize>,

    /// Organization override for the rendered references
    pub org: Option<String>,
}

/// Result of `porter image`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageLookupReport {
    /// Source name after registry prefix and tag were removed
    pub name: String,
    pub generic_base: bool,
    #[serde(flatten)]
    pub result: Match,
    /// `host/org/image` for every matched image
    pub references: Vec<String>,
    pub candidates: Vec<ScoredImage>,
}

/// Map one source image onto the curated catalog.
pub fn lookup_image(ctx: &GlobalContext, opts: &ImageLookupOptions) -> Result<ImageLookupReport> {
    let catalog = load_image_catalog(ctx, opts.catalog_path.as_deref())?;
    let matcher = ImageMatcher::new(&catalog)
        .with_min_score(opts.min_score.unwrap_or_else(|| ctx.config().image_min_score()));

    let name = normalize_image_name(&opts.reference);
    tracing::debug!("mapping image '{}' as '{}'", opts.reference, name);

    let result = matcher.match_image(&opts.reference)?;
    let limit = opts.limit.unwrap_or_else(|| ctx.config().image_rank_limit());
    let candidates = matcher.lookup(&opts.reference, limit)?;

    let org = opts.org.as_deref().unwrap_or(ctx.config().registry_org());
    let references = if result.is_match() {
        result
            .values()
            .map(|image| repository_reference(ctx.config().registry_host(), org, image))
            .collect()
    } else {
        Vec::new()
    };

    Ok(ImageLookupReport {
        generic_base: catalog.is_generic(&name),
        name,
        result,
        references,
        candidates,
    })
}
