//! Image mapping.
//!
//! A source image name is normalized and looked up in the catalog. An exact
//! name hit is final, then a hit on the last path segment
//! (`bitnami/python` finds `python`). Only when both miss is every catalog
//! name scored against the source.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::image::{base_name, normalize_image_name, ImageCatalog};
use crate::core::matching::Match;
use crate::matcher::errors::MatchError;
use crate::matcher::{cmp_score_desc, edit_similarity, round_score};

/// Fuzzy results below this are dropped.
pub const DEFAULT_MIN_SCORE: f64 = 0.6;

/// Default length of the ranked image list.
pub const DEFAULT_RANK_LIMIT: usize = 5;

const BASE_NAME_SCORE: f64 = 0.95;
const SQUASHED_SCORE: f64 = 0.98;
const CONTAINMENT_BASE: f64 = 0.8;
const CONTAINMENT_WEIGHT: f64 = 0.15;

/// One curated image with the catalog name that led to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredImage {
    pub image: String,
    /// Catalog name that matched
    pub alias: String,
    pub score: f64,
}

impl ScoredImage {
    fn rank_cmp(&self, other: &ScoredImage) -> Ordering {
        cmp_score_desc(self.score, other.score)
            .then_with(|| self.image.cmp(&other.image))
            .then_with(|| self.alias.cmp(&other.alias))
    }
}

/// `amazon-corretto` and `amazoncorretto` compare equal.
fn squash(name: &str) -> String {
    name.chars().filter(|c| !matches!(c, '-' | '_')).collect()
}

/// Similarity of two normalized image names, in [0, 1].
///
/// Only identical names score 1.0. Equal base names score 0.95 and base
/// names equal once hyphens and underscores are removed 0.98. A base name
/// contained in the other scores by length ratio; the rest falls back to
/// edit similarity.
pub fn image_similarity(source: &str, candidate: &str) -> f64 {
    if source == candidate {
        return 1.0;
    }

    let (source_base, candidate_base) = (base_name(source), base_name(candidate));
    if source_base == candidate_base {
        return BASE_NAME_SCORE;
    }

    let (a, b) = (squash(source_base), squash(candidate_base));
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return SQUASHED_SCORE;
    }

    if a.contains(&b) || b.contains(&a) {
        let (shorter, longer) = if a.len() < b.len() {
            (a.len(), b.len())
        } else {
            (b.len(), a.len())
        };
        return round_score(CONTAINMENT_BASE + CONTAINMENT_WEIGHT * shorter as f64 / longer as f64);
    }

    round_score(edit_similarity(&a, &b))
}

fn validate(source: &str) -> Result<String, MatchError> {
    let name = normalize_image_name(source);
    if name.is_empty() {
        return Err(MatchError::invalid_input(format!(
            "image name '{}' is blank",
            source.trim()
        )));
    }
    Ok(name)
}

/// Maps source image references onto the curated catalog.
pub struct ImageMatcher<'a> {
    catalog: &'a ImageCatalog,
    min_score: f64,
}

impl<'a> ImageMatcher<'a> {
    pub fn new(catalog: &'a ImageCatalog) -> Self {
        ImageMatcher {
            catalog,
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score.clamp(0.0, 1.0);
        self
    }

    /// Curated equivalents of `source`, best first.
    ///
    /// An exact or base-name hit returns all of that name's targets. The
    /// fuzzy list keeps each curated image once, under its best alias.
    pub fn lookup(&self, source: &str, limit: usize) -> Result<Vec<ScoredImage>, MatchError> {
        let name = validate(source)?;

        if let Some(targets) = self.catalog.get(&name) {
            return Ok(scored(targets, &name, 1.0));
        }

        let base = base_name(&name);
        if base != name {
            if let Some(targets) = self.catalog.get(base) {
                return Ok(scored(targets, base, BASE_NAME_SCORE));
            }
        }

        let mut ranked: Vec<ScoredImage> = self
            .catalog
            .iter()
            .map(|(alias, targets)| (alias, targets, image_similarity(&name, alias)))
            .filter(|(_, _, score)| *score >= self.min_score)
            .flat_map(|(alias, targets, score)| scored(targets, alias, score))
            .collect();
        ranked.sort_by(ScoredImage::rank_cmp);

        let mut seen = BTreeSet::new();
        ranked.retain(|scored| seen.insert(scored.image.clone()));
        ranked.truncate(limit);

        tracing::debug!("{} fuzzy image candidates for '{}'", ranked.len(), name);
        Ok(ranked)
    }

    /// Single best mapping for `source`.
    pub fn match_image(&self, source: &str) -> Result<Match, MatchError> {
        let name = validate(source)?;
        let query = source.trim();

        let result = if let Some(targets) = self.catalog.get(&name) {
            Match::alias(query, targets)
        } else if let Some(targets) = Some(base_name(&name))
            .filter(|base| *base != name)
            .and_then(|base| self.catalog.get(base))
        {
            Match {
                score: BASE_NAME_SCORE,
                ..Match::alias(query, targets)
            }
            .with_warning(format!(
                "matched '{}' by its base name '{}'",
                name,
                base_name(&name)
            ))
        } else {
            match self.lookup(source, 1)?.into_iter().next() {
                Some(best) => Match::fuzzy(query, best.image, best.score),
                None => Match::none(query, format!("no curated image close to '{}'", name)),
            }
        };

        if self.catalog.is_generic(&name) {
            return Ok(result.with_warning(format!(
                "'{}' is a generic base image; consider the image for the workload installed on top of it",
                name
            )));
        }
        Ok(result)
    }
}

fn scored(targets: &[String], alias: &str, score: f64) -> Vec<ScoredImage> {
    targets
        .iter()
        .map(|image| ScoredImage {
            image: image.clone(),
            alias: alias.to_string(),
            score,
        })
        .collect()
}

/// Best curated image for `source` with the default threshold.
pub fn match_image(source: &str, catalog: &ImageCatalog) -> Result<Match, MatchError> {
    ImageMatcher::new(catalog).match_image(source)
}

/// Curated candidates for `source`, best first.
pub fn rank_images(
    source: &str,
    catalog: &ImageCatalog,
    limit: usize,
) -> Result<Vec<ScoredImage>, MatchError> {
    ImageMatcher::new(catalog).lookup(source, limit)
}

/// Whether `source` names a generic OS base image.
pub fn is_generic_base_image(source: &str, catalog: &ImageCatalog) -> bool {
    catalog.is_generic(&normalize_image_name(source))
}
