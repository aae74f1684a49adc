//! Matching engine.
//!
//! Three independent matchers share the scoring helpers below: the tag
//! matcher picks one image tag, the package mapper resolves package names
//! and the image matcher maps image names onto the curated catalog.
//! Both are pure functions of their inputs. All I/O happens before a
//! matcher runs, so results are deterministic and safe to compute in
//! parallel.

pub mod errors;
pub mod image;
pub mod package;
pub mod tag;

pub use errors::MatchError;
pub use image::{is_generic_base_image, match_image, rank_images, ImageMatcher, ScoredImage};
pub use package::{map_packages, rank_packages, summary_line, PackageMapper, ScoredPackage};
pub use tag::{
    has_variant, match_tag, rank_tags, representative_tags, PreferredVariant, ScoredTag,
    TagMatcher, TagOptions, VariantTags,
};

use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Jaccard overlap of two token sets; two empty sets overlap fully.
pub fn jaccard<'a, A, B>(a: A, b: B) -> f64
where
    A: IntoIterator<Item = &'a str>,
    B: IntoIterator<Item = &'a str>,
{
    let a: BTreeSet<&str> = a.into_iter().collect();
    let b: BTreeSet<&str> = b.into_iter().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let shared = a.intersection(&b).count();
    let total = a.union(&b).count();
    shared as f64 / total as f64
}

/// Normalized edit similarity in [0, 1]; symmetric in its arguments.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Order two scores highest first.
///
/// Both scores are rounded with [`round_score`] first, so values that
/// differ only by float noise tie and fall through to the caller's
/// tie-break rules.
pub fn cmp_score_desc(a: f64, b: f64) -> Ordering {
    round_score(b).total_cmp(&round_score(a))
}

/// Round a score to four decimals, clamped to [0, 1].
pub fn round_score(score: f64) -> f64 {
    (score.clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0
}
