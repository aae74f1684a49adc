//! Tag matching.
//!
//! Picks the candidate tag closest to an original tag. Scoring works on
//! parsed tags rather than raw strings:
//!
//! - version components (major heaviest) must match from the left; a
//!   component missing on either side is neutral
//! - the desired variant earns a bonus, a conflicting one a small penalty;
//!   without options the original's own variant is desired, so an untagged
//!   `3.12` prefers distroless candidates
//! - two different JDK versions cost more than any version match can earn
//! - shared suffix tokens break the remaining ties
//!
//! Raw scores are divided by the most the original tag could earn, so a
//! bare `18` matched to `18-dev` reports a high confidence.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::index::CandidateIndex;
use crate::core::matching::Match;
use crate::core::tag::{Tag, Variant};
use crate::matcher::errors::MatchError;
use crate::matcher::{cmp_score_desc, jaccard, round_score};

/// Scores below this are reported as no match.
pub const DEFAULT_MIN_SCORE: f64 = 0.3;

/// Default length of the ranked tag list.
pub const DEFAULT_RANK_LIMIT: usize = 20;

const MAJOR_WEIGHT: f64 = 0.40;
const MINOR_WEIGHT: f64 = 0.25;
const PATCH_WEIGHT: f64 = 0.15;
const VARIANT_BONUS: f64 = 0.10;
const VARIANT_PENALTY: f64 = 0.05;
const JDK_MATCH_BONUS: f64 = 0.05;
const JDK_MISMATCH_PENALTY: f64 = 1.0;
const TOKEN_WEIGHT: f64 = 0.05;

/// Highest score a candidate that is not the original verbatim can get.
const FUZZY_CEILING: f64 = 0.99;

/// Variant class the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredVariant {
    #[default]
    None,
    Distroless,
    Slim,
    Dev,
}

impl PreferredVariant {
    pub fn variant(self) -> Option<Variant> {
        match self {
            PreferredVariant::None => None,
            PreferredVariant::Distroless => Some(Variant::Distroless),
            PreferredVariant::Slim => Some(Variant::Slim),
            PreferredVariant::Dev => Some(Variant::Dev),
        }
    }
}

impl fmt::Display for PreferredVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant() {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for PreferredVariant {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "any" => Ok(PreferredVariant::None),
            "distroless" => Ok(PreferredVariant::Distroless),
            "slim" => Ok(PreferredVariant::Slim),
            "dev" => Ok(PreferredVariant::Dev),
            _ => Err(MatchError::invalid_input(format!(
                "unknown variant '{}', valid values: none, distroless, slim, dev",
                s
            ))),
        }
    }
}

/// Constraints for one tag query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagOptions {
    /// Only dev candidates are eligible (falls back to all when none exist).
    pub require_dev: bool,
    /// Only candidates of this variant are eligible (same fallback).
    pub preferred_variant: PreferredVariant,
    /// JDK version to assume when the original tag names none.
    pub jdk_hint: Option<u32>,
}

impl TagOptions {
    /// Variant the eligibility filter enforces, if any.
    fn constraint(&self) -> Option<Variant> {
        self.preferred_variant
            .variant()
            .or(self.require_dev.then_some(Variant::Dev))
    }

    fn admits(&self, tag: &Tag) -> bool {
        if self.require_dev && !tag.is_dev() {
            return false;
        }
        match self.preferred_variant.variant() {
            Some(v) => tag.variant() == v,
            None => true,
        }
    }

    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.require_dev {
            parts.push("dev required".to_string());
        }
        if let Some(v) = self.preferred_variant.variant() {
            parts.push(format!("preferred variant '{}'", v));
        }
        parts.join(", ")
    }
}

/// One candidate with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTag {
    pub tag: String,
    pub score: f64,
    pub variant: Variant,
    /// Candidate equals the original verbatim.
    pub exact: bool,
    /// Candidate tokens the original does not carry.
    pub extra_tokens: usize,
    /// Candidate shares a version component, a token or the JDK version
    /// with the original.
    pub viable: bool,
}

impl ScoredTag {
    fn rank_cmp(&self, other: &ScoredTag) -> Ordering {
        cmp_score_desc(self.score, other.score)
            .then_with(|| other.exact.cmp(&self.exact))
            .then_with(|| self.extra_tokens.cmp(&other.extra_tokens))
            .then_with(|| self.tag.cmp(&other.tag))
    }
}

/// Distroless/slim/dev tags standing for one base version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantTags {
    pub distroless: Option<String>,
    pub slim: Option<String>,
    pub dev: Option<String>,
}

/// The parsed original plus everything derived from the options.
struct Query<'a> {
    raw: &'a str,
    tag: Tag,
    desired: Variant,
    jdk: Option<u32>,
    potential: f64,
}

impl<'a> Query<'a> {
    fn new(original: &'a str, options: &TagOptions) -> Result<Self, MatchError> {
        let tag = Tag::parse(original);
        if tag.is_empty() {
            return Err(MatchError::invalid_input(format!(
                "original tag '{}' has no version and no tokens",
                original
            )));
        }

        let desired = options.constraint().unwrap_or_else(|| tag.variant());
        let jdk = tag.jdk_version().or(options.jdk_hint);

        let mut potential = TOKEN_WEIGHT + VARIANT_BONUS;
        if let Some(v) = tag.version() {
            potential += MAJOR_WEIGHT;
            if v.minor.is_some() {
                potential += MINOR_WEIGHT;
            }
            if v.patch.is_some() {
                potential += PATCH_WEIGHT;
            }
        }
        if jdk.is_some() {
            potential += JDK_MATCH_BONUS;
        }

        Ok(Query {
            raw: original.trim(),
            tag,
            desired,
            jdk,
            potential,
        })
    }

    fn score(&self, candidate: &Tag) -> ScoredTag {
        let mut raw = 0.0;
        let mut version_hits = 0;

        if let (Some(o), Some(c)) = (self.tag.version(), candidate.version()) {
            if o.major == c.major {
                raw += MAJOR_WEIGHT;
                version_hits += 1;

                if let (Some(om), Some(cm)) = (o.minor, c.minor) {
                    if om == cm {
                        raw += MINOR_WEIGHT;
                        version_hits += 1;

                        if let (Some(op), Some(cp)) = (o.patch, c.patch) {
                            if op == cp {
                                raw += PATCH_WEIGHT;
                                version_hits += 1;
                            }
                        }
                    }
                }
            }
        }

        if candidate.variant() == self.desired {
            raw += VARIANT_BONUS;
        } else {
            raw -= VARIANT_PENALTY;
        }

        let mut jdk_agrees = false;
        match (self.jdk, candidate.jdk_version()) {
            (Some(a), Some(b)) if a == b => {
                raw += JDK_MATCH_BONUS;
                jdk_agrees = true;
            }
            (Some(_), Some(_)) => raw -= JDK_MISMATCH_PENALTY,
            _ => {}
        }

        raw += TOKEN_WEIGHT
            * jaccard(
                self.tag.descriptive_tokens(),
                candidate.descriptive_tokens(),
            );
        let shared_tokens = candidate
            .descriptive_tokens()
            .filter(|t| self.tag.tokens().contains(*t))
            .count();

        let exact = candidate.as_str() == self.raw;
        let viable = exact || version_hits > 0 || shared_tokens > 0 || jdk_agrees;

        let score = if exact {
            1.0
        } else if viable {
            round_score((raw / self.potential).min(FUZZY_CEILING))
        } else {
            0.0
        };

        ScoredTag {
            tag: candidate.as_str().to_string(),
            score,
            variant: candidate.variant(),
            exact,
            extra_tokens: candidate
                .tokens()
                .iter()
                .filter(|t| !self.tag.tokens().contains(*t))
                .count(),
            viable,
        }
    }

    /// Score and sort the eligible candidates. Warnings explain fallbacks.
    fn rank(
        &self,
        candidates: &CandidateIndex,
        options: &TagOptions,
    ) -> (Vec<ScoredTag>, Vec<String>) {
        let parsed: Vec<Tag> = candidates.iter().map(Tag::parse).collect();
        let mut warnings = Vec::new();

        let constrained: Vec<&Tag> = parsed.iter().filter(|t| options.admits(t)).collect();
        let pool = if constrained.is_empty() && options.constraint().is_some() {
            warnings.push(format!(
                "no candidate tag satisfies {}; matched against all {} tags",
                options.describe(),
                parsed.len()
            ));
            if options.preferred_variant == PreferredVariant::Slim
                && !has_variant(candidates, Variant::Slim)
            {
                warnings.push(
                    "no -slim tags available; choose 'distroless' (no shell) or 'dev' (shell + apk)"
                        .to_string(),
                );
            }
            parsed.iter().collect()
        } else {
            constrained
        };

        let mut scored: Vec<ScoredTag> = pool.into_iter().map(|t| self.score(t)).collect();
        scored.sort_by(ScoredTag::rank_cmp);

        (scored, warnings)
    }
}

/// Tag matcher with a configurable viability threshold.
#[derive(Debug, Clone, Copy)]
pub struct TagMatcher {
    min_score: f64,
}

impl Default for TagMatcher {
    fn default() -> Self {
        TagMatcher {
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl TagMatcher {
    pub fn new() -> Self {
        TagMatcher::default()
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score.clamp(0.0, 1.0);
        self
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// Select the single best candidate for `original`.
    pub fn match_tag(
        &self,
        original: &str,
        candidates: &CandidateIndex,
        options: &TagOptions,
    ) -> Result<Match, MatchError> {
        let query = Query::new(original, options)?;

        if candidates.is_empty() {
            return Ok(Match::none(original, "no candidate tags available"));
        }

        let (ranked, warnings) = query.rank(candidates, options);
        let fell_back = !warnings.is_empty();

        let Some(best) = ranked.first() else {
            return Ok(Match::none(original, "no candidate tags available").with_leading_warnings(warnings));
        };

        tracing::debug!(
            "best tag for '{}': '{}' (score {:.4}, {} candidates)",
            original,
            best.tag,
            best.score,
            ranked.len()
        );

        if best.exact {
            return Ok(Match::exact(original, best.tag.clone()).with_leading_warnings(warnings));
        }

        if !best.viable || best.score <= 0.0 || best.score < self.min_score {
            let reason = if !ranked.iter().any(|s| s.viable) {
                if query.tag.version().is_some() {
                    format!(
                        "no version component overlap between '{}' and any candidate tag",
                        original
                    )
                } else {
                    format!("no token overlap between '{}' and any candidate tag", original)
                }
            } else {
                format!(
                    "best candidate '{}' scored {:.2}, below the minimum of {:.2}",
                    best.tag, best.score, self.min_score
                )
            };
            return Ok(Match::none(original, reason).with_leading_warnings(warnings));
        }

        let mut result = Match::fuzzy(original, best.tag.clone(), best.score);
        if !fell_back && best.variant != query.desired {
            result = result.with_warning(format!(
                "'{}' asks for the {} variant but '{}' is {}",
                original, query.desired, best.tag, best.variant
            ));
        }

        Ok(result.with_leading_warnings(warnings))
    }

    /// Candidates in match order, truncated to `limit`.
    pub fn rank(
        &self,
        original: &str,
        candidates: &CandidateIndex,
        options: &TagOptions,
        limit: usize,
    ) -> Result<Vec<ScoredTag>, MatchError> {
        let query = Query::new(original, options)?;
        let (mut ranked, _) = query.rank(candidates, options);
        ranked.truncate(limit);
        Ok(ranked)
    }
}

/// Select the best candidate with the default threshold.
pub fn match_tag(
    original: &str,
    candidates: &CandidateIndex,
    options: &TagOptions,
) -> Result<Match, MatchError> {
    TagMatcher::default().match_tag(original, candidates, options)
}

/// Rank candidates with the default threshold.
pub fn rank_tags(
    original: &str,
    candidates: &CandidateIndex,
    options: &TagOptions,
    limit: usize,
) -> Result<Vec<ScoredTag>, MatchError> {
    TagMatcher::default().rank(original, candidates, options, limit)
}

/// Whether any candidate is of the given variant.
pub fn has_variant(candidates: &CandidateIndex, variant: Variant) -> bool {
    candidates.iter().any(|t| Tag::parse(t).variant() == variant)
}

/// Pick the distroless, slim and dev tags for a base version.
///
/// `base` may carry a variant suffix; it is stripped first. Missing
/// variants fall back to the matching `latest` tag, and slim finally to
/// any slim tag at all.
pub fn representative_tags(candidates: &CandidateIndex, base: &str) -> VariantTags {
    let lookup = |wanted: &str| {
        candidates
            .iter()
            .find(|t| t.eq_ignore_ascii_case(wanted))
            .map(str::to_string)
    };

    let base = Tag::parse(base).base();
    let mut tags = VariantTags {
        distroless: lookup(&base),
        slim: lookup(&format!("{}-slim", base)),
        dev: lookup(&format!("{}-dev", base)),
    };

    if base != "latest" {
        if tags.distroless.is_none() {
            tags.distroless = lookup("latest");
        }
        if tags.slim.is_none() {
            tags.slim = lookup("latest-slim");
        }
        if tags.dev.is_none() {
            tags.dev = lookup("latest-dev");
        }
    }

    if tags.slim.is_none() {
        tags.slim = candidates
            .iter()
            .find(|t| t.to_lowercase().ends_with("-slim"))
            .map(str::to_string);
    }

    tags
}
