//! Package mapping.
//!
//! Each source name is looked up in the alias table first; an alias hit is
//! final. Otherwise every index entry is scored against the name and the
//! best one wins if it clears the threshold. Names are independent: a
//! blank name fails on its own and the rest of the batch still resolves.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::alias::{AliasTable, SourceDistro};
use crate::core::index::CandidateIndex;
use crate::core::matching::Match;
use crate::core::package_name::PackageName;
use crate::matcher::errors::MatchError;
use crate::matcher::{cmp_score_desc, edit_similarity, round_score};

/// Fuzzy results below this are reported as no match.
pub const DEFAULT_MIN_SCORE: f64 = 0.5;

/// Default length of the ranked package list.
pub const DEFAULT_RANK_LIMIT: usize = 10;

const STEM_SIMILARITY: f64 = 0.95;
const AFFIX_BONUS: f64 = 0.05;
const DESCRIPTION_BONUS: f64 = 0.1;
const FUZZY_CEILING: f64 = 0.99;

/// One index entry with its score against a source name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPackage {
    pub name: String,
    pub score: f64,
}

impl ScoredPackage {
    fn rank_cmp(&self, other: &ScoredPackage) -> Ordering {
        cmp_score_desc(self.score, other.score).then_with(|| self.name.cmp(&other.name))
    }
}

/// Similarity of a source name and a candidate, in [0, 1].
///
/// Equal normalized forms score 1.0 and equal stems 0.95; everything else
/// falls back to edit similarity. Each affix both names carry adds a
/// small bonus. Only a verbatim candidate may reach 1.0.
pub fn similarity(source: &PackageName, candidate: &PackageName) -> f64 {
    if candidate.original() == source.original().trim() {
        return 1.0;
    }

    let base = if source.normalized() == candidate.normalized() {
        1.0
    } else if source.stem() == candidate.stem() {
        STEM_SIMILARITY
    } else {
        edit_similarity(source.normalized(), candidate.normalized())
    };

    let bonus = AFFIX_BONUS * source.affixes().shared_with(&candidate.affixes()) as f64;
    round_score((base + bonus).min(FUZZY_CEILING))
}

fn validate(name: &str, position: usize) -> Result<(), MatchError> {
    if name.trim().is_empty() {
        return Err(MatchError::invalid_input(format!(
            "package name at position {} is blank",
            position
        )));
    }
    Ok(())
}

/// An index entry prepared for scoring.
struct Candidate {
    name: PackageName,
    /// Lower-cased index description
    description: Option<String>,
}

/// Resolves source package names against one alias table and one index.
pub struct PackageMapper<'a> {
    aliases: &'a AliasTable,
    candidates: Vec<Candidate>,
    min_score: f64,
}

impl<'a> PackageMapper<'a> {
    pub fn new(aliases: &'a AliasTable, index: &CandidateIndex) -> Self {
        let candidates = index
            .iter()
            .map(|entry| Candidate {
                name: PackageName::new(entry),
                description: index.description(entry).map(str::to_lowercase),
            })
            .collect();

        PackageMapper {
            aliases,
            candidates,
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score.clamp(0.0, 1.0);
        self
    }

    /// Resolve every name, preserving input order. Each position carries
    /// its own outcome.
    pub fn map<S>(&self, names: &[S], source: SourceDistro) -> Vec<Result<Match, MatchError>>
    where
        S: AsRef<str> + Sync,
    {
        names
            .par_iter()
            .enumerate()
            .map(|(position, name)| {
                validate(name.as_ref(), position)?;
                Ok(self.resolve(name.as_ref(), source))
            })
            .collect()
    }

    /// Resolve a single, non-blank name.
    pub fn resolve(&self, name: &str, source: SourceDistro) -> Match {
        let package = PackageName::new(name);

        if let Some((table, targets)) = self.aliases.lookup(source, &package.lookup_key()) {
            tracing::debug!("alias hit for '{}' in {} table: {:?}", name, table, targets);
            let result = Match::alias(name, targets);
            if targets.is_empty() {
                return result.with_warning(format!(
                    "'{}' has no equivalent in the {} alias table and can be dropped",
                    name, table
                ));
            }
            return result;
        }

        let best = self
            .candidates
            .iter()
            .map(|candidate| self.score(&package, candidate))
            .min_by(ScoredPackage::rank_cmp);

        match best {
            None => Match::none(name, "no candidate packages available"),
            Some(best) if best.score >= self.min_score && best.score > 0.0 => {
                Match::fuzzy(name, best.name, best.score)
            }
            Some(best) => Match::none(
                name,
                format!(
                    "no package close to '{}': best candidate '{}' scored {:.2}, below the minimum of {:.2}",
                    name, best.name, best.score, self.min_score
                ),
            ),
        }
    }

    /// Fuzzy candidates for one name, best first, truncated to `limit`.
    pub fn rank(&self, name: &str, limit: usize) -> Result<Vec<ScoredPackage>, MatchError> {
        validate(name, 0)?;
        let package = PackageName::new(name);

        let mut ranked: Vec<ScoredPackage> = self
            .candidates
            .iter()
            .map(|candidate| self.score(&package, candidate))
            .collect();
        ranked.sort_by(ScoredPackage::rank_cmp);
        ranked.truncate(limit);
        Ok(ranked)
    }

    /// Name similarity, plus a bonus when the description mentions the name.
    fn score(&self, package: &PackageName, candidate: &Candidate) -> ScoredPackage {
        let mut score = similarity(package, &candidate.name);

        let described = candidate
            .description
            .as_deref()
            .is_some_and(|d| d.contains(package.normalized()));
        if described && score < 1.0 {
            score = round_score((score + DESCRIPTION_BONUS).min(FUZZY_CEILING));
        }

        ScoredPackage {
            name: candidate.name.original().to_string(),
            score,
        }
    }
}

/// Resolve source package names with the default threshold.
pub fn map_packages<S>(
    names: &[S],
    source: SourceDistro,
    aliases: &AliasTable,
    index: &CandidateIndex,
) -> Vec<Result<Match, MatchError>>
where
    S: AsRef<str> + Sync,
{
    PackageMapper::new(aliases, index).map(names, source)
}

/// Rank index entries against one name, ignoring aliases.
pub fn rank_packages(
    name: &str,
    index: &CandidateIndex,
    limit: usize,
) -> Result<Vec<ScoredPackage>, MatchError> {
    let aliases = AliasTable::new();
    PackageMapper::new(&aliases, index).rank(name, limit)
}

/// Install line for the matched packages, in input order.
pub fn summary_line(matches: &[Match]) -> String {
    matches
        .iter()
        .filter(|m| m.is_match())
        .filter_map(|m| m.matched_value.as_deref())
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
