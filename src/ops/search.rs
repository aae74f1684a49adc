//! Implementation of `porter search`.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::alias::AliasTable;
use crate::matcher::{PackageMapper, ScoredPackage};
use crate::ops::inputs::load_package_index;
use crate::util::GlobalContext;

/// Options for searching a package index.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub query: String,
    pub index_path: PathBuf,
    pub limit: Option<usize>,
}

/// Result of `porter search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    /// Names containing the query: exact, then prefix, then substring
    pub matches: Vec<String>,
    /// Closest names by similarity, filled when nothing contains the query
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<ScoredPackage>,
}

/// Search a package index by name.
pub fn search_index(ctx: &GlobalContext, opts: &SearchOptions) -> Result<SearchReport> {
    let index = load_package_index(&ctx.resolve_path(&opts.index_path))?;
    let limit = opts.limit.unwrap_or_else(|| ctx.config().package_rank_limit());

    let matches: Vec<String> = index
        .search(&opts.query, limit)
        .into_iter()
        .map(str::to_string)
        .collect();

    let suggestions = if matches.is_empty() && !opts.query.trim().is_empty() {
        let aliases = AliasTable::new();
        let min_score = ctx.config().package_min_score();
        PackageMapper::new(&aliases, &index)
            .rank(&opts.query, limit)?
            .into_iter()
            .filter(|s| s.score >= min_score)
            .collect()
    } else {
        Vec::new()
    };

    tracing::debug!(
        "search '{}': {} matches, {} suggestions",
        opts.query,
        matches.len(),
        suggestions.len()
    );

    Ok(SearchReport {
        query: opts.query.clone(),
        matches,
        suggestions,
    })
}
