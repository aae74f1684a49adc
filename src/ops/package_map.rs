//! Implementation of `porter packages`.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::alias::SourceDistro;
use crate::core::matching::Match;
use crate::matcher::{summary_line, PackageMapper};
use crate::ops::inputs::{load_aliases, load_package_index};
use crate::util::GlobalContext;

/// Package manager commands whose `install` arguments are package names.
const PACKAGE_MANAGERS: &[&str] = &["apt", "apt-get", "aptitude", "yum", "dnf", "microdnf"];

/// Options for mapping package names.
#[derive(Debug, Clone)]
pub struct PackageMapOptions {
    /// Package names, or fragments of an install command
    pub names: Vec<String>,

    /// Source distro; falls back to config, then `auto`
    pub source: Option<SourceDistro>,

    /// Package index to match against
    pub index_path: PathBuf,

    /// Alias dataset replacing the configured one
    pub aliases_path: Option<PathBuf>,

    /// Minimum score override
    pub min_score: Option<f64>,
}

/// Result of `porter packages`.
#[derive(Debug, Clone, Serialize)]
pub struct PackageMapReport {
    pub source: SourceDistro,
    pub results: Vec<Match>,
    /// Names that could not be mapped at all
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Matched names joined for an install line
    pub summary: String,
    pub install_command: Option<String>,
}

/// Pull package names out of arguments that may hold a whole `RUN` line
/// (`apt-get update && apt-get install -y curl git=1:2.39`).
///
/// The line is split into commands on `;`, `|` and `&`. When any command
/// runs a package manager, only the words after its `install` count;
/// otherwise every word is a name. Flags and version pins are dropped and
/// order is kept.
pub fn expand_names(args: &[String]) -> Vec<String> {
    let line = args.join(" ");
    let commands: Vec<Vec<&str>> = line
        .split([';', '|', '&'])
        .map(|command| command.split_whitespace().collect())
        .collect();

    let runs_manager =
        |words: &[&str]| words.iter().any(|word| PACKAGE_MANAGERS.contains(word));

    let words: Vec<&str> = if commands.iter().any(|words| runs_manager(words)) {
        commands
            .iter()
            .filter(|words| runs_manager(words))
            .flat_map(|words| {
                words
                    .iter()
                    .skip_while(|word| **word != "install")
                    .skip(1)
                    .copied()
            })
            .collect()
    } else {
        commands.into_iter().flatten().collect()
    };

    words
        .into_iter()
        .filter(|word| !word.starts_with('-'))
        .map(|word| word.trim_end_matches('\\'))
        .map(|word| word.split('=').next().unwrap_or(word))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Map every name onto the package index.
pub fn map_package_names(ctx: &GlobalContext, opts: &PackageMapOptions) -> Result<PackageMapReport> {
    let source = opts
        .source
        .or_else(|| ctx.config().source_distro())
        .unwrap_or_default();

    let aliases = load_aliases(ctx, opts.aliases_path.as_deref())?;
    let index = load_package_index(&ctx.resolve_path(&opts.index_path))?;
    let names = expand_names(&opts.names);

    tracing::debug!(
        "mapping {} names from {} against {} packages",
        names.len(),
        source,
        index.len()
    );

    let mapper = PackageMapper::new(&aliases, &index)
        .with_min_score(opts.min_score.unwrap_or_else(|| ctx.config().package_min_score()));

    let mut results = Vec::with_capacity(names.len());
    let mut errors = Vec::new();
    for outcome in mapper.map(&names, source) {
        match outcome {
            Ok(matched) => results.push(matched),
            Err(err) => {
                tracing::warn!("skipping package name: {}", err);
                errors.push(err.to_string());
            }
        }
    }

    let summary = summary_line(&results);
    let install_command = (!summary.is_empty()).then(|| format!("apk add --no-cache {}", summary));

    Ok(PackageMapReport {
        source,
        results,
        errors,
        summary,
        install_command,
    })
}
