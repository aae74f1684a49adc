//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use porter::core::alias::SourceDistro;
use porter::matcher::PreferredVariant;
use porter::util::ColorChoice;

/// porter - map container images and OS packages onto a curated distro
#[derive(Parser)]
#[command(name = "porter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print results and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Output format for results
    #[arg(long, global = true, value_enum, value_name = "FMT", default_value = "human")]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the closest tag for an image
    Tag(TagArgs),

    /// Map apt/yum package names to APK packages
    Packages(PackagesArgs),

    /// Find the curated equivalent of a source image
    Image(ImageArgs),

    /// Search a package index by name
    Search(SearchArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct TagArgs {
    /// Original tag or image reference (e.g. `3.12-slim`, `python:3.12-slim`)
    pub reference: String,

    /// Tag list: one tag per line, or a registry `tags/list` JSON body
    #[arg(short, long, value_name = "FILE")]
    pub tags: PathBuf,

    /// Image name, when the reference is a bare tag
    #[arg(long)]
    pub image: Option<String>,

    /// Only consider -dev tags
    #[arg(long)]
    pub dev: bool,

    /// Preferred variant: none, distroless, slim, dev
    #[arg(long, value_name = "VARIANT")]
    pub variant: Option<PreferredVariant>,

    /// JDK version to assume when the tag names none
    #[arg(long, value_name = "VERSION")]
    pub jdk: Option<u32>,

    /// Also list candidate tags by relevance
    #[arg(long)]
    pub rank: bool,

    /// Number of ranked tags to list
    #[arg(long, requires = "rank")]
    pub limit: Option<usize>,

    /// Minimum score for a fuzzy match (0.0 - 1.0)
    #[arg(long, value_name = "SCORE")]
    pub min_score: Option<f64>,

    /// Organization used in the rendered image reference
    #[arg(long)]
    pub org: Option<String>,
}

#[derive(Args)]
pub struct PackagesArgs {
    /// Package names, or an install command such as `apt-get install -y curl`
    #[arg(required = true, allow_hyphen_values = true, num_args = 1..)]
    pub names: Vec<String>,

    /// Package index: an APKINDEX file or one package per line
    #[arg(short, long, value_name = "FILE")]
    pub index: PathBuf,

    /// Source package manager: apt, yum, dnf, auto
    #[arg(long, value_name = "DISTRO")]
    pub from: Option<SourceDistro>,

    /// Alias dataset replacing the bundled one
    #[arg(long, value_name = "FILE")]
    pub aliases: Option<PathBuf>,

    /// Minimum score for a fuzzy match (0.0 - 1.0)
    #[arg(long, value_name = "SCORE")]
    pub min_score: Option<f64>,
}

#[derive(Args)]
pub struct ImageArgs {
    /// Source image reference (e.g. `python:3.12`, `quay.io/org/app`)
    pub reference: String,

    /// Image catalog replacing the bundled one
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Minimum score for a fuzzy match (0.0 - 1.0)
    #[arg(long, value_name = "SCORE")]
    pub min_score: Option<f64>,

    /// Number of candidate images to list
    #[arg(long)]
    pub limit: Option<usize>,

    /// Organization used in the rendered image references
    #[arg(long)]
    pub org: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Package index: an APKINDEX file or one package per line
    #[arg(short, long, value_name = "FILE")]
    pub index: PathBuf,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
